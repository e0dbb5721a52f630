//! API Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use striform_core::Form;
use utoipa::ToSchema;

/// Fields an update patch cannot overwrite.
pub const SERVER_OWNED: [&str; 4] = ["id", "responseCount", "createdAt", "updatedAt"];

/// Stored form: the client document plus bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    #[serde(flatten)]
    pub form: Form,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FormDocument {
    pub fn new(form: Form) -> Self {
        let now = Utc::now();
        Self { form, created_at: now, updated_at: now }
    }

    pub fn id(&self) -> &str {
        &self.form.id
    }

    /// Overlays the top-level fields of `patch` and refreshes `updatedAt`.
    ///
    /// Server-owned fields (id, counter, timestamps) keep their stored
    /// values whatever the patch says. Fields whose values do not fit the
    /// schema fail the whole merge.
    pub fn merged(&self, patch: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut value {
            for (key, field) in patch {
                if !SERVER_OWNED.contains(&key.as_str()) {
                    fields.insert(key, field);
                }
            }
            fields.insert("updatedAt".into(), serde_json::to_value(Utc::now())?);
        }
        serde_json::from_value(value)
    }
}

/// Error body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Root liveness document
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusDocument {
    pub status: String,
    pub version: String,
    pub endpoints: BTreeMap<String, BTreeMap<String, String>>,
    pub health_check: HealthCheck,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheck {
    /// `connected` or `disconnected`
    pub database: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_flattens_form_fields() {
        let doc = FormDocument::new(Form { id: "f1".into(), title: "T".into(), ..Default::default() });
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["id"], json!("f1"));
        assert_eq!(value["title"], json!("T"));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("form").is_none());
    }

    #[test]
    fn test_merge_keeps_unpatched_fields_and_id() {
        let mut form = Form { id: "f1".into(), title: "T".into(), ..Default::default() };
        form.title_color = Some("#123".into());
        let doc = FormDocument::new(form);

        let patch = json!({ "id": "hijack", "title": "New", "capturePartialSubmissions": true });
        let merged = doc.merged(patch.as_object().unwrap().clone()).unwrap();

        assert_eq!(merged.id(), "f1");
        assert_eq!(merged.form.title, "New");
        assert_eq!(merged.form.title_color.as_deref(), Some("#123"));
        assert!(merged.form.capture_partial_submissions);
        assert_eq!(merged.created_at, doc.created_at);
        assert!(merged.updated_at >= doc.updated_at);
    }

    #[test]
    fn test_merge_keeps_server_counter() {
        let mut doc = FormDocument::new(Form { id: "f1".into(), ..Default::default() });
        doc.form.response_count = 3;
        let patch = json!({ "responseCount": 0, "createdAt": "2000-01-01T00:00:00Z", "title": "X" });
        let merged = doc.merged(patch.as_object().unwrap().clone()).unwrap();
        assert_eq!(merged.form.response_count, 3);
        assert_eq!(merged.created_at, doc.created_at);
        assert_eq!(merged.form.title, "X");
    }

    #[test]
    fn test_merge_rejects_mistyped_fields() {
        let doc = FormDocument::new(Form { id: "f1".into(), ..Default::default() });
        let patch = json!({ "questions": "not a list" });
        assert!(doc.merged(patch.as_object().unwrap().clone()).is_err());
    }
}
