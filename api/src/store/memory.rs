use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use striform_core::Response;

use super::{DocumentStore, RecordedResponse, StoreError, StoreResult};
use crate::models::FormDocument;

/// Both collections as they are persisted to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Collections {
    #[serde(default)]
    pub forms: Vec<FormDocument>,
    #[serde(default)]
    pub responses: Vec<Response>,
}

/// In-memory store, insertion ordered.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    forms: RwLock<Vec<FormDocument>>,
    responses: RwLock<Vec<Response>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_collections(collections: Collections) -> Self {
        Self {
            forms: RwLock::new(collections.forms),
            responses: RwLock::new(collections.responses),
        }
    }

    pub(crate) fn restore(&self, collections: Collections) {
        *self.forms.write() = collections.forms;
        *self.responses.write() = collections.responses;
    }

    fn bump_count(&self, form_id: &str) -> bool {
        match self.forms.write().iter_mut().find(|f| f.id() == form_id) {
            Some(doc) => {
                doc.form.response_count += 1;
                true
            }
            None => false,
        }
    }

    pub(crate) fn snapshot(&self) -> Collections {
        Collections {
            forms: self.forms.read().clone(),
            responses: self.responses.read().clone(),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list_forms(&self) -> StoreResult<Vec<FormDocument>> {
        Ok(self.forms.read().clone())
    }

    async fn insert_form(&self, doc: FormDocument) -> StoreResult<FormDocument> {
        let mut forms = self.forms.write();
        if forms.iter().any(|f| f.id() == doc.id()) {
            return Err(StoreError::Invalid(format!("form {} already exists", doc.id())));
        }
        forms.push(doc.clone());
        Ok(doc)
    }

    async fn find_form(&self, id: &str) -> StoreResult<Option<FormDocument>> {
        Ok(self.forms.read().iter().find(|f| f.id() == id).cloned())
    }

    async fn update_form(
        &self,
        id: &str,
        patch: Map<String, Value>,
    ) -> StoreResult<Option<FormDocument>> {
        let mut forms = self.forms.write();
        let Some(slot) = forms.iter_mut().find(|f| f.id() == id) else {
            return Ok(None);
        };
        let merged = slot.merged(patch)?;
        *slot = merged.clone();
        Ok(Some(merged))
    }

    async fn delete_form(&self, id: &str) -> StoreResult<Option<FormDocument>> {
        let removed = {
            let mut forms = self.forms.write();
            let pos = forms.iter().position(|f| f.id() == id);
            pos.map(|i| forms.remove(i))
        };
        if removed.is_some() {
            self.responses.write().retain(|r| r.form_id != id);
        }
        Ok(removed)
    }

    async fn list_responses(&self, form_id: &str) -> StoreResult<Vec<Response>> {
        Ok(self
            .responses
            .read()
            .iter()
            .filter(|r| r.form_id == form_id)
            .cloned()
            .collect())
    }

    async fn insert_response(&self, response: Response) -> StoreResult<RecordedResponse> {
        if response.form_id.is_empty() {
            return Err(StoreError::Invalid("formId is required".into()));
        }
        let counted = !response.is_partial && self.bump_count(&response.form_id);
        self.responses.write().push(response.clone());
        Ok(RecordedResponse { response, counted })
    }

    async fn is_connected(&self) -> bool {
        true
    }
}
