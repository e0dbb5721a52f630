//! Form aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::question::Question;
use super::response::Answers;
use super::style::TextAlign;

pub const UNTITLED: &str = "Untitled Form";
pub const DEFAULT_BUTTON_TEXT: &str = "Submit";
pub const DEFAULT_SUBMIT_COLOR: &str = "#6366F1";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Count of non-partial responses; a cache, never recomputed server-side.
    #[serde(default)]
    pub response_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_button_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub capture_partial_submissions: bool,
}

impl Form {
    /// A blank form as created from the dashboard.
    pub fn untitled() -> Self {
        Self {
            id: crate::new_id(),
            title: UNTITLED.into(),
            ..Default::default()
        }
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn question_index(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }

    pub fn button_text(&self) -> &str {
        self.button_text.as_deref().filter(|s| !s.is_empty()).unwrap_or(DEFAULT_BUTTON_TEXT)
    }

    pub fn submit_button_color(&self) -> &str {
        self.submit_button_color
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SUBMIT_COLOR)
    }

    pub fn text_align(&self) -> TextAlign {
        self.text_align.unwrap_or_default()
    }
}

/// Body POSTed to a form's webhook when a respondent finishes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub form_id: String,
    pub form_title: String,
    pub answers: Answers,
    pub submitted_at: DateTime<Utc>,
}

impl WebhookPayload {
    pub fn new(form: &Form, answers: Answers) -> Self {
        Self {
            form_id: form.id.clone(),
            form_title: form.title.clone(),
            answers,
            submitted_at: Utc::now(),
        }
    }
}
