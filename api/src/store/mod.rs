//! Document persistence for forms and responses

use async_trait::async_trait;
use serde_json::{Map, Value};
use striform_core::Response;
use thiserror::Error;

use crate::models::FormDocument;

mod file;
mod memory;

pub use file::FileDocumentStore;
pub use memory::InMemoryDocumentStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The document does not fit the schema.
    #[error("{0}")]
    Invalid(String),

    /// The backing medium failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Invalid(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct RecordedResponse {
    pub response: Response,
    /// A form's counter went up; false for partial rows and unknown forms.
    pub counted: bool,
}

/// Two collections: forms keyed by `id`, responses keyed by `id` and
/// queried by `formId`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_forms(&self) -> StoreResult<Vec<FormDocument>>;

    async fn insert_form(&self, doc: FormDocument) -> StoreResult<FormDocument>;

    async fn find_form(&self, id: &str) -> StoreResult<Option<FormDocument>>;

    /// Shallow merge of `patch` into the stored form. `None` when absent.
    async fn update_form(
        &self,
        id: &str,
        patch: Map<String, Value>,
    ) -> StoreResult<Option<FormDocument>>;

    /// Removes the form and every response that references it.
    async fn delete_form(&self, id: &str) -> StoreResult<Option<FormDocument>>;

    async fn list_responses(&self, form_id: &str) -> StoreResult<Vec<Response>>;

    /// Stores the response and, for a final one, bumps its form's
    /// `responseCount` in the same write.
    async fn insert_response(&self, response: Response) -> StoreResult<RecordedResponse>;

    async fn is_connected(&self) -> bool;
}
