//! Outbound ports
//!
//! Interfaces the runtime and library use to reach the outside world. HTTP
//! implementations live in [`crate::infrastructure`]; tests supply fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Answers, Form, Response, WebhookPayload};

/// Remote API port (the Striform REST service).
#[async_trait]
pub trait FormsApi: Send + Sync {
    /// List all forms
    async fn list_forms(&self) -> Result<Vec<Form>, RemoteError>;

    /// Create a form from a client-side document
    async fn create_form(&self, form: &Form) -> Result<Form, RemoteError>;

    /// Fetch a form by its id
    async fn fetch_form(&self, id: &str) -> Result<Form, RemoteError>;

    /// Merge a form's fields into the stored document
    async fn update_form(&self, form: &Form) -> Result<Form, RemoteError>;

    /// Delete a form
    async fn delete_form(&self, id: &str) -> Result<(), RemoteError>;

    /// List responses recorded for a form
    async fn list_responses(&self, form_id: &str) -> Result<Vec<Response>, RemoteError>;

    /// Record a response
    async fn create_response(&self, response: &Response) -> Result<Response, RemoteError>;
}

/// Called once with the full answer set when a respondent finishes.
#[async_trait]
pub trait CompletionHandler: Send + Sync {
    async fn on_complete(&self, form_id: &str, answers: &Answers);

    /// Receives the final response the runtime records locally, id included.
    /// Handlers that only care about the answers can rely on the default.
    async fn on_response(&self, response: &Response) {
        self.on_complete(&response.form_id, &response.answers).await
    }
}

/// Delivers the completion payload to a user-configured URL.
#[async_trait]
pub trait WebhookSender: Send + Sync {
    async fn send(&self, url: &str, payload: &WebhookPayload) -> Result<(), RemoteError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("remote unreachable: {0}")]
    Unreachable(String),

    #[error("not found")]
    NotFound,

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid response body: {0}")]
    Decode(String),
}
