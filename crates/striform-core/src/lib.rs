//! Striform Form Platform
//!
//! Self-hosted form builder: design multi-question forms, publish them,
//! collect respondent answers and review the results.
//!
//! ## Architecture
//!
//! - **Domain**: forms, questions, responses, answers, styling
//! - **Builder**: single-editor form editing with write-through persistence
//! - **Runtime**: one-question-at-a-time response collection
//! - **Store**: local key-value cache standing in for browser storage
//! - **Library**: client-side form model reconciling the cache with the API
//! - **Ports / Infrastructure**: remote API and webhook interfaces, HTTP adapters
//!
//! ## Features
//!
//! - Twelve question types including signature, statement and file upload
//! - Partial submission capture for paid-tier viewers
//! - Webhook notification on completion
//! - Offline fallback to the local store

pub mod builder;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod library;
pub mod ports;
pub mod runtime;
pub mod store;

pub use builder::{FileUploadPatch, FormBuilder, FormSink, ImagePatch, QuestionDraft, QuestionPatch};
pub use domain::{
    AnswerValue, Answers, ColorTarget, FileRef, FileUploadConfig, Form, ImagePlacement,
    ImagePosition, IntegrationKind, Integrations, Question, QuestionImage, QuestionKind, Response,
    TextAlign, TextStyle, WebhookPayload,
};
pub use error::{FormsError, Result};
pub use infrastructure::http::{HttpFormsApi, HttpWebhookSender};
pub use library::FormLibrary;
pub use ports::{CompletionHandler, FormsApi, RemoteError, WebhookSender};
pub use runtime::{Advance, FormSession, SessionMode, Submission, Viewer, WebhookDelivery};
pub use store::{FileLocalStore, LocalCache, LocalStore, MemoryLocalStore, StoreError};

/// Fresh identifier for forms, questions and responses.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
