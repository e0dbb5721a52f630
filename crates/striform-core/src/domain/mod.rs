//! Forms domain

pub mod form;
pub mod integrations;
pub mod question;
pub mod response;
pub mod style;

pub use form::{Form, WebhookPayload};
pub use integrations::{IntegrationKind, Integrations};
pub use question::{
    FileUploadConfig, ImagePlacement, ImagePosition, Question, QuestionImage, QuestionKind,
};
pub use response::{AnswerValue, Answers, FileRef, Response};
pub use style::{apply_text_style, ColorTarget, TextAlign, TextStyle};
