//! Error types

use thiserror::Error;

use crate::domain::QuestionKind;
use crate::ports::RemoteError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum FormsError {
    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("Question not found: {0}")]
    QuestionNotFound(String),

    #[error("Question index {index} out of range ({len} questions)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Answer does not fit a {0} question")]
    AnswerMismatch(QuestionKind),

    #[error("Option not offered by this question: {0}")]
    UnknownOption(String),

    #[error("File rejected: {0}")]
    FileRejected(String),

    #[error("Form already submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub type Result<T> = std::result::Result<T, FormsError>;
