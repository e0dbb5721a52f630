//! CLI errors

use striform_core::{FormsError, StoreError};
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Forms(#[from] FormsError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
