//! Local key-value store
//!
//! Stand-in for browser local storage: string keys, JSON string values.
//! [`LocalCache`] layers typed accessors over the fixed key scheme in
//! [`keys`].

mod cache;
mod file;
mod memory;

pub use cache::LocalCache;
pub use file::FileLocalStore;
pub use memory::MemoryLocalStore;

use thiserror::Error;

pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("local store I/O error: {0}")]
    Io(String),

    #[error("corrupt value under {key}: {message}")]
    Corrupt { key: String, message: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Key scheme shared with the browser client.
pub mod keys {
    pub const FORMS: &str = "forms";
    pub const LOGGED_IN: &str = "isLoggedIn";

    pub fn responses(form_id: &str) -> String {
        format!("responses_{}", form_id)
    }

    pub fn integrations(form_id: &str) -> String {
        format!("integrations_{}", form_id)
    }
}
