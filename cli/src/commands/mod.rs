//! CLI Commands

pub mod build;
pub mod config;
pub mod fill;
pub mod forms;
pub mod integrations;
pub mod responses;
pub mod signup;

use std::sync::Arc;

use striform_core::{FileLocalStore, FormLibrary, FormsApi, HttpFormsApi, LocalCache, Viewer};

use crate::config::{config_dir, Config};
use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

/// Everything a command needs: the form library, the effective settings
/// and how to print.
pub struct Context {
    pub library: FormLibrary,
    pub config: Config,
    pub format: OutputFormat,
}

impl Context {
    /// Library over `~/.striform/local-store.json`, talking to `api_url`
    /// unless `offline`.
    pub fn open(config: Config, api_url: Option<&str>, format: OutputFormat) -> CliResult<Self> {
        let store = FileLocalStore::open(config_dir()?.join("local-store.json"))?;
        let cache = LocalCache::new(Arc::new(store));
        let api: Option<Arc<dyn FormsApi>> =
            api_url.map(|url| Arc::new(HttpFormsApi::new(url)) as Arc<dyn FormsApi>);
        Ok(Self::with_library(FormLibrary::new(cache, api), config, format))
    }

    pub fn with_library(library: FormLibrary, config: Config, format: OutputFormat) -> Self {
        Self { library, config, format }
    }

    /// Dashboard and builder commands are for signed-up operators only.
    pub fn require_signup(&self) -> CliResult<()> {
        if self.library.cache().is_logged_in()? {
            Ok(())
        } else {
            Err(CliError::Invalid("not signed up; run `striform signup` first".into()))
        }
    }

    pub fn viewer(&self) -> Viewer {
        Viewer { is_pro: self.config.is_pro.unwrap_or(false) }
    }
}
