//! CLI Configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    /// Public address of the form-filling site, used for share links.
    pub app_url: Option<String>,
    /// Paid tier; enables partial-submission capture while filling.
    pub is_pro: Option<bool>,
    pub default_format: Option<String>,
}

impl Config {
    pub const KEYS: [&'static str; 4] = ["api_url", "app_url", "is_pro", "default_format"];

    pub fn load(profile: Option<&str>) -> CliResult<Self> {
        Self::load_from(&config_path(profile)?)
    }

    pub fn load_from(path: &Path) -> CliResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| CliError::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> CliResult<PathBuf> {
        let path = config_path(profile)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> CliResult<Option<String>> {
        Ok(match key {
            "api_url" => self.api_url.clone(),
            "app_url" => self.app_url.clone(),
            "is_pro" => self.is_pro.map(|p| p.to_string()),
            "default_format" => self.default_format.clone(),
            _ => return Err(CliError::Config(format!("Unknown config key: {}", key))),
        })
    }

    pub fn set(&mut self, key: &str, value: String) -> CliResult<()> {
        match key {
            "api_url" => self.api_url = Some(value),
            "app_url" => self.app_url = Some(value),
            "is_pro" => {
                let flag = value
                    .parse()
                    .map_err(|_| CliError::Config(format!("is_pro must be true or false, got {}", value)))?;
                self.is_pro = Some(flag);
            }
            "default_format" => self.default_format = Some(value),
            _ => return Err(CliError::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }

    pub fn app_url(&self) -> &str {
        self.app_url.as_deref().unwrap_or(DEFAULT_APP_URL)
    }
}

/// `~/.striform`
pub fn config_dir() -> CliResult<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CliError::Config("Cannot find home directory".into()))?;
    Ok(home.join(".striform"))
}

fn config_path(profile: Option<&str>) -> CliResult<PathBuf> {
    let filename = match profile {
        Some(p) => format!("config.{}.toml", p),
        None => "config.toml".to_string(),
    };
    Ok(config_dir()?.join(filename))
}
