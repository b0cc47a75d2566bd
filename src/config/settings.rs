//! Settings file support.
//!
//! `$HOME/.shopcopy/settings.json` holds the same four values as the
//! relay's environment variables, grouped by concern:
//!
//! ```json
//! {
//!   "openai": { "api_key": "sk-...", "model": "gpt-4", "base_url": "https://api.openai.com" },
//!   "server": { "bind": "127.0.0.1:8080" }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{API_KEY_VAR, BASE_URL_VAR, BIND_VAR, MODEL_VAR};

/// Provider section of the settings file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct OpenAiSettings {
    /// Fallback for `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Fallback for `OPENAI_MODEL`.
    #[serde(default)]
    pub model: Option<String>,
    /// Fallback for `OPENAI_BASE_URL`.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// HTTP server section of the settings file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Fallback for `SHOPCOPY_BIND`.
    #[serde(default)]
    pub bind: Option<String>,
}

/// Parsed settings file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Provider values.
    #[serde(default)]
    pub openai: OpenAiSettings,
    /// Server values.
    #[serde(default)]
    pub server: ServerSettings,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from_path(Self::get_settings_path()?)
    }

    /// Loads settings from a specific path. A missing file yields empty
    /// settings.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home_dir.join(".shopcopy").join("settings.json"))
    }

    /// Returns the stored value for one of the relay's environment
    /// variables. Unknown names have no entry.
    pub fn value_for(&self, var: &str) -> Option<&str> {
        match var {
            API_KEY_VAR => self.openai.api_key.as_deref(),
            MODEL_VAR => self.openai.model.as_deref(),
            BASE_URL_VAR => self.openai.base_url.as_deref(),
            BIND_VAR => self.server.bind.as_deref(),
            _ => None,
        }
    }
}
