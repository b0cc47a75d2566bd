//! Relay configuration.
//!
//! Values are read once at startup, from the process environment first and
//! then from `$HOME/.shopcopy/settings.json`, and injected into the relay
//! handler. Nothing reads the environment at request time.

pub mod settings;

use std::env;
use std::fmt;

use anyhow::{Context, Result};
use url::Url;

use crate::ai::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use settings::Settings;

/// Environment variable holding the provider credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding the model identifier.
pub const MODEL_VAR: &str = "OPENAI_MODEL";
/// Environment variable overriding the provider base URL.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the listen address.
pub const BIND_VAR: &str = "SHOPCOPY_BIND";

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Effective relay configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Provider credential. `None` makes every generation fail with 500.
    pub api_key: Option<String>,
    /// Model identifier sent to the provider.
    pub model: String,
    /// Provider base URL.
    pub api_base: String,
    /// Address the HTTP server binds to.
    pub bind: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_BASE_URL.to_string(),
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &self.redacted_api_key())
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("bind", &self.bind)
            .finish()
    }
}

impl RelayConfig {
    /// Loads configuration from the environment with settings-file fallback.
    pub fn from_env() -> Result<Self> {
        let settings = Settings::load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable settings file: {e:#}");
            Settings::default()
        });
        Self::from_sources(|key| env::var(key).ok(), &settings)
    }

    /// Layers environment values over the settings file. A variable that is
    /// unset or blank falls back to the file.
    pub fn from_sources<F>(env: F, settings: &Settings) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|key| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| settings.value_for(key).map(str::to_string))
        })
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let config = Self {
            api_key: get(API_KEY_VAR),
            model: get(MODEL_VAR).unwrap_or(defaults.model),
            api_base: get(BASE_URL_VAR).unwrap_or(defaults.api_base),
            bind: get(BIND_VAR).unwrap_or(defaults.bind),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the base URL is usable.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base)
            .with_context(|| format!("Invalid {BASE_URL_VAR}: {}", self.api_base))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("{BASE_URL_VAR} must be an http(s) URL, got {}", self.api_base);
        }
        Ok(())
    }

    /// Returns the credential with all but its last four characters hidden.
    pub fn redacted_api_key(&self) -> String {
        match &self.api_key {
            None => "<not set>".to_string(),
            Some(key) => {
                let count = key.chars().count();
                let tail: String = key.chars().skip(count.saturating_sub(4)).collect();
                format!("****{tail}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_set() {
        let config = RelayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RelayConfig::default());
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.api_base, "https://api.openai.com");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn overrides_are_read() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-abc123"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("OPENAI_BASE_URL", "http://localhost:9000"),
            ("SHOPCOPY_BIND", "0.0.0.0:3000"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-abc123"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_base, "http://localhost:9000");
        assert_eq!(config.bind, "0.0.0.0:3000");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = RelayConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn environment_wins_over_settings_file() {
        let settings = Settings {
            openai: settings::OpenAiSettings {
                api_key: Some("sk-from-file".to_string()),
                model: Some("gpt-4o".to_string()),
                base_url: None,
            },
            server: settings::ServerSettings {
                bind: Some("0.0.0.0:9000".to_string()),
            },
        };
        let env = lookup(&[("OPENAI_API_KEY", "sk-from-env"), ("OPENAI_MODEL", " ")]);

        let config = RelayConfig::from_sources(env, &settings).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-from-env"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.api_base, "https://api.openai.com");
        assert_eq!(config.bind, "0.0.0.0:9000");
    }

    #[test]
    fn bad_base_url_is_rejected() {
        assert!(RelayConfig::from_lookup(lookup(&[("OPENAI_BASE_URL", "not a url")])).is_err());
        assert!(RelayConfig::from_lookup(lookup(&[("OPENAI_BASE_URL", "ftp://x")])).is_err());
    }

    #[test]
    fn debug_output_hides_key() {
        let config = RelayConfig {
            api_key: Some("sk-secretvalue".to_string()),
            ..RelayConfig::default()
        };
        let out = format!("{config:?}");
        assert!(!out.contains("secret"));
        assert!(out.contains("****alue"));
        assert_eq!(RelayConfig::default().redacted_api_key(), "<not set>");
    }
}
