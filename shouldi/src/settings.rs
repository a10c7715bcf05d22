//! Engine settings resolved from the process environment.
//!
//! [`Settings::load`] first applies `.env` and XDG `config.toml` via the `config` crate
//! (existing env > .env > XDG), then reads the variables below. Nothing here is global:
//! the resulting value is passed to the engine at construction.

use std::path::Path;

use crate::analysis::ValidationMode;
use crate::engine::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::history::HISTORY_WINDOW;

/// App name used for `$XDG_CONFIG_HOME/<app>/config.toml`.
pub const APP_NAME: &str = "shouldi";

pub const ENV_API_KEY: &str = "GROQ_API_KEY";
pub const ENV_API_KEY_ALT: &str = "SHOULDI_API_KEY";
pub const ENV_ENDPOINT: &str = "SHOULDI_ENDPOINT";
pub const ENV_MODEL: &str = "SHOULDI_MODEL";
pub const ENV_TEMPERATURE: &str = "SHOULDI_TEMPERATURE";
pub const ENV_FALLBACK_MODEL: &str = "SHOULDI_FALLBACK_MODEL";
pub const ENV_VALIDATION: &str = "SHOULDI_VALIDATION";
pub const ENV_HISTORY_WINDOW: &str = "SHOULDI_HISTORY_WINDOW";

/// Accepted sampling temperatures. NaN is outside every range.
const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("config: {0}")]
    Load(#[from] env_config::LoadError),
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Everything the engine needs, injected at construction.
#[derive(Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub fallback_model: Option<String>,
    pub validation: ValidationMode,
    pub history_window: usize,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("fallback_model", &self.fallback_model)
            .field("validation", &self.validation)
            .field("history_window", &self.history_window)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            fallback_model: None,
            validation: ValidationMode::default(),
            history_window: HISTORY_WINDOW,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Settings {
    /// Applies `.env` / XDG config to the environment, then reads settings from it.
    ///
    /// * `override_dir`: directory to look for `.env` in instead of the current directory.
    pub fn load(override_dir: Option<&Path>) -> Result<Self, SettingsError> {
        let applied = env_config::load_and_apply(APP_NAME, override_dir)?;
        for (key, source) in &applied.keys {
            tracing::debug!(key = %key, source = ?source, "config value applied to env");
        }
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Reads settings through `lookup` (the process env in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let api_key = non_empty(lookup(ENV_API_KEY)).or_else(|| non_empty(lookup(ENV_API_KEY_ALT)));
        let temperature = match non_empty(lookup(ENV_TEMPERATURE)) {
            Some(v) => {
                let t = v.parse::<f32>().map_err(|e| SettingsError::Invalid {
                    key: ENV_TEMPERATURE,
                    message: e.to_string(),
                })?;
                if !TEMPERATURE_RANGE.contains(&t) {
                    return Err(SettingsError::Invalid {
                        key: ENV_TEMPERATURE,
                        message: format!("must be a number between 0 and 2, got {}", v),
                    });
                }
                t
            }
            None => defaults.temperature,
        };
        let validation = match non_empty(lookup(ENV_VALIDATION)) {
            Some(v) => v
                .parse::<ValidationMode>()
                .map_err(|message| SettingsError::Invalid {
                    key: ENV_VALIDATION,
                    message,
                })?,
            None => defaults.validation,
        };
        let history_window = match non_empty(lookup(ENV_HISTORY_WINDOW)) {
            Some(v) => match v.parse::<usize>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(SettingsError::Invalid {
                        key: ENV_HISTORY_WINDOW,
                        message: "must be at least 1".to_string(),
                    })
                }
                Err(e) => {
                    return Err(SettingsError::Invalid {
                        key: ENV_HISTORY_WINDOW,
                        message: e.to_string(),
                    })
                }
            },
            None => defaults.history_window,
        };
        Ok(Self {
            api_key,
            endpoint: non_empty(lookup(ENV_ENDPOINT)).unwrap_or(defaults.endpoint),
            model: non_empty(lookup(ENV_MODEL)).unwrap_or(defaults.model),
            temperature,
            fallback_model: non_empty(lookup(ENV_FALLBACK_MODEL)),
            validation,
            history_window,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}
