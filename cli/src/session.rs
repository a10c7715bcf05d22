//! Settings, prompt and engine setup shared by every CLI mode.

use std::sync::Arc;

use shouldi::view::SCENARIOS;
use shouldi::{prompts, FallbackEngine, ReqwestTransport, Settings, ValidationMode};

use crate::CliError;

/// Command-line overrides applied on top of the env-derived settings.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub lenient: bool,
}

impl Overrides {
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(model) = self.model.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            settings.model = model.to_string();
        }
        if self.lenient {
            settings.validation = ValidationMode::Lenient;
        }
        settings
    }
}

/// Applies `.env` / config.toml, reads [`Settings`] and applies `overrides`.
///
/// Runs before logging is installed so `.env` can set `RUST_LOG` and `SHOULDI_LOG_DIR`;
/// call [`log_settings`] once the subscriber is up.
pub fn load_settings(overrides: &Overrides) -> Result<Settings, CliError> {
    Ok(overrides.apply(Settings::load(None)?))
}

pub fn log_settings(settings: &Settings) {
    if !settings.has_credential() {
        tracing::warn!("no API credential configured");
    }
    tracing::info!(
        model = %settings.model,
        fallback = settings.fallback_model.as_deref().unwrap_or("-"),
        validation = ?settings.validation,
        "settings loaded"
    );
}

/// Primary (plus optional secondary) engine over reqwest, with the configured system prompt.
pub fn build_engine(settings: &Settings) -> Result<Arc<FallbackEngine>, CliError> {
    let prompts = prompts::load_or_default(None)?;
    Ok(Arc::new(shouldi::build_engine(
        settings,
        &prompts.system_prompt,
        Arc::new(ReqwestTransport::new()),
    )))
}

/// Startup warning printed to stderr when no credential is configured.
pub fn credential_warning(settings: &Settings) -> Option<String> {
    (!settings.has_credential()).then(|| {
        format!(
            "warning: {} is not set (env, .env or config.toml); requests will fail",
            shouldi::settings::ENV_API_KEY
        )
    })
}

/// Picks the dilemma text: `-m`, else positional words, else scenario `N` (1-based).
pub fn resolve_message(
    message: Option<String>,
    rest: &[String],
    scenario: Option<usize>,
) -> Result<Option<String>, CliError> {
    if let Some(m) = message.filter(|m| !m.trim().is_empty()) {
        return Ok(Some(m));
    }
    let joined = rest.join(" ");
    if !joined.trim().is_empty() {
        return Ok(Some(joined));
    }
    match scenario {
        None => Ok(None),
        Some(n) => scenario_text(n).map(|s| Some(s.to_string())),
    }
}

/// Text of scenario `n` (1-based).
pub fn scenario_text(n: usize) -> Result<&'static str, CliError> {
    n.checked_sub(1)
        .and_then(|i| SCENARIOS.get(i))
        .map(|s| s.text)
        .ok_or_else(|| {
            CliError::Usage(format!(
                "scenario must be between 1 and {}, got {}",
                SCENARIOS.len(),
                n
            ))
        })
}
