//! Decision engine: turns a conversation history into a [`DecisionAnalysis`].
//!
//! [`DecisionEngine`] is the seam the state machine talks to. Implementations:
//! [`ProviderClient`] (one chat-completion endpoint), [`FallbackEngine`] (primary plus
//! optional secondary). Tests plug in their own engines or an [`HttpTransport`] mock.

mod client;
mod error;
mod fallback;
mod transport;

use std::sync::Arc;

use async_trait::async_trait;

pub use client::{ProviderClient, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use error::{EngineError, ErrorKind};
pub use fallback::FallbackEngine;
pub use transport::{HttpReply, HttpTransport, ReqwestTransport, TransportError};

use crate::analysis::DecisionAnalysis;
use crate::message::ChatMessage;
use crate::settings::Settings;

/// Result of one successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionOutcome {
    pub analysis: DecisionAnalysis,
    /// True when the secondary strategy produced the analysis.
    pub used_fallback: bool,
}

/// Analyzes a conversation history. The last turn is the newest user message.
#[async_trait]
pub trait DecisionEngine: Send + Sync {
    async fn analyze(&self, history: &[ChatMessage]) -> Result<DecisionOutcome, EngineError>;
}

/// Builds the engine described by `settings`: primary model, plus a secondary one on the
/// same endpoint when `fallback_model` is set.
pub fn build_engine(
    settings: &Settings,
    system_prompt: &str,
    transport: Arc<dyn HttpTransport>,
) -> FallbackEngine {
    let primary = ProviderClient::from_settings_with_transport(
        settings,
        system_prompt,
        Arc::clone(&transport),
    );
    let engine = FallbackEngine::new(Arc::new(primary));
    match settings.fallback_model.as_deref() {
        Some(model) => {
            let secondary =
                ProviderClient::from_settings_with_transport(settings, system_prompt, transport)
                    .with_model(model);
            engine.with_secondary(Arc::new(secondary))
        }
        None => engine,
    }
}
