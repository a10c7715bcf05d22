//! Primary/secondary strategy: try the primary engine, fall back to an optional secondary.
//!
//! With no secondary configured this is a pass-through and `used_fallback` stays false.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::error::EngineError;
use super::{DecisionEngine, DecisionOutcome};
use crate::message::ChatMessage;

/// Engine with one primary and at most one secondary strategy.
pub struct FallbackEngine {
    primary: Arc<dyn DecisionEngine>,
    secondary: Option<Arc<dyn DecisionEngine>>,
}

impl FallbackEngine {
    pub fn new(primary: Arc<dyn DecisionEngine>) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    pub fn with_secondary(mut self, secondary: Arc<dyn DecisionEngine>) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    /// Runs the primary strategy; its outcome is never marked as a fallback.
    pub async fn attempt_primary(
        &self,
        history: &[ChatMessage],
    ) -> Result<DecisionOutcome, EngineError> {
        let mut outcome = self.primary.analyze(history).await?;
        outcome.used_fallback = false;
        Ok(outcome)
    }

    /// Runs the secondary strategy, if any. `None` when no secondary is configured.
    pub async fn attempt_secondary(
        &self,
        history: &[ChatMessage],
    ) -> Option<Result<DecisionOutcome, EngineError>> {
        let secondary = self.secondary.as_ref()?;
        let result = secondary.analyze(history).await.map(|mut outcome| {
            outcome.used_fallback = true;
            outcome
        });
        Some(result)
    }
}

#[async_trait]
impl DecisionEngine for FallbackEngine {
    async fn analyze(&self, history: &[ChatMessage]) -> Result<DecisionOutcome, EngineError> {
        let primary_err = match self.attempt_primary(history).await {
            Ok(outcome) => return Ok(outcome),
            Err(e) => e,
        };
        if !primary_err.is_fallback_eligible() {
            return Err(primary_err);
        }
        match self.attempt_secondary(history).await {
            None => Err(primary_err),
            Some(Ok(outcome)) => {
                info!(primary_error = %primary_err, "analysis served by secondary engine");
                Ok(outcome)
            }
            Some(Err(secondary_err)) => {
                warn!(
                    primary_error = %primary_err,
                    secondary_error = %secondary_err,
                    "secondary engine failed too"
                );
                Err(primary_err)
            }
        }
    }
}
