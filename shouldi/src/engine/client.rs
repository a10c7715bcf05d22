//! Provider client: one chat-completion POST per analysis, no retries, no streaming.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, warn, Instrument};

use super::error::EngineError;
use super::transport::{HttpTransport, ReqwestTransport};
use super::{DecisionEngine, DecisionOutcome};
use crate::analysis::{parse_analysis, ValidationMode};
use crate::history::HISTORY_WINDOW;
use crate::message::ChatMessage;
use crate::request::ChatCompletionRequest;
use crate::settings::Settings;

/// Default OpenAI-compatible chat-completion endpoint (Groq).
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Default, Deserialize)]
struct CompletionEnvelope {
    #[serde(default)]
    choices: Vec<EnvelopeChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct EnvelopeChoice {
    #[serde(default)]
    message: Option<EnvelopeMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct EnvelopeMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionEnvelope {
    /// `choices[0].message.content`, when present and non-empty.
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|s| !s.is_empty())
    }
}

/// Chat-completion client for one model on one endpoint.
///
/// The credential is injected at construction; a missing one is reported on the first
/// `analyze` call without touching the transport.
pub struct ProviderClient {
    transport: Arc<dyn HttpTransport>,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    temperature: f32,
    system_prompt: String,
    validation: ValidationMode,
    history_window: usize,
}

impl ProviderClient {
    /// Builds a client with default endpoint, model and temperature.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        api_key: Option<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: system_prompt.into(),
            validation: ValidationMode::default(),
            history_window: HISTORY_WINDOW,
        }
    }

    /// Builds the primary client from settings over a reqwest transport.
    pub fn from_settings(settings: &Settings, system_prompt: impl Into<String>) -> Self {
        Self::from_settings_with_transport(settings, system_prompt, Arc::new(ReqwestTransport::new()))
    }

    /// Same as [`ProviderClient::from_settings`] with a caller-supplied transport.
    pub fn from_settings_with_transport(
        settings: &Settings,
        system_prompt: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self::new(transport, settings.api_key.clone(), system_prompt)
            .with_endpoint(settings.endpoint.clone())
            .with_model(settings.model.clone())
            .with_temperature(settings.temperature)
            .with_validation(settings.validation)
            .with_history_window(settings.history_window)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    /// Turns sent per request; at least 1 so the newest user turn is always included.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window.max(1);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(&self, history: &[ChatMessage]) -> Result<DecisionOutcome, EngineError> {
        let api_key = match self.api_key.as_deref().map(str::trim) {
            Some(k) if !k.is_empty() => k,
            _ => {
                error!("API key not configured");
                return Err(EngineError::CredentialMissing);
            }
        };

        let start = history.len().saturating_sub(self.history_window);
        let request = ChatCompletionRequest::new(
            self.model.clone(),
            self.temperature,
            &self.system_prompt,
            &history[start..],
        );
        let body = serde_json::to_value(&request)
            .map_err(|e| EngineError::DecisionEngineFailure(e.to_string()))?;

        debug!(
            endpoint = %self.endpoint,
            messages = request.messages.len(),
            "sending chat completion request"
        );
        let reply = self
            .transport
            .post_json(&self.endpoint, api_key, &body)
            .await
            .map_err(|e| {
                warn!(error = %e, "chat completion transport failed");
                EngineError::from_unclassified(e.to_string())
            })?;
        info!(status = reply.status, "chat completion response");

        if reply.status == 429 {
            warn!(body = %reply.body, "provider quota exceeded");
            return Err(EngineError::QuotaExceeded);
        }
        if !reply.is_success() {
            error!(status = reply.status, body = %reply.body, "provider error");
            return Err(EngineError::ProviderError {
                status: reply.status,
                body: reply.body,
            });
        }

        let envelope: CompletionEnvelope = serde_json::from_str(&reply.body).map_err(|e| {
            warn!(error = %e, "undecodable completion envelope");
            EngineError::from_unclassified(e.to_string())
        })?;
        let content = envelope.into_content().ok_or_else(|| {
            error!("empty response from provider");
            EngineError::EmptyResponse
        })?;
        debug!(length = content.len(), "response content received");

        let analysis = parse_analysis(&content, self.validation).map_err(|e| {
            warn!(error = %e, "analysis did not parse");
            EngineError::from(e)
        })?;
        Ok(DecisionOutcome {
            analysis,
            used_fallback: false,
        })
    }
}

#[async_trait]
impl DecisionEngine for ProviderClient {
    async fn analyze(&self, history: &[ChatMessage]) -> Result<DecisionOutcome, EngineError> {
        let span = tracing::info_span!(
            "decision_request",
            request_id = %uuid::Uuid::new_v4(),
            model = %self.model,
            history_len = history.len(),
        );
        self.request(history).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures;
    use crate::engine::transport::{HttpReply, TransportError};
    use std::sync::Mutex;

    /// Records request bodies; always answers with the sample analysis.
    #[derive(Default)]
    struct RecordingTransport {
        bodies: Mutex<Vec<serde_json::Value>>,
    }

    #[async_trait]
    impl HttpTransport for RecordingTransport {
        async fn post_json(
            &self,
            _url: &str,
            _bearer: &str,
            body: &serde_json::Value,
        ) -> Result<HttpReply, TransportError> {
            self.bodies.lock().unwrap().push(body.clone());
            let envelope = serde_json::json!({
                "choices": [{ "message": { "content": fixtures::sample_json() } }]
            });
            Ok(HttpReply {
                status: 200,
                body: envelope.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn zero_history_window_still_sends_newest_user_turn() {
        let transport = Arc::new(RecordingTransport::default());
        let client = ProviderClient::new(transport.clone(), Some("k".to_string()), "SYS")
            .with_history_window(0);
        let history = vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("Should I?"),
        ];
        client.analyze(&history).await.unwrap();

        let bodies = transport.bodies.lock().unwrap();
        let messages = bodies[0]["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "Should I?");
    }

    #[test]
    fn envelope_content_requires_non_empty_first_choice() {
        let env: CompletionEnvelope =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"x"}}]}"#).unwrap();
        assert_eq!(env.into_content().as_deref(), Some("x"));

        let empty: CompletionEnvelope =
            serde_json::from_str(r#"{"choices":[{"message":{"content":""}}]}"#).unwrap();
        assert!(empty.into_content().is_none());

        let none: CompletionEnvelope = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(none.into_content().is_none());

        let bare: CompletionEnvelope = serde_json::from_str(r#"{}"#).unwrap();
        assert!(bare.into_content().is_none());

        let null_content: CompletionEnvelope =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(null_content.into_content().is_none());
    }
}
