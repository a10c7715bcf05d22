//! Error taxonomy for the decision engine.
//!
//! Every raise site uses a structured kind. Errors that arrive without one (transport
//! failures, undecodable envelopes, content that is not JSON) go through
//! [`EngineError::from_unclassified`], which sniffs the message text.

use thiserror::Error;

use crate::analysis::ParseError;

/// Flat kind of an [`EngineError`], used for user messages and fallback decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    CredentialMissing,
    QuotaExceeded,
    ProviderError,
    EmptyResponse,
    MalformedResponse,
    DecisionEngineFailure,
}

impl ErrorKind {
    /// Stable code, e.g. for `--json` error output.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::CredentialMissing => "KEY_NOT_FOUND",
            ErrorKind::QuotaExceeded => "QUOTA_LIMIT",
            ErrorKind::ProviderError => "PROVIDER_ERROR",
            ErrorKind::EmptyResponse => "EMPTY_RESPONSE",
            ErrorKind::MalformedResponse => "MALFORMED_RESPONSE",
            ErrorKind::DecisionEngineFailure => "DECISION_ENGINE_FAILURE",
        }
    }
}

/// Decision engine failure.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("API credential is not configured")]
    CredentialMissing,
    #[error("provider quota exceeded")]
    QuotaExceeded,
    #[error("provider returned HTTP {status}: {body}")]
    ProviderError { status: u16, body: String },
    #[error("provider returned no message content")]
    EmptyResponse,
    #[error("malformed analysis: {0}")]
    MalformedResponse(String),
    #[error("decision engine failure: {0}")]
    DecisionEngineFailure(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::CredentialMissing => ErrorKind::CredentialMissing,
            EngineError::QuotaExceeded => ErrorKind::QuotaExceeded,
            EngineError::ProviderError { .. } => ErrorKind::ProviderError,
            EngineError::EmptyResponse => ErrorKind::EmptyResponse,
            EngineError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            EngineError::DecisionEngineFailure(_) => ErrorKind::DecisionEngineFailure,
        }
    }

    /// Fallback classifier for errors that carry no structured kind.
    ///
    /// Lowercased message containing `quota` or `429` → `QuotaExceeded`; containing `key`
    /// → `CredentialMissing`; otherwise `DecisionEngineFailure`. Order matters: a message
    /// mentioning both quota and key is a quota error.
    pub fn from_unclassified(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("quota") || lower.contains("429") {
            EngineError::QuotaExceeded
        } else if lower.contains("key") {
            EngineError::CredentialMissing
        } else {
            EngineError::DecisionEngineFailure(message)
        }
    }

    /// Whether a secondary strategy may be tried after this primary failure.
    ///
    /// A missing credential is a configuration problem and is surfaced as is.
    pub fn is_fallback_eligible(&self) -> bool {
        !matches!(self, EngineError::CredentialMissing)
    }
}

impl From<ParseError> for EngineError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::Syntax(inner) => EngineError::from_unclassified(inner.to_string()),
            other @ (ParseError::Shape(_) | ParseError::Invalid(_)) => {
                EngineError::MalformedResponse(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffing_maps_quota_and_429() {
        assert!(matches!(
            EngineError::from_unclassified("Quota exhausted for org"),
            EngineError::QuotaExceeded
        ));
        assert!(matches!(
            EngineError::from_unclassified("status 429 Too Many Requests"),
            EngineError::QuotaExceeded
        ));
    }

    #[test]
    fn sniffing_maps_key_to_credential_missing() {
        assert!(matches!(
            EngineError::from_unclassified("Invalid API Key"),
            EngineError::CredentialMissing
        ));
    }

    #[test]
    fn sniffing_prefers_quota_over_key() {
        assert!(matches!(
            EngineError::from_unclassified("key quota reached"),
            EngineError::QuotaExceeded
        ));
    }

    #[test]
    fn sniffing_defaults_to_engine_failure_with_message() {
        let e = EngineError::from_unclassified("connection reset by peer");
        assert_eq!(e.kind(), ErrorKind::DecisionEngineFailure);
        assert!(e.to_string().contains("connection reset"));
    }

    #[test]
    fn parse_syntax_error_is_sniffed() {
        let syntax = serde_json::from_str::<serde_json::Value>("definitely not json").unwrap_err();
        let e: EngineError = ParseError::Syntax(syntax).into();
        assert_eq!(e.kind(), ErrorKind::DecisionEngineFailure);
    }

    #[test]
    fn parse_shape_error_is_malformed() {
        let shape = serde_json::from_str::<crate::analysis::DecisionAnalysis>("{}").unwrap_err();
        let e: EngineError = ParseError::Shape(shape).into();
        assert_eq!(e.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn only_credential_missing_blocks_fallback() {
        assert!(!EngineError::CredentialMissing.is_fallback_eligible());
        assert!(EngineError::QuotaExceeded.is_fallback_eligible());
        assert!(EngineError::EmptyResponse.is_fallback_eligible());
        assert!(EngineError::ProviderError {
            status: 500,
            body: String::new()
        }
        .is_fallback_eligible());
    }

    #[test]
    fn kind_codes_are_stable() {
        assert_eq!(ErrorKind::QuotaExceeded.code(), "QUOTA_LIMIT");
        assert_eq!(ErrorKind::CredentialMissing.code(), "KEY_NOT_FOUND");
    }
}
