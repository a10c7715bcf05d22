//! CLI error type. Every failure ends as one line on stderr and a non-zero exit.

use shouldi::{ErrorKind, PromptLoadError, SettingsError, SubmitError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuration: {0}")]
    Settings(#[from] SettingsError),
    #[error("prompts: {0}")]
    Prompts(#[from] PromptLoadError),
    /// The analysis failed; `message` is the user-facing text for `kind`.
    #[error("{message}")]
    Analysis { kind: ErrorKind, message: String },
    #[error("{0}")]
    Submit(#[from] SubmitError),
    #[error("{0}")]
    Usage(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Stable code for `--json` error output.
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Analysis { kind, .. } => kind.code(),
            CliError::Settings(_) | CliError::Prompts(_) => "CONFIGURATION",
            CliError::Submit(_) => "BUSY",
            CliError::Usage(_) => "USAGE",
            CliError::Io(_) | CliError::Json(_) => "IO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_error_displays_user_message_and_engine_code() {
        let e = CliError::Analysis {
            kind: ErrorKind::QuotaExceeded,
            message: "at capacity".to_string(),
        };
        assert_eq!(e.to_string(), "at capacity");
        assert_eq!(e.code(), "QUOTA_LIMIT");
        assert_eq!(CliError::Usage("x".into()).code(), "USAGE");
    }
}
