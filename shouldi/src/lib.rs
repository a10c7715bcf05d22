//! # ShouldI
//!
//! Decision analysis over an OpenAI-compatible chat-completion endpoint. The user describes a
//! dilemma, the model answers with a strict JSON document, and the crate turns it into a
//! five-panel strategy map: situation, key questions, three options, verdict, confidence.
//!
//! ## Flow
//!
//! 1. [`AppState::submit`] appends the user turn to a trimmed copy of the
//!    [`ConversationHistory`] and moves to `Loading`.
//! 2. A [`DecisionEngine`] (normally [`FallbackEngine`] over [`ProviderClient`]) builds a
//!    [`ChatCompletionRequest`] from the system prompt plus history, posts it through an
//!    [`HttpTransport`] and parses the reply with [`parse_analysis`].
//! 3. [`AppState::settle`] applies the outcome: on success the history gains the user and
//!    assistant turns and the state becomes `Analyzed`; on failure an [`ErrorKind`] is
//!    mapped to a user-facing message.
//! 4. [`view::present`] derives what a renderer draws.
//!
//! ## Main modules
//!
//! - [`analysis`]: response types, [`parse_analysis`], strict/lenient validation.
//! - [`engine`]: [`DecisionEngine`], [`ProviderClient`], [`FallbackEngine`], [`EngineError`].
//! - [`app`]: the [`AppState`] state machine and [`ViewTab`].
//! - [`history`], [`message`], [`request`]: conversation and wire types.
//! - [`prompts`]: embedded system prompt with file/env overrides.
//! - [`settings`]: [`Settings`] resolved from env, `.env` and XDG `config.toml`.
//! - [`view`]: pure presentation model for the CLI and TUI.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shouldi::{build_engine, prompts, AppState, ReqwestTransport, Settings};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load(None)?;
//! let prompts = prompts::default_from_embedded()?;
//! let engine = build_engine(&settings, &prompts.system_prompt, Arc::new(ReqwestTransport::new()));
//!
//! let mut app = AppState::new().with_history_window(settings.history_window);
//! app.run(&engine, Some("Should I move to Japan for a year-long art residency?")).await?;
//! if let Some(analysis) = app.analysis() {
//!     println!("{}", analysis.panel4.verdict);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod app;
pub mod engine;
pub mod history;
pub mod message;
pub mod prompts;
pub mod request;
pub mod settings;
pub mod view;

pub use analysis::{
    parse_analysis, ConfidencePanel, DecisionAnalysis, DecisionOption, OptionsPanel, ParseError,
    QuestionsPanel, SituationPanel, ValidationMode, VerdictPanel, Violation,
};
pub use app::{user_message, AppState, AppStatus, SubmitError, Submission, ViewTab};
pub use engine::{
    build_engine, DecisionEngine, DecisionOutcome, EngineError, ErrorKind, FallbackEngine,
    HttpReply, HttpTransport, ProviderClient, ReqwestTransport, TransportError,
};
pub use history::{ConversationHistory, HISTORY_WINDOW};
pub use message::{ChatMessage, Role};
pub use prompts::{DecisionPrompts, LoadError as PromptLoadError};
pub use request::{ChatCompletionRequest, RequestMessage, WireRole};
pub use settings::{Settings, SettingsError};
