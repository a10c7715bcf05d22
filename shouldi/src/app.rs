//! Application state machine: idle → loading → analyzed | error.
//!
//! Owns the current analysis, the conversation history and the status that selects the
//! view. Every transition is triggered either by a user action or by the settlement of the
//! single in-flight request; there are no timers and no automatic retries.

use crate::analysis::DecisionAnalysis;
use crate::engine::{DecisionEngine, DecisionOutcome, EngineError, ErrorKind};
use crate::history::{ConversationHistory, HISTORY_WINDOW};
use crate::message::ChatMessage;

/// Assistant turn recorded when the reply has no `chatResponse`.
pub const PLACEHOLDER_REPLY: &str = "Strategy map updated.";
/// Shown for `QuotaExceeded`.
pub const QUOTA_MESSAGE: &str = "Decision engine is at capacity. Please try again shortly.";
/// Shown for `CredentialMissing`.
pub const CREDENTIAL_MESSAGE: &str =
    "API key not found. Set GROQ_API_KEY in your environment, .env file or config.toml.";
/// Shown for every other failure.
pub const GENERIC_MESSAGE: &str = "Critical failure. The paths are unclear right now.";

/// Which view renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppStatus {
    #[default]
    Idle,
    Loading,
    Analyzed,
    Error,
}

/// Tab of the analyzed view. Only `Map` has a panel layout today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewTab {
    #[default]
    Map,
    Lab,
    Quick,
}

impl ViewTab {
    pub const ALL: [ViewTab; 3] = [ViewTab::Map, ViewTab::Lab, ViewTab::Quick];

    pub fn label(&self) -> &'static str {
        match self {
            ViewTab::Map => "map",
            ViewTab::Lab => "lab",
            ViewTab::Quick => "quick",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ViewTab::Map => ViewTab::Lab,
            ViewTab::Lab => ViewTab::Quick,
            ViewTab::Quick => ViewTab::Map,
        }
    }

    pub fn is_implemented(&self) -> bool {
        matches!(self, ViewTab::Map)
    }
}

impl std::str::FromStr for ViewTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "map" => Ok(Self::Map),
            "lab" => Ok(Self::Lab),
            "quick" => Ok(Self::Quick),
            _ => Err(format!("unknown tab: {} (use map, lab or quick)", s)),
        }
    }
}

/// User-facing message for a failure kind.
pub fn user_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::QuotaExceeded => QUOTA_MESSAGE,
        ErrorKind::CredentialMissing => CREDENTIAL_MESSAGE,
        _ => GENERIC_MESSAGE,
    }
}

/// Why a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("a decision request is already in flight")]
    InFlight,
    #[error("dismiss the error before submitting again")]
    NotReady,
}

/// An accepted submission: the history to send and the ticket to settle it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ticket: u64,
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Clone)]
struct Pending {
    ticket: u64,
    history: ConversationHistory,
}

/// Session state: status, input, analysis, history, error, tab.
#[derive(Debug, Clone)]
pub struct AppState {
    status: AppStatus,
    input: String,
    analysis: Option<DecisionAnalysis>,
    history: ConversationHistory,
    error: Option<String>,
    error_kind: Option<ErrorKind>,
    active_tab: ViewTab,
    used_fallback: bool,
    history_window: usize,
    pending: Option<Pending>,
    next_ticket: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            status: AppStatus::Idle,
            input: String::new(),
            analysis: None,
            history: ConversationHistory::new(),
            error: None,
            error_kind: None,
            active_tab: ViewTab::Map,
            used_fallback: false,
            history_window: HISTORY_WINDOW,
            pending: None,
            next_ticket: 1,
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window.max(1);
        self
    }

    pub fn status(&self) -> AppStatus {
        self.status
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn analysis(&self) -> Option<&DecisionAnalysis> {
        self.analysis.as_ref()
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    pub fn active_tab(&self) -> ViewTab {
        self.active_tab
    }

    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    /// Whether a new submission would be accepted (ignoring empty text).
    pub fn can_submit(&self) -> bool {
        matches!(self.status, AppStatus::Idle | AppStatus::Analyzed)
    }

    /// Submits `text`, or the input field when `text` is `None`.
    ///
    /// Blank text is a no-op (`Ok(None)`). Accepted from `Idle` and, as a follow-up turn,
    /// from `Analyzed`. Refused while loading or while an error is shown.
    pub fn submit(&mut self, text: Option<&str>) -> Result<Option<Submission>, SubmitError> {
        match self.status {
            AppStatus::Loading => return Err(SubmitError::InFlight),
            AppStatus::Error => return Err(SubmitError::NotReady),
            AppStatus::Idle | AppStatus::Analyzed => {}
        }
        let msg = text.unwrap_or(self.input.as_str()).trim().to_string();
        if msg.is_empty() {
            return Ok(None);
        }

        let sent = self.history.with_user_turn(msg, self.history_window);
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        self.status = AppStatus::Loading;
        self.error = None;
        self.error_kind = None;
        self.used_fallback = false;
        let submission = Submission {
            ticket,
            history: sent.messages().to_vec(),
        };
        self.pending = Some(Pending {
            ticket,
            history: sent,
        });
        Ok(Some(submission))
    }

    /// Applies the result of the request identified by `ticket`.
    ///
    /// Returns false (and changes nothing) when that request is no longer current,
    /// e.g. after a reset while it was in flight.
    pub fn settle(&mut self, ticket: u64, result: Result<DecisionOutcome, EngineError>) -> bool {
        if self.status != AppStatus::Loading {
            return false;
        }
        let pending = match self.pending.take() {
            Some(p) if p.ticket == ticket => p,
            other => {
                self.pending = other;
                return false;
            }
        };

        match result {
            Ok(outcome) => {
                let reply = outcome
                    .analysis
                    .chat_response()
                    .unwrap_or(PLACEHOLDER_REPLY)
                    .to_string();
                let mut history = pending.history;
                history.append(ChatMessage::assistant(reply));
                self.history = history;
                self.analysis = Some(outcome.analysis);
                self.used_fallback = outcome.used_fallback;
                self.input.clear();
                self.active_tab = ViewTab::Map;
                self.status = AppStatus::Analyzed;
            }
            Err(e) => {
                let kind = e.kind();
                tracing::warn!(kind = kind.code(), error = %e, "decision request failed");
                self.error = Some(user_message(kind).to_string());
                self.error_kind = Some(kind);
                self.status = AppStatus::Error;
            }
        }
        true
    }

    /// Submits, runs the request on `engine` and settles it. Returns the submission's
    /// ticket, or `None` when the text was blank.
    pub async fn run(
        &mut self,
        engine: &dyn DecisionEngine,
        text: Option<&str>,
    ) -> Result<Option<u64>, SubmitError> {
        let Some(submission) = self.submit(text)? else {
            return Ok(None);
        };
        let result = engine.analyze(&submission.history).await;
        self.settle(submission.ticket, result);
        Ok(Some(submission.ticket))
    }

    /// Error → Idle. Does not resubmit; history is kept. Returns whether it applied.
    pub fn retry(&mut self) -> bool {
        if self.status != AppStatus::Error {
            return false;
        }
        self.status = AppStatus::Idle;
        true
    }

    /// Header reset: back to Idle from anywhere, dropping analysis and history.
    pub fn reset(&mut self) {
        self.status = AppStatus::Idle;
        self.analysis = None;
        self.history.clear();
        self.error = None;
        self.error_kind = None;
        self.used_fallback = false;
        self.pending = None;
        self.active_tab = ViewTab::Map;
    }

    /// Selects a tab; only meaningful while analyzed.
    pub fn select_tab(&mut self, tab: ViewTab) -> bool {
        if self.status != AppStatus::Analyzed {
            return false;
        }
        self.active_tab = tab;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::sample_analysis;

    fn outcome() -> Result<DecisionOutcome, EngineError> {
        Ok(DecisionOutcome {
            analysis: sample_analysis(),
            used_fallback: false,
        })
    }

    #[test]
    fn blank_submit_is_noop() {
        let mut app = AppState::new();
        app.set_input("   \n\t");
        assert_eq!(app.submit(None), Ok(None));
        assert_eq!(app.status(), AppStatus::Idle);
        assert!(app.history().is_empty());
    }

    #[test]
    fn submit_moves_to_loading_and_sends_trimmed_text() {
        let mut app = AppState::new();
        app.set_input("  Should I move to Japan?  ");
        let sub = app.submit(None).unwrap().unwrap();
        assert_eq!(app.status(), AppStatus::Loading);
        assert_eq!(sub.history, vec![ChatMessage::user("Should I move to Japan?")]);
        // history is committed only on success
        assert!(app.history().is_empty());
    }

    #[test]
    fn success_stores_analysis_and_history() {
        let mut app = AppState::new();
        app.set_input("dilemma");
        let sub = app.submit(None).unwrap().unwrap();
        assert!(app.settle(sub.ticket, outcome()));
        assert_eq!(app.status(), AppStatus::Analyzed);
        assert_eq!(app.analysis(), Some(&sample_analysis()));
        assert_eq!(
            app.history().messages(),
            &[
                ChatMessage::user("dilemma"),
                ChatMessage::assistant("Two roads, one bean. Here is your map."),
            ]
        );
        assert_eq!(app.input(), "");
        assert_eq!(app.active_tab(), ViewTab::Map);
    }

    #[test]
    fn missing_chat_response_records_placeholder() {
        let mut app = AppState::new();
        let sub = app.submit(Some("x")).unwrap().unwrap();
        let mut analysis = sample_analysis();
        analysis.chat_response = None;
        app.settle(
            sub.ticket,
            Ok(DecisionOutcome {
                analysis,
                used_fallback: true,
            }),
        );
        assert_eq!(app.history().last().unwrap().text, PLACEHOLDER_REPLY);
        assert!(app.used_fallback());
    }

    #[test]
    fn failure_maps_kind_to_message_and_keeps_history() {
        let mut app = AppState::new();
        let sub = app.submit(Some("x")).unwrap().unwrap();
        app.settle(sub.ticket, Err(EngineError::QuotaExceeded));
        assert_eq!(app.status(), AppStatus::Error);
        assert_eq!(app.error(), Some(QUOTA_MESSAGE));
        assert_eq!(app.error_kind(), Some(ErrorKind::QuotaExceeded));
        assert!(app.history().is_empty());

        assert!(app.retry());
        let sub = app.submit(Some("y")).unwrap().unwrap();
        app.settle(sub.ticket, Err(EngineError::CredentialMissing));
        assert_eq!(app.error(), Some(CREDENTIAL_MESSAGE));

        app.retry();
        let sub = app.submit(Some("z")).unwrap().unwrap();
        app.settle(sub.ticket, Err(EngineError::EmptyResponse));
        assert_eq!(app.error(), Some(GENERIC_MESSAGE));
    }

    #[test]
    fn double_submit_is_refused_while_loading() {
        let mut app = AppState::new();
        app.submit(Some("first")).unwrap();
        assert_eq!(app.submit(Some("second")), Err(SubmitError::InFlight));
        assert!(!app.can_submit());
    }

    #[test]
    fn submit_from_error_requires_retry() {
        let mut app = AppState::new();
        let sub = app.submit(Some("x")).unwrap().unwrap();
        app.settle(sub.ticket, Err(EngineError::EmptyResponse));
        assert_eq!(app.submit(Some("again")), Err(SubmitError::NotReady));
        assert!(app.retry());
        assert_eq!(app.status(), AppStatus::Idle);
        assert!(!app.retry());
    }

    #[test]
    fn follow_up_from_analyzed_carries_history() {
        let mut app = AppState::new();
        let sub = app.submit(Some("first")).unwrap().unwrap();
        app.settle(sub.ticket, outcome());
        app.select_tab(ViewTab::Lab);
        let sub = app.submit(Some("what about money?")).unwrap().unwrap();
        assert_eq!(sub.history.len(), 3);
        assert_eq!(sub.history[2], ChatMessage::user("what about money?"));
        app.settle(sub.ticket, outcome());
        assert_eq!(app.history().len(), 4);
        assert_eq!(app.active_tab(), ViewTab::Map);
    }

    #[test]
    fn sent_history_never_exceeds_window() {
        let mut app = AppState::new();
        for i in 0..5 {
            let text = format!("turn {}", i);
            let sub = app.submit(Some(text.as_str())).unwrap().unwrap();
            assert!(sub.history.len() <= HISTORY_WINDOW);
            assert_eq!(sub.history.last().unwrap().text, format!("turn {}", i));
            app.settle(sub.ticket, outcome());
        }
    }

    #[test]
    fn reset_from_any_status_returns_to_idle() {
        let mut app = AppState::new();
        let sub = app.submit(Some("x")).unwrap().unwrap();
        app.settle(sub.ticket, outcome());
        app.reset();
        assert_eq!(app.status(), AppStatus::Idle);
        assert!(app.analysis().is_none());
        assert!(app.history().is_empty());

        app.submit(Some("y")).unwrap();
        app.reset();
        assert_eq!(app.status(), AppStatus::Idle);

        let sub = app.submit(Some("z")).unwrap().unwrap();
        app.settle(sub.ticket, Err(EngineError::QuotaExceeded));
        app.reset();
        assert_eq!(app.status(), AppStatus::Idle);
        assert!(app.error().is_none());
    }

    #[test]
    fn stale_settlement_after_reset_is_ignored() {
        let mut app = AppState::new();
        let stale = app.submit(Some("x")).unwrap().unwrap();
        app.reset();
        let fresh = app.submit(Some("y")).unwrap().unwrap();
        assert!(!app.settle(stale.ticket, outcome()));
        assert_eq!(app.status(), AppStatus::Loading);
        assert!(app.settle(fresh.ticket, outcome()));
        assert_eq!(app.history().messages()[0].text, "y");
    }

    #[test]
    fn tabs_only_selectable_when_analyzed() {
        let mut app = AppState::new();
        assert!(!app.select_tab(ViewTab::Quick));
        let sub = app.submit(Some("x")).unwrap().unwrap();
        app.settle(sub.ticket, outcome());
        assert!(app.select_tab(ViewTab::Quick));
        assert_eq!(app.active_tab(), ViewTab::Quick);
        assert_eq!(ViewTab::Quick.next(), ViewTab::Map);
        assert!(!ViewTab::Lab.is_implemented());
        assert_eq!("LAB".parse::<ViewTab>().unwrap(), ViewTab::Lab);
    }
}
