//! Decision analysis as returned by the model: `chatResponse` plus five panels.
//!
//! Field names on the wire are camelCase (`tradeOff`, `confidenceScore`, `chatResponse`).

use serde::{Deserialize, Serialize};

/// One weighed path in panel 3. Identity is its position in the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOption {
    pub name: String,
    pub description: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub trade_off: String,
}

/// Panel 1: situation framing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SituationPanel {
    pub title: String,
    pub narration: String,
}

/// Panel 2: key questions (3–5 expected).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionsPanel {
    pub title: String,
    pub questions: Vec<String>,
}

/// Panel 3: exactly three options expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsPanel {
    pub title: String,
    pub options: Vec<DecisionOption>,
}

/// Panel 4: the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictPanel {
    pub title: String,
    pub verdict: String,
    pub reasoning: String,
    pub assumptions: Vec<String>,
}

/// Panel 5: confidence, intended range 0–100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidencePanel {
    pub title: String,
    pub confidence_score: f64,
    pub explanation: String,
}

/// Full structured reply. Replaced wholesale on every successful request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_response: Option<String>,
    pub panel1: SituationPanel,
    pub panel2: QuestionsPanel,
    pub panel3: OptionsPanel,
    pub panel4: VerdictPanel,
    pub panel5: ConfidencePanel,
}

impl DecisionAnalysis {
    /// `chatResponse` when present and non-blank.
    pub fn chat_response(&self) -> Option<&str> {
        self.chat_response
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}
