//! Schema checks the model is asked for but JSON parsing cannot enforce.

use super::types::DecisionAnalysis;

/// Required number of options in panel 3.
pub const REQUIRED_OPTIONS: usize = 3;
/// Allowed number of questions in panel 2 (inclusive).
pub const QUESTIONS_RANGE: std::ops::RangeInclusive<usize> = 3..=5;
/// Allowed confidence range (inclusive).
pub const CONFIDENCE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=100.0;

/// How strictly a parsed reply is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Shape and content constraints are enforced.
    #[default]
    Strict,
    /// Only JSON shape is enforced; counts and ranges are left to the view.
    Lenient,
}

impl std::str::FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(format!(
                "unknown validation mode: {} (use strict or lenient)",
                s
            )),
        }
    }
}

/// One broken constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    OptionCount(usize),
    QuestionCount(usize),
    ConfidenceOutOfRange(f64),
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::OptionCount(n) => {
                write!(f, "panel3 has {} options, expected {}", n, REQUIRED_OPTIONS)
            }
            Violation::QuestionCount(n) => write!(
                f,
                "panel2 has {} questions, expected {}-{}",
                n,
                QUESTIONS_RANGE.start(),
                QUESTIONS_RANGE.end()
            ),
            Violation::ConfidenceOutOfRange(v) => {
                write!(f, "panel5 confidenceScore {} is outside 0-100", v)
            }
        }
    }
}

/// Returns every violated constraint; empty means valid.
pub fn violations(analysis: &DecisionAnalysis) -> Vec<Violation> {
    let mut out = Vec::new();
    let options = analysis.panel3.options.len();
    if options != REQUIRED_OPTIONS {
        out.push(Violation::OptionCount(options));
    }
    let questions = analysis.panel2.questions.len();
    if !QUESTIONS_RANGE.contains(&questions) {
        out.push(Violation::QuestionCount(questions));
    }
    let score = analysis.panel5.confidence_score;
    if !score.is_finite() || !CONFIDENCE_RANGE.contains(&score) {
        out.push(Violation::ConfidenceOutOfRange(score));
    }
    out
}
