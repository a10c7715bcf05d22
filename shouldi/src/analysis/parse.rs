//! Parse the model's content string into a [`DecisionAnalysis`].

use serde_json::error::Category;
use serde_json::Value;

use super::types::DecisionAnalysis;
use super::validate::{violations, ValidationMode, Violation};

/// Why a content string did not yield an analysis.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Not JSON at all. Carries no structured kind; the engine classifies it by message.
    #[error("{0}")]
    Syntax(serde_json::Error),
    /// Valid JSON that does not have the analysis shape (missing panel, wrong type).
    #[error("unexpected analysis shape: {0}")]
    Shape(serde_json::Error),
    /// Shape is right but content constraints are broken (strict mode only).
    #[error("analysis violates constraints: {}", join_violations(.0))]
    Invalid(Vec<Violation>),
}

fn join_violations(v: &[Violation]) -> String {
    v.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parses `text` as a decision analysis and, in strict mode, checks counts and ranges.
///
/// Lenient mode also accepts a numeric string for `panel5.confidenceScore`; any other type
/// mismatch is a shape error in both modes.
pub fn parse_analysis(text: &str, mode: ValidationMode) -> Result<DecisionAnalysis, ParseError> {
    let mut value: Value = serde_json::from_str(text).map_err(|e| match e.classify() {
        Category::Data => ParseError::Shape(e),
        Category::Syntax | Category::Eof | Category::Io => ParseError::Syntax(e),
    })?;
    if mode == ValidationMode::Lenient {
        coerce_confidence(&mut value);
    }
    let analysis: DecisionAnalysis = serde_json::from_value(value).map_err(ParseError::Shape)?;
    if mode == ValidationMode::Strict {
        let found = violations(&analysis);
        if !found.is_empty() {
            return Err(ParseError::Invalid(found));
        }
    }
    Ok(analysis)
}

/// `"85"` or `" 72.5 "` becomes a number; anything unparsable is left for serde to reject.
fn coerce_confidence(value: &mut Value) {
    let Some(score) = value.pointer_mut("/panel5/confidenceScore") else {
        return;
    };
    let parsed = score
        .as_str()
        .and_then(|s| s.trim().trim_end_matches('%').parse::<f64>().ok())
        .and_then(serde_json::Number::from_f64);
    if let Some(n) = parsed {
        *score = Value::Number(n);
    }
}
