//! Response parser and validator for the model's structured reply.
//!
//! [`parse_analysis`] turns the `choices[0].message.content` string into a
//! [`DecisionAnalysis`]. Syntax errors stay unclassified (the engine sniffs their
//! message); shape errors and, in [`ValidationMode::Strict`], constraint violations
//! become `MalformedResponse` upstream.

mod parse;
mod types;
mod validate;

#[cfg(test)]
pub(crate) mod fixtures;

pub use parse::{parse_analysis, ParseError};
pub use types::{
    ConfidencePanel, DecisionAnalysis, DecisionOption, OptionsPanel, QuestionsPanel,
    SituationPanel, VerdictPanel,
};
pub use validate::{
    violations, ValidationMode, Violation, CONFIDENCE_RANGE, QUESTIONS_RANGE, REQUIRED_OPTIONS,
};
