//! `--json` output: the analysis document or an error object, to stdout or a file.

use std::io::Write;
use std::path::Path;

use serde_json::{json, Value};
use shouldi::DecisionAnalysis;

use crate::CliError;

/// `{ "analysis": <DecisionAnalysis>, "usedFallback": bool }`.
pub fn analysis_json(analysis: &DecisionAnalysis, used_fallback: bool) -> Result<Value, CliError> {
    Ok(json!({
        "analysis": serde_json::to_value(analysis)?,
        "usedFallback": used_fallback,
    }))
}

/// `{ "error": { "code", "message" } }`.
pub fn error_json(err: &CliError) -> Value {
    json!({
        "error": {
            "code": err.code(),
            "message": err.to_string(),
        }
    })
}

/// Writes `value` to `file` (replacing it) or stdout. Pretty is multi-line, otherwise one line.
pub fn write_json_output(value: &Value, file: Option<&Path>, pretty: bool) -> Result<(), CliError> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match file {
        Some(path) => std::fs::write(path, format!("{}\n", s))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", s)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
