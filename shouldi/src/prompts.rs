//! Load the decision system prompt from YAML and apply env overrides.
//!
//! **Canonical source**: the default text lives in `shouldi/prompts/decision.yaml`; it is
//! embedded at compile time and used when no prompts directory is present.
//! Override order: `SHOULDI_SYSTEM_PROMPT` env > `decision.yaml` in the prompts directory > embedded.

use std::path::{Path, PathBuf};

use serde::Deserialize;

const EMBED_DECISION: &str = include_str!("../prompts/decision.yaml");

/// File name looked up under the prompts directory.
const DECISION_FILE: &str = "decision.yaml";

/// Env var that replaces the system prompt text wholesale.
pub const SYSTEM_PROMPT_ENV: &str = "SHOULDI_SYSTEM_PROMPT";

/// Env var naming the prompts directory.
pub const PROMPTS_DIR_ENV: &str = "SHOULDI_PROMPTS_DIR";

/// Error when loading prompts from a directory (missing dir, unreadable or invalid YAML).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("prompts directory not found or not readable: {0}")]
    DirNotFound(String),
    #[error("failed to read prompts file {path}: {message}")]
    ReadFile { path: String, message: String },
    #[error("failed to parse YAML in {path}: {message}")]
    ParseYaml { path: String, message: String },
    #[error("embedded decision prompt is invalid: {0}")]
    Embedded(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DecisionPromptsFile {
    #[serde(default)]
    system_prompt: Option<String>,
}

/// Prompt text used by the request builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionPrompts {
    pub system_prompt: String,
}

fn prompts_dir(dir: Option<&Path>) -> Option<PathBuf> {
    dir.map(Path::to_path_buf)
        .or_else(|| std::env::var(PROMPTS_DIR_ENV).ok().map(PathBuf::from))
}

fn parse_file(content: &str, path: &str) -> Result<DecisionPromptsFile, LoadError> {
    serde_yaml::from_str(content).map_err(|e| LoadError::ParseYaml {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn apply_env(mut prompts: DecisionPrompts) -> DecisionPrompts {
    if let Ok(s) = std::env::var(SYSTEM_PROMPT_ENV) {
        if !s.trim().is_empty() {
            prompts.system_prompt = s;
        }
    }
    prompts
}

/// Returns the prompts parsed from the embedded `decision.yaml`, with env override applied.
pub fn default_from_embedded() -> Result<DecisionPrompts, LoadError> {
    let file = parse_file(EMBED_DECISION, "<embedded decision.yaml>")
        .map_err(|e| LoadError::Embedded(e.to_string()))?;
    let system_prompt = file
        .system_prompt
        .ok_or_else(|| LoadError::Embedded("missing system_prompt".to_string()))?;
    Ok(apply_env(DecisionPrompts { system_prompt }))
}

/// Loads prompts from `dir` (or `SHOULDI_PROMPTS_DIR`).
///
/// A missing `decision.yaml` or a file without `system_prompt` keeps the embedded text.
/// Returns an error when the directory is missing or the file does not parse.
pub fn load(dir: Option<&Path>) -> Result<DecisionPrompts, LoadError> {
    let base = prompts_dir(dir).ok_or_else(|| LoadError::DirNotFound("<unset>".to_string()))?;
    if !base.is_dir() {
        return Err(LoadError::DirNotFound(base.display().to_string()));
    }
    let embedded = default_from_embedded()?;
    let path = base.join(DECISION_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(embedded),
        Err(e) => {
            return Err(LoadError::ReadFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
    };
    let file = parse_file(&content, &path.display().to_string())?;
    let prompts = match file.system_prompt {
        Some(s) if !s.trim().is_empty() => DecisionPrompts { system_prompt: s },
        _ => return Ok(embedded),
    };
    Ok(apply_env(prompts))
}

/// Loads from the prompts directory when one is configured and valid; otherwise the embedded text.
pub fn load_or_default(dir: Option<&Path>) -> Result<DecisionPrompts, LoadError> {
    match load(dir) {
        Ok(p) => Ok(p),
        Err(LoadError::DirNotFound(d)) => {
            tracing::debug!(dir = %d, "no prompts directory, using embedded decision prompt");
            default_from_embedded()
        }
        Err(e) => Err(e),
    }
}
