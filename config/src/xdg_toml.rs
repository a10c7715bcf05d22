//! `[env]` table of `<config home>/<app>/config.toml`.
//!
//! ```toml
//! [env]
//! GROQ_API_KEY = "gsk_..."
//! SHOULDI_FALLBACK_MODEL = "llama-3.1-8b-instant"
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use crate::{paths, LoadError};

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, String>,
}

/// Reads the `[env]` table for `app`. No config home, no file or no table: empty map.
pub(crate) fn load_env_map(app: &str) -> Result<HashMap<String, String>, LoadError> {
    let Some(path) = paths::config_file(app) else {
        return Ok(HashMap::new());
    };
    if !path.is_file() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read_to_string(&path).map_err(|source| LoadError::Read {
        path: path.clone(),
        source,
    })?;
    let file: ConfigFile =
        toml::from_str(&content).map_err(|source| LoadError::Parse { path, source })?;
    Ok(file.env)
}
