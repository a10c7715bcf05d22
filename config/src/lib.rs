//! Environment configuration shared by the shouldi crates.
//!
//! Two optional files feed the process environment:
//!
//! - project `.env` (current directory, or an explicit directory),
//! - `$XDG_CONFIG_HOME/<app>/config.toml`, `[env]` table.
//!
//! [`load_and_apply`] sets a key only when the process env does not already have it, so the
//! priority is **process env > .env > config.toml**. Settings are then read from the env by
//! the caller.

mod dotenv;
pub mod paths;
mod xdg_toml;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use paths::{config_file, config_home, log_dir};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Where an applied value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Dotenv,
    ConfigToml,
}

/// Keys written into the process env by [`load_and_apply`], sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Applied {
    pub keys: Vec<(String, Source)>,
}

impl Applied {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn source_of(&self, key: &str) -> Option<Source> {
        self.keys.iter().find(|(k, _)| k == key).map(|(_, s)| *s)
    }
}

/// Picks, for every key not already set, the `.env` value or else the config.toml value.
fn merge<F>(
    dotenv: HashMap<String, String>,
    toml_env: HashMap<String, String>,
    is_set: F,
) -> Vec<(String, String, Source)>
where
    F: Fn(&str) -> bool,
{
    let mut out: Vec<(String, String, Source)> = dotenv
        .into_iter()
        .map(|(k, v)| (k, v, Source::Dotenv))
        .collect();
    for (k, v) in toml_env {
        if !out.iter().any(|(existing, _, _)| *existing == k) {
            out.push((k, v, Source::ConfigToml));
        }
    }
    out.retain(|(k, _, _)| !is_set(k));
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

/// Loads `.env` and `config.toml` for `app` and applies missing keys to the process env.
///
/// * `app`: directory name under the config home, e.g. `"shouldi"`.
/// * `dotenv_dir`: directory holding `.env`; `None` means the current directory.
pub fn load_and_apply(app: &str, dotenv_dir: Option<&Path>) -> Result<Applied, LoadError> {
    let toml_env = xdg_toml::load_env_map(app)?;
    let dotenv = dotenv::load_env_map(dotenv_dir)?;

    let mut applied = Applied::default();
    for (key, value, source) in merge(dotenv, toml_env, |k| std::env::var_os(k).is_some()) {
        std::env::set_var(&key, value);
        applied.keys.push((key, source));
    }
    Ok(applied)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_env::with_config_home;
    use std::env;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn merge_prefers_dotenv_and_skips_set_keys() {
        let merged = merge(
            map(&[("A", "dotenv"), ("SET", "dotenv")]),
            map(&[("A", "toml"), ("B", "toml")]),
            |k| k == "SET",
        );
        assert_eq!(
            merged,
            vec![
                ("A".to_string(), "dotenv".to_string(), Source::Dotenv),
                ("B".to_string(), "toml".to_string(), Source::ConfigToml),
            ]
        );
    }

    #[test]
    fn applies_in_priority_order() {
        let home = tempfile::tempdir().unwrap();
        let app_dir = home.path().join("config-test-app");
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(
            app_dir.join("config.toml"),
            "[env]\nCFG_TEST_BOTH = \"toml\"\nCFG_TEST_TOML = \"toml\"\nCFG_TEST_ENV = \"toml\"\n",
        )
        .unwrap();
        let project = tempfile::tempdir().unwrap();
        std::fs::write(project.path().join(".env"), "CFG_TEST_BOTH=dotenv\n").unwrap();

        let (applied, both, only_toml, existing) = with_config_home(home.path(), || {
            env::set_var("CFG_TEST_ENV", "process");
            env::remove_var("CFG_TEST_BOTH");
            env::remove_var("CFG_TEST_TOML");
            let applied = load_and_apply("config-test-app", Some(project.path())).unwrap();
            let read = |k: &str| env::var(k).unwrap();
            let out = (
                applied,
                read("CFG_TEST_BOTH"),
                read("CFG_TEST_TOML"),
                read("CFG_TEST_ENV"),
            );
            for k in ["CFG_TEST_BOTH", "CFG_TEST_TOML", "CFG_TEST_ENV"] {
                env::remove_var(k);
            }
            out
        });

        assert_eq!(both, "dotenv");
        assert_eq!(only_toml, "toml");
        assert_eq!(existing, "process");
        assert_eq!(applied.source_of("CFG_TEST_BOTH"), Some(Source::Dotenv));
        assert_eq!(applied.source_of("CFG_TEST_TOML"), Some(Source::ConfigToml));
        assert_eq!(applied.source_of("CFG_TEST_ENV"), None);
    }

    #[test]
    fn nothing_to_load_is_ok_and_empty() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let applied =
            with_config_home(home.path(), || load_and_apply("config-test-none", Some(project.path())))
                .unwrap();
        assert!(applied.is_empty());
    }

    #[test]
    fn broken_config_toml_is_an_error() {
        let home = tempfile::tempdir().unwrap();
        let app_dir = home.path().join("config-test-broken");
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.toml"), "not [[ toml").unwrap();
        let project = tempfile::tempdir().unwrap();

        let result = with_config_home(home.path(), || {
            load_and_apply("config-test-broken", Some(project.path()))
        });
        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }
}
