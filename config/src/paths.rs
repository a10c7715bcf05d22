//! Per-user directories for an app: config home and log directory.

use std::path::PathBuf;

fn non_empty_env(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// `$XDG_CONFIG_HOME`, else the platform config dir (`~/.config` on Linux).
pub fn config_home() -> Option<PathBuf> {
    non_empty_env("XDG_CONFIG_HOME").or_else(dirs::config_dir)
}

/// `<config home>/<app>/config.toml`. The file may not exist.
pub fn config_file(app: &str) -> Option<PathBuf> {
    config_home().map(|home| home.join(app).join("config.toml"))
}

/// Directory for log files.
///
/// `override_var` (e.g. `SHOULDI_LOG_DIR`) wins when set; otherwise
/// `$XDG_STATE_HOME/<app>/logs`, the platform local data dir, and finally the temp dir.
pub fn log_dir(app: &str, override_var: &str) -> PathBuf {
    if let Some(dir) = non_empty_env(override_var) {
        return dir;
    }
    non_empty_env("XDG_STATE_HOME")
        .or_else(dirs::state_dir)
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(app)
        .join("logs")
}
