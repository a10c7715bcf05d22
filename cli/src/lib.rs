//! Library side of the `shouldi` binary: session setup, text rendering and JSON output.
//!
//! The binary adds logging, the line-mode loop (`repl`) and the full-screen TUI (`tui`).

mod error;
pub mod output;
pub mod render;
pub mod session;

pub use error::CliError;
pub use output::{analysis_json, error_json, write_json_output};
pub use render::{render_frame, render_panel};
pub use session::{build_engine, load_settings, resolve_message, Overrides};
