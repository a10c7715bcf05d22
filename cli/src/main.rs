//! ShouldI CLI binary: map a dilemma into situation, questions, options, verdict and confidence.
//!
//! Default is one-shot (`shouldi "should I ..."`); `-i` continues in line mode and `tui`
//! opens the full-screen interface. `scenarios` and `prompt` print reference text.

mod log_format;
mod logging;
mod repl;
mod tui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use cli::session::{credential_warning, log_settings};
use cli::{
    analysis_json, build_engine, error_json, load_settings, render_frame, resolve_message,
    write_json_output, CliError, Overrides,
};
use shouldi::view::{present, SCENARIOS};
use shouldi::{
    prompts, user_message, AppState, AppStatus, DecisionEngine, ErrorKind, Settings,
    SettingsError,
};

#[derive(Parser, Debug)]
#[command(name = "shouldi")]
#[command(about = "ShouldI: turn a dilemma into a strategy map")]
struct Args {
    #[command(subcommand)]
    cmd: Option<Command>,

    /// Dilemma text (or pass as positional words)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Positional args: dilemma text when -m/--message is not used
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,

    /// Run example scenario N (1-based, see `shouldi scenarios`)
    #[arg(long, value_name = "N")]
    scenario: Option<usize>,

    /// Line mode: after the first map, keep reading follow-ups from stdin (not with --json)
    #[arg(short, long)]
    interactive: bool,

    /// Print the analysis (or error) as JSON instead of text
    #[arg(long)]
    json: bool,

    /// When using --json, write output to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// When using --json, pretty-print (multi-line)
    #[arg(long)]
    pretty: bool,

    /// Model override (default: SHOULDI_MODEL or the built-in default)
    #[arg(long, global = true, value_name = "NAME")]
    model: Option<String>,

    /// Accept analyses that miss the count/range constraints
    #[arg(long, global = true)]
    lenient: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full-screen terminal interface
    Tui,
    /// List the example scenarios
    Scenarios,
    /// Print the system prompt in use
    Prompt,
}

fn overrides(args: &Args) -> Overrides {
    Overrides {
        model: args.model.clone(),
        lenient: args.lenient,
    }
}

fn print_scenarios() {
    for (i, s) in SCENARIOS.iter().enumerate() {
        println!("{}. {}: {}", i + 1, s.label, s.text);
    }
}

fn prepare(args: &Args) -> Result<(Settings, logging::LogGuard), CliError> {
    let settings = load_settings(&overrides(args))?;
    let guard = logging::init();
    log_settings(&settings);
    if let Some(warning) = credential_warning(&settings) {
        eprintln!("{}", warning);
    }
    Ok((settings, guard))
}

/// The analysis failure shown by `app`, as a CLI error.
fn analysis_error(app: &AppState) -> CliError {
    let kind = app.error_kind().unwrap_or(ErrorKind::DecisionEngineFailure);
    CliError::Analysis {
        kind,
        message: app
            .error()
            .unwrap_or_else(|| user_message(kind))
            .to_string(),
    }
}

async fn one_shot(args: &Args, settings: &Settings, text: &str) -> Result<(), CliError> {
    let engine = build_engine(settings)?;
    let mut app = AppState::new().with_history_window(settings.history_window);
    app.run(engine.as_ref(), Some(text)).await?;

    if args.interactive {
        return repl::run_repl_loop(app, engine.as_ref()).await;
    }
    match (app.status(), app.analysis()) {
        (AppStatus::Analyzed, Some(analysis)) => {
            if args.json {
                let value = analysis_json(analysis, app.used_fallback())?;
                write_json_output(&value, args.file.as_deref(), args.pretty)
            } else {
                print!("{}", render_frame(&present(&app)));
                Ok(())
            }
        }
        _ => {
            let err = analysis_error(&app);
            tracing::warn!(code = err.code(), "analysis failed");
            Err(err)
        }
    }
}

async fn run(args: &Args) -> Result<(), CliError> {
    match args.cmd {
        Some(Command::Scenarios) => {
            print_scenarios();
            return Ok(());
        }
        Some(Command::Prompt) => {
            // `.env` / config.toml may set SHOULDI_SYSTEM_PROMPT or SHOULDI_PROMPTS_DIR.
            config::load_and_apply(shouldi::settings::APP_NAME, None)
                .map_err(SettingsError::from)?;
            print!("{}", prompts::load_or_default(None)?.system_prompt);
            return Ok(());
        }
        Some(Command::Tui) => {
            let (settings, _guard) = prepare(args)?;
            let engine: Arc<dyn DecisionEngine> = build_engine(&settings)?;
            let app = AppState::new().with_history_window(settings.history_window);
            tracing::info!("tui start");
            return tui::run_tui(app, engine).await;
        }
        None => {}
    }

    if args.interactive && args.json {
        return Err(CliError::Usage(
            "--json prints one analysis and cannot be combined with -i/--interactive".to_string(),
        ));
    }
    let text = resolve_message(args.message.clone(), &args.rest, args.scenario)?;
    let (settings, _guard) = prepare(args)?;
    match text {
        Some(text) => one_shot(args, &settings, &text).await,
        None if args.interactive => {
            let engine = build_engine(&settings)?;
            let app = AppState::new().with_history_window(settings.history_window);
            repl::run_repl_loop(app, engine.as_ref()).await
        }
        None => Err(CliError::Usage(
            "provide a dilemma via -m/--message, positional words or --scenario N \
             (or use -i / `shouldi tui`)"
                .to_string(),
        )),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if args.json {
                if let Err(write_err) =
                    write_json_output(&error_json(&e), args.file.as_deref(), args.pretty)
                {
                    eprintln!("shouldi: {}", write_err);
                }
            }
            eprintln!("shouldi: {}", e);
            ExitCode::FAILURE
        }
    }
}
