//! Line mode (`-i/--interactive`): read a line, run it through the state machine, print the frame.
//!
//! Plain lines are dilemmas or follow-ups. Slash commands: `/reset`, `/retry`, `/tab NAME`,
//! `/scenario N`, `/show`, `/help`; `quit`, `exit` or `/quit` (or EOF) leave.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use cli::session::scenario_text;
use cli::{render_frame, CliError};
use shouldi::view::{self, present};
use shouldi::{AppState, DecisionEngine, SubmitError, ViewTab};

const HELP: &str = "\
commands:
  <text>         describe a dilemma, or ask a follow-up after a map
  /scenario N    run example scenario N (1-3)
  /tab NAME      switch view: map, lab, quick
  /retry         dismiss an error
  /reset         start over (clears history)
  /show          print the current screen
  /quit          leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Reset,
    Retry,
    Tab(ViewTab),
    Scenario(usize),
    Show,
    Help,
    Submit(String),
    Empty,
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    if matches!(line.to_lowercase().as_str(), "quit" | "exit") {
        return ReplCommand::Quit;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ReplCommand::Submit(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((n, a)) => (n, a.trim()),
        None => (rest, ""),
    };
    match name.to_lowercase().as_str() {
        "quit" | "exit" => ReplCommand::Quit,
        "reset" => ReplCommand::Reset,
        "retry" => ReplCommand::Retry,
        "show" => ReplCommand::Show,
        "help" => ReplCommand::Help,
        "tab" => match arg.parse::<ViewTab>() {
            Ok(tab) => ReplCommand::Tab(tab),
            Err(e) => ReplCommand::Invalid(e),
        },
        "scenario" => match arg.parse::<usize>() {
            Ok(n) => ReplCommand::Scenario(n),
            Err(_) => ReplCommand::Invalid(format!("usage: /scenario N, got {:?}", arg)),
        },
        other => ReplCommand::Invalid(format!("unknown command /{} (try /help)", other)),
    }
}

fn print_frame<W: Write>(app: &AppState, out: &mut W) -> Result<(), CliError> {
    write!(out, "{}", render_frame(&present(app)))?;
    Ok(())
}

async fn submit<W: Write>(
    app: &mut AppState,
    engine: &dyn DecisionEngine,
    text: &str,
    out: &mut W,
) -> Result<(), CliError> {
    if !app.can_submit() {
        match app.submit(Some(text)) {
            Err(SubmitError::NotReady) => writeln!(out, "dismiss the error first: /retry")?,
            Err(e) => writeln!(out, "{}", e)?,
            Ok(_) => {}
        }
        return Ok(());
    }
    writeln!(out, "{}", view::LOADING_TEXT)?;
    out.flush()?;
    app.run(engine, Some(text)).await?;
    print_frame(app, out)
}

/// Applies one command. Output goes to `out` so tests can capture it.
pub async fn handle<W: Write>(
    app: &mut AppState,
    engine: &dyn DecisionEngine,
    cmd: ReplCommand,
    out: &mut W,
) -> Result<Flow, CliError> {
    match cmd {
        ReplCommand::Quit => return Ok(Flow::Quit),
        ReplCommand::Empty => {}
        ReplCommand::Help => writeln!(out, "{}", HELP)?,
        ReplCommand::Invalid(msg) => writeln!(out, "{}", msg)?,
        ReplCommand::Show => print_frame(app, out)?,
        ReplCommand::Reset => {
            app.reset();
            print_frame(app, out)?;
        }
        ReplCommand::Retry => {
            if app.retry() {
                print_frame(app, out)?;
            } else {
                writeln!(out, "nothing to retry")?;
            }
        }
        ReplCommand::Tab(tab) => {
            if app.select_tab(tab) {
                print_frame(app, out)?;
            } else {
                writeln!(out, "tabs are available once a map is shown")?;
            }
        }
        ReplCommand::Scenario(n) => match scenario_text(n) {
            Ok(text) => submit(app, engine, text, out).await?,
            Err(e) => writeln!(out, "{}", e)?,
        },
        ReplCommand::Submit(text) => submit(app, engine, &text, out).await?,
    }
    Ok(Flow::Continue)
}

/// Runs the loop on stdin/stdout until EOF or a quit command.
pub async fn run_repl_loop(mut app: AppState, engine: &dyn DecisionEngine) -> Result<(), CliError> {
    let mut reader = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();
    print_frame(&app, &mut stdout)?;
    writeln!(stdout, "(/help for commands)")?;

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let Some(line) = reader.next_line().await? else {
            break;
        };
        if handle(&mut app, engine, parse_command(&line), &mut stdout).await? == Flow::Quit {
            break;
        }
    }

    writeln!(stdout, "Bye.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shouldi::{AppStatus, DecisionOutcome, EngineError, ValidationMode};
    use std::sync::atomic::{AtomicBool, Ordering};

    const ANALYSIS: &str = r#"{
        "chatResponse": "Map ready.",
        "panel1": { "title": "Situation", "narration": "n" },
        "panel2": { "title": "Questions", "questions": ["a?", "b?", "c?"] },
        "panel3": { "title": "Options", "options": [
            { "name": "One", "description": "d", "pros": [], "cons": [], "tradeOff": "t" },
            { "name": "Two", "description": "d", "pros": [], "cons": [], "tradeOff": "t" },
            { "name": "Three", "description": "d", "pros": [], "cons": [], "tradeOff": "t" }
        ] },
        "panel4": { "title": "Verdict", "verdict": "Two", "reasoning": "r", "assumptions": [] },
        "panel5": { "title": "Confidence", "confidenceScore": 55, "explanation": "e" }
    }"#;

    /// Succeeds, or fails with quota when `fail` is set.
    #[derive(Default)]
    struct StubEngine {
        fail: AtomicBool,
    }

    #[async_trait]
    impl DecisionEngine for StubEngine {
        async fn analyze(
            &self,
            _history: &[shouldi::ChatMessage],
        ) -> Result<DecisionOutcome, EngineError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(EngineError::QuotaExceeded);
            }
            let analysis = shouldi::parse_analysis(ANALYSIS, ValidationMode::Strict)
                .map_err(EngineError::from)?;
            Ok(DecisionOutcome {
                analysis,
                used_fallback: false,
            })
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("  "), ReplCommand::Empty);
        assert_eq!(parse_command("EXIT"), ReplCommand::Quit);
        assert_eq!(parse_command("/quit"), ReplCommand::Quit);
        assert_eq!(parse_command("/tab lab"), ReplCommand::Tab(ViewTab::Lab));
        assert_eq!(parse_command("/scenario 2"), ReplCommand::Scenario(2));
        assert_eq!(
            parse_command("should I move?"),
            ReplCommand::Submit("should I move?".to_string())
        );
        assert!(matches!(parse_command("/tab nope"), ReplCommand::Invalid(_)));
        assert!(matches!(parse_command("/scenario x"), ReplCommand::Invalid(_)));
        assert!(matches!(parse_command("/frobnicate"), ReplCommand::Invalid(_)));
    }

    #[tokio::test]
    async fn submit_prints_map_and_tab_switches() {
        let engine = StubEngine::default();
        let mut app = AppState::new();
        let mut out = Vec::new();

        let flow = handle(&mut app, &engine, parse_command("coffee?"), &mut out)
            .await
            .unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(app.status(), AppStatus::Analyzed);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Running Simulation…\n"));
        assert!(text.contains("== SITUATION =="));
        assert!(text.contains("engine: Map ready."));

        let mut out = Vec::new();
        handle(&mut app, &engine, ReplCommand::Tab(ViewTab::Lab), &mut out)
            .await
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("not implemented"));
    }

    #[tokio::test]
    async fn error_blocks_submission_until_retry() {
        let engine = StubEngine::default();
        engine.fail.store(true, Ordering::SeqCst);
        let mut app = AppState::new();
        let mut out = Vec::new();

        handle(&mut app, &engine, ReplCommand::Scenario(1), &mut out)
            .await
            .unwrap();
        assert_eq!(app.status(), AppStatus::Error);
        assert!(String::from_utf8(out).unwrap().contains("System Panic!"));

        let mut out = Vec::new();
        handle(&mut app, &engine, parse_command("again"), &mut out)
            .await
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("/retry"));
        assert_eq!(app.status(), AppStatus::Error);

        engine.fail.store(false, Ordering::SeqCst);
        let mut out = Vec::new();
        handle(&mut app, &engine, ReplCommand::Retry, &mut out).await.unwrap();
        handle(&mut app, &engine, parse_command("again"), &mut out)
            .await
            .unwrap();
        assert_eq!(app.status(), AppStatus::Analyzed);
    }

    #[tokio::test]
    async fn quit_and_reset() {
        let engine = StubEngine::default();
        let mut app = AppState::new();
        let mut out = Vec::new();
        handle(&mut app, &engine, parse_command("x"), &mut out).await.unwrap();
        handle(&mut app, &engine, ReplCommand::Reset, &mut out).await.unwrap();
        assert_eq!(app.status(), AppStatus::Idle);
        assert!(app.history().is_empty());
        assert_eq!(
            handle(&mut app, &engine, ReplCommand::Quit, &mut out).await.unwrap(),
            Flow::Quit
        );
    }
}
