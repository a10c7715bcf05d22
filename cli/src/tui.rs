//! Full-screen terminal UI (`shouldi tui`), ratatui over crossterm.
//!
//! One event loop owns the [`AppState`]. A submission is spawned as a task whose result
//! comes back over an mpsc channel and is applied with [`AppState::settle`]; the state
//! machine refuses a second submission while one is in flight.

use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Tabs, Wrap};
use ratatui::{Frame as TermFrame, Terminal};
use tokio::sync::mpsc;

use cli::CliError;
use shouldi::view::{
    self, present, ChatLine, Frame, Header, PanelAccent, PanelLine, PanelVariant, PanelView,
    Screen, TabBody, SCENARIOS,
};
use shouldi::{AppState, AppStatus, DecisionEngine, DecisionOutcome, EngineError, ViewTab};

const TICK: Duration = Duration::from_millis(100);
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
const PANELS_PER_ROW: usize = 3;
const HISTORY_ROWS: usize = 4;

type Settlement = (u64, Result<DecisionOutcome, EngineError>);

/// Raw mode plus alternate screen for the guard's lifetime.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self, CliError> {
        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                leave_screen(&mut std::io::stdout());
                Err(e.into())
            }
        }
    }
}

/// Undoes [`TerminalGuard::enter`]. Errors are ignored.
fn leave_screen<W: std::io::Write>(out: &mut W) {
    let _ = disable_raw_mode();
    let _ = execute!(out, LeaveAlternateScreen);
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        leave_screen(self.terminal.backend_mut());
        let _ = self.terminal.show_cursor();
    }
}

/// What a key press means in the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Reset,
    Submit,
    Scenario(usize),
    Retry,
    NextTab,
    Type(char),
    Backspace,
    Ignore,
}

pub fn key_action(status: AppStatus, key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => return Action::Quit,
        KeyCode::Char('c') if ctrl => return Action::Quit,
        KeyCode::Char('r') if ctrl => return Action::Reset,
        _ => {}
    }
    match status {
        AppStatus::Loading => Action::Ignore,
        AppStatus::Error => match key.code {
            KeyCode::Enter | KeyCode::Char('r') => Action::Retry,
            _ => Action::Ignore,
        },
        AppStatus::Idle | AppStatus::Analyzed => match key.code {
            KeyCode::Enter => Action::Submit,
            KeyCode::F(n @ 1..=3) if status == AppStatus::Idle => Action::Scenario(n as usize - 1),
            KeyCode::Tab if status == AppStatus::Analyzed => Action::NextTab,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Char(c) if !ctrl => Action::Type(c),
            _ => Action::Ignore,
        },
    }
}

fn spawn_request(
    engine: &Arc<dyn DecisionEngine>,
    tx: &mpsc::UnboundedSender<Settlement>,
    app: &mut AppState,
    text: Option<&str>,
) {
    match app.submit(text) {
        Ok(Some(sub)) => {
            let engine = Arc::clone(engine);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = engine.analyze(&sub.history).await;
                let _ = tx.send((sub.ticket, result));
            });
        }
        Ok(None) => {}
        Err(e) => tracing::debug!(error = %e, "submission refused"),
    }
}

/// Runs the TUI until Esc / Ctrl+C.
pub async fn run_tui(mut app: AppState, engine: Arc<dyn DecisionEngine>) -> Result<(), CliError> {
    let mut guard = TerminalGuard::enter()?;
    let (tx, mut rx) = mpsc::unbounded_channel::<Settlement>();
    let mut tick: usize = 0;

    loop {
        while let Ok((ticket, result)) = rx.try_recv() {
            if !app.settle(ticket, result) {
                tracing::debug!(ticket, "stale settlement ignored");
            }
        }

        let frame = present(&app);
        guard.terminal.draw(|f| draw(f, &frame, app.input(), tick))?;

        let ready = tokio::task::block_in_place(|| event::poll(TICK))?;
        if !ready {
            tick = tick.wrapping_add(1);
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key_action(app.status(), key) {
            Action::Quit => break,
            Action::Reset => app.reset(),
            Action::Retry => {
                app.retry();
            }
            Action::NextTab => {
                let next = app.active_tab().next();
                app.select_tab(next);
            }
            Action::Submit => spawn_request(&engine, &tx, &mut app, None),
            Action::Scenario(i) => {
                if let Some(s) = SCENARIOS.get(i) {
                    spawn_request(&engine, &tx, &mut app, Some(s.text));
                }
            }
            Action::Type(c) => app.input_mut().push(c),
            Action::Backspace => {
                app.input_mut().pop();
            }
            Action::Ignore => {}
        }
    }
    Ok(())
}

fn accent_color(accent: PanelAccent) -> Color {
    match accent {
        PanelAccent::Situation => Color::Blue,
        PanelAccent::Questions => Color::Magenta,
        PanelAccent::Option => Color::Green,
        PanelAccent::Verdict => Color::Red,
        PanelAccent::Confidence => Color::Yellow,
    }
}

/// Styled body lines of one panel.
pub fn panel_lines(panel: &PanelView) -> Vec<Line<'static>> {
    panel
        .body
        .iter()
        .map(|line| match line {
            PanelLine::Text(t) => Line::from(t.clone()),
            PanelLine::Emphasis(t) => {
                Line::styled(t.clone(), Style::default().add_modifier(Modifier::ITALIC))
            }
            PanelLine::Heading(t) => {
                let color = match t.as_str() {
                    "Pros:" => Color::Green,
                    "Cons:" => Color::Red,
                    _ => Color::Reset,
                };
                Line::styled(t.clone(), Style::default().fg(color).add_modifier(Modifier::BOLD))
            }
            PanelLine::Bullet { marker, text } => Line::from(vec![
                Span::styled(
                    format!("{} ", marker),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(text.clone()),
            ]),
            PanelLine::Stamp(t) => Line::styled(
                format!("[ {} ]", t.to_uppercase()),
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ),
            PanelLine::Score(n) => Line::styled(
                format!("{}%", n),
                Style::default().add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center),
            PanelLine::Note(t) => Line::styled(t.clone(), Style::default().fg(Color::DarkGray)),
        })
        .collect()
}

fn draw_header(f: &mut TermFrame, area: Rect, header: &Header) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", header.title),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(header.tagline, Style::default().add_modifier(Modifier::ITALIC)),
    ];
    if let Some(badge) = header.badge {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(" {} ", badge),
            Style::default().fg(Color::White).bg(Color::Blue),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).block(Block::bordered()), area);
}

fn draw_panel(f: &mut TermFrame, area: Rect, panel: &PanelView) {
    let mut block = Block::bordered().title(Span::styled(
        format!(" {} ", panel.title.to_uppercase()),
        Style::default()
            .fg(Color::Black)
            .bg(accent_color(panel.accent))
            .add_modifier(Modifier::BOLD),
    ));
    if panel.variant == PanelVariant::Verdict {
        block = block.border_type(ratatui::widgets::BorderType::Thick);
    }
    f.render_widget(
        Paragraph::new(panel_lines(panel))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_map(f: &mut TermFrame, area: Rect, panels: &[PanelView]) {
    let rows: Vec<&[PanelView]> = panels.chunks(PANELS_PER_ROW).collect();
    let row_areas = Layout::vertical(vec![Constraint::Fill(1); rows.len()]).split(area);
    for (row, row_area) in rows.iter().zip(row_areas.iter()) {
        let cols = Layout::horizontal(vec![Constraint::Fill(1); PANELS_PER_ROW]).split(*row_area);
        for (panel, col) in row.iter().zip(cols.iter()) {
            draw_panel(f, *col, panel);
        }
    }
}

fn history_lines(history: &[ChatLine]) -> Vec<Line<'static>> {
    let start = history.len().saturating_sub(HISTORY_ROWS);
    history[start..]
        .iter()
        .map(|turn| {
            Line::from(vec![
                Span::styled(
                    format!("{}: ", turn.speaker),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(turn.text.clone()),
            ])
        })
        .collect()
}

fn draw_screen(f: &mut TermFrame, area: Rect, screen: &Screen, tick: usize) {
    match screen {
        Screen::Idle { scenarios, .. } => {
            let mut lines = vec![
                Line::styled(
                    view::IDLE_HEADLINE.to_uppercase(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Line::from(view::IDLE_PROMPT),
                Line::from(""),
            ];
            for (i, s) in scenarios.iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("F{} {}", i + 1, s.label),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("  \"{}\"", s.text)),
                ]));
            }
            f.render_widget(
                Paragraph::new(lines)
                    .block(Block::bordered())
                    .wrap(Wrap { trim: true }),
                area,
            );
        }
        Screen::Loading => {
            let text = format!("{} {}", SPINNER[tick % SPINNER.len()], view::LOADING_TEXT);
            f.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .block(Block::bordered()),
                area,
            );
        }
        Screen::Error { message } => {
            let lines = vec![
                Line::from(message.clone()),
                Line::from(""),
                Line::styled(
                    format!("Enter: {}", view::RETRY_LABEL),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ];
            let block = Block::bordered().title(Span::styled(
                view::ERROR_TITLE,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
            f.render_widget(
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .block(block)
                    .wrap(Wrap { trim: true }),
                area,
            );
        }
        Screen::Analyzed { tab, body, history } => {
            let [tabs_area, content_area, history_area] = Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(HISTORY_ROWS as u16 + 2),
            ])
            .areas(area);
            let selected = ViewTab::ALL.iter().position(|t| t == tab).unwrap_or(0);
            f.render_widget(
                Tabs::new(ViewTab::ALL.iter().map(|t| t.label().to_uppercase()))
                    .select(selected)
                    .highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow)),
                tabs_area,
            );
            match body {
                TabBody::Map(panels) => draw_map(f, content_area, panels),
                TabBody::NotImplemented(t) => f.render_widget(
                    Paragraph::new(format!(
                        "The {} view is not implemented yet.",
                        t.label().to_uppercase()
                    ))
                    .alignment(Alignment::Center)
                    .block(Block::bordered()),
                    content_area,
                ),
            }
            f.render_widget(
                Paragraph::new(history_lines(history))
                    .block(Block::bordered().title(" Conversation "))
                    .wrap(Wrap { trim: true }),
                history_area,
            );
        }
    }
}

fn draw_input(f: &mut TermFrame, area: Rect, screen: &Screen, input: &str) {
    let title = match screen {
        Screen::Analyzed { .. } => " Follow-up ",
        _ => " Your dilemma ",
    };
    let line = if input.is_empty() {
        Line::styled(view::INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Line::from(input.to_string())
    };
    f.render_widget(Paragraph::new(line).block(Block::bordered().title(title)), area);
}

fn key_hints(screen: &Screen) -> &'static str {
    match screen {
        Screen::Idle { .. } => "Enter: Begin Simulation  F1-F3: scenario  Ctrl+R: reset  Esc: quit",
        Screen::Loading => "Esc: quit",
        Screen::Error { .. } => "Enter: retry  Ctrl+R: reset  Esc: quit",
        Screen::Analyzed { .. } => "Enter: follow-up  Tab: switch view  Ctrl+R: reset  Esc: quit",
    }
}

/// Lays out one frame: header, screen, input line, footer. `input` is the editable text,
/// which the analyzed screen does not carry.
pub fn draw(f: &mut TermFrame, frame: &Frame, input: &str, tick: usize) {
    let [header_area, body_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(f.area());

    draw_header(f, header_area, &frame.header);
    draw_screen(f, body_area, &frame.screen, tick);
    draw_input(f, input_area, &frame.screen, input);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(view::FOOTER_TITLE, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(key_hints(&frame.screen), Style::default().fg(Color::DarkGray)),
        ])),
        footer_area,
    );
}
