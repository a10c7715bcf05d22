//! Plain-text rendering of a [`Frame`], used by one-shot output and line mode.

use shouldi::view::{
    self, Frame, Header, PanelLine, PanelVariant, PanelView, Screen, TabBody,
};
use shouldi::ViewTab;

const RULE_WIDTH: usize = 60;

fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(RULE_WIDTH).collect()
}

fn header_line(header: &Header) -> String {
    match header.badge {
        Some(badge) => format!("{}  {}  [{}]", header.title, header.tagline, badge),
        None => format!("{}  {}", header.title, header.tagline),
    }
}

fn panel_line(line: &PanelLine) -> String {
    match line {
        PanelLine::Text(t) => t.clone(),
        PanelLine::Emphasis(t) => format!("_{}_", t),
        PanelLine::Heading(t) => t.clone(),
        PanelLine::Bullet { marker, text } => format!("  {} {}", marker, text),
        PanelLine::Stamp(t) => format!(">> {} <<", t.to_uppercase()),
        PanelLine::Score(n) => format!("{}%", n),
        PanelLine::Note(t) => t.clone(),
    }
}

/// One panel: an upper-cased title bar followed by its body lines.
pub fn render_panel(panel: &PanelView) -> Vec<String> {
    let bar = match panel.variant {
        PanelVariant::Verdict => '#',
        PanelVariant::Default => '=',
    };
    let mut out = vec![format!("{0}{0} {1} {0}{0}", bar, panel.title.to_uppercase())];
    out.extend(panel.body.iter().map(panel_line));
    out
}

fn tab_bar(active: ViewTab) -> String {
    ViewTab::ALL
        .iter()
        .map(|t| {
            if *t == active {
                format!("[{}]", t.label().to_uppercase())
            } else {
                t.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn screen_lines(screen: &Screen) -> Vec<String> {
    let mut out = Vec::new();
    match screen {
        Screen::Idle { scenarios, input } => {
            out.push(view::IDLE_HEADLINE.to_uppercase());
            out.push(view::IDLE_PROMPT.to_string());
            out.push(String::new());
            for (i, s) in scenarios.iter().enumerate() {
                out.push(format!("  {}. {}: \"{}\"", i + 1, s.label, s.text));
            }
            out.push(String::new());
            if input.is_empty() {
                out.push(format!("> {}", view::INPUT_PLACEHOLDER));
            } else {
                out.push(format!("> {}", input));
            }
        }
        Screen::Loading => out.push(view::LOADING_TEXT.to_string()),
        Screen::Error { message } => {
            out.push(view::ERROR_TITLE.to_string());
            out.push(message.clone());
            out.push(format!("[{}]", view::RETRY_LABEL));
        }
        Screen::Analyzed { tab, body, history } => {
            out.push(tab_bar(*tab));
            out.push(String::new());
            match body {
                TabBody::Map(panels) => {
                    for panel in panels {
                        out.extend(render_panel(panel));
                        out.push(String::new());
                    }
                }
                TabBody::NotImplemented(t) => {
                    out.push(format!("The {} view is not implemented yet.", t.label()));
                    out.push(String::new());
                }
            }
            if !history.is_empty() {
                out.push(rule('-'));
                for turn in history {
                    out.push(format!("{}: {}", turn.speaker, turn.text));
                }
            }
        }
    }
    out
}

/// Full frame: header, screen body and footer, newline-terminated.
pub fn render_frame(frame: &Frame) -> String {
    let mut lines = vec![header_line(&frame.header), rule('=')];
    lines.extend(screen_lines(&frame.screen));
    lines.push(rule('='));
    lines.push(format!("{} | {}", view::FOOTER_TITLE, view::FOOTER_SUBTITLE));
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
