//! Presentation model: a pure function from [`AppState`] to what a renderer draws.
//!
//! Renderers (plain text, ratatui) only lay these out; no decision is taken there.

use crate::analysis::{DecisionAnalysis, DecisionOption, CONFIDENCE_RANGE};
use crate::app::{AppState, AppStatus, ViewTab};
use crate::message::Role;

pub const APP_TITLE: &str = "SHOULDI?";
pub const APP_TAGLINE: &str = "Strategic Simulation";
pub const FALLBACK_BADGE: &str = "Optimized Engine Active";
pub const FOOTER_TITLE: &str = "SHOULDI? ENGINE";
pub const FOOTER_SUBTITLE: &str = "Logic Simulation Powered by Groq";
pub const IDLE_HEADLINE: &str = "The Crossroads";
pub const IDLE_PROMPT: &str = "What choice haunts you?";
pub const INPUT_PLACEHOLDER: &str = "Describe your dilemma...";
pub const SUBMIT_LABEL: &str = "Begin Simulation";
pub const LOADING_TEXT: &str = "Running Simulation…";
pub const ERROR_TITLE: &str = "System Panic!";
pub const RETRY_LABEL: &str = "Retry";

/// Example dilemma offered on the idle screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub label: &'static str,
    pub text: &'static str,
}

pub const SCENARIOS: [Scenario; 3] = [
    Scenario {
        label: "Coffee Roastery",
        text: "Should I quit my stable engineering job to start a boutique coffee roastery?",
    },
    Scenario {
        label: "Non-Profit Pivot",
        text: "I've been offered a stable corporate role vs starting a non-profit.",
    },
    Scenario {
        label: "Japan Residency",
        text: "Should I move to Japan for a year-long art residency?",
    },
];

/// Colour role of a panel header; renderers map it to concrete colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAccent {
    Situation,
    Questions,
    Option,
    Verdict,
    Confidence,
}

/// Verdict panels are drawn heavier than the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelVariant {
    Default,
    Verdict,
}

/// One line of panel body.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelLine {
    /// Plain paragraph.
    Text(String),
    /// Emphasised paragraph (descriptions, reasoning).
    Emphasis(String),
    /// Sub-heading such as "Pros:".
    Heading(String),
    /// Bullet with its marker (`?`, `+`, `-`, `•`).
    Bullet { marker: char, text: String },
    /// Verdict stamp.
    Stamp(String),
    /// Large confidence figure, already clamped to 0–100.
    Score(u8),
    /// Small footnote line (trade-off).
    Note(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub title: String,
    pub accent: PanelAccent,
    pub variant: PanelVariant,
    pub body: Vec<PanelLine>,
}

/// Body of the analyzed screen for the active tab.
#[derive(Debug, Clone, PartialEq)]
pub enum TabBody {
    Map(Vec<PanelView>),
    NotImplemented(ViewTab),
}

/// One rendered conversation turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub speaker: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Idle {
        scenarios: &'static [Scenario],
        input: String,
    },
    Loading,
    Error {
        message: String,
    },
    Analyzed {
        tab: ViewTab,
        body: TabBody,
        history: Vec<ChatLine>,
    },
}

/// Header shown above every screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub title: &'static str,
    pub tagline: &'static str,
    pub badge: Option<&'static str>,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub header: Header,
    pub screen: Screen,
}

/// Derives the frame for the current state.
pub fn present(state: &AppState) -> Frame {
    let header = Header {
        title: APP_TITLE,
        tagline: APP_TAGLINE,
        badge: state.used_fallback().then_some(FALLBACK_BADGE),
    };
    let screen = match (state.status(), state.analysis()) {
        (AppStatus::Idle, _) => Screen::Idle {
            scenarios: &SCENARIOS,
            input: state.input().to_string(),
        },
        (AppStatus::Loading, _) => Screen::Loading,
        (AppStatus::Error, _) => Screen::Error {
            message: state.error().unwrap_or_default().to_string(),
        },
        (AppStatus::Analyzed, Some(analysis)) => Screen::Analyzed {
            tab: state.active_tab(),
            body: tab_body(state.active_tab(), analysis),
            history: state
                .history()
                .messages()
                .iter()
                .map(|m| ChatLine {
                    speaker: match m.role {
                        Role::User => "you",
                        Role::Assistant => "engine",
                    },
                    text: m.text.clone(),
                })
                .collect(),
        },
        // analyzed without an analysis cannot be reached through AppState
        (AppStatus::Analyzed, None) => Screen::Idle {
            scenarios: &SCENARIOS,
            input: state.input().to_string(),
        },
    };
    Frame { header, screen }
}

fn tab_body(tab: ViewTab, analysis: &DecisionAnalysis) -> TabBody {
    match tab {
        ViewTab::Map => TabBody::Map(map_panels(analysis)),
        other => TabBody::NotImplemented(other),
    }
}

/// Clamps a model-provided confidence to a displayable 0–100 integer.
pub fn display_confidence(score: f64) -> u8 {
    if !score.is_finite() {
        return 0;
    }
    score
        .clamp(*CONFIDENCE_RANGE.start(), *CONFIDENCE_RANGE.end())
        .round() as u8
}

fn bullets(marker: char, items: &[String]) -> impl Iterator<Item = PanelLine> + '_ {
    items.iter().map(move |text| PanelLine::Bullet {
        marker,
        text: text.clone(),
    })
}

fn option_panel(opt: &DecisionOption) -> PanelView {
    let mut body = vec![
        PanelLine::Emphasis(opt.description.clone()),
        PanelLine::Heading("Pros:".to_string()),
    ];
    body.extend(bullets('+', &opt.pros));
    body.push(PanelLine::Heading("Cons:".to_string()));
    body.extend(bullets('-', &opt.cons));
    body.push(PanelLine::Note(format!("Trade-off: {}", opt.trade_off)));
    PanelView {
        title: opt.name.clone(),
        accent: PanelAccent::Option,
        variant: PanelVariant::Default,
        body,
    }
}

/// The five panels of the map tab, options expanded one panel each.
pub fn map_panels(analysis: &DecisionAnalysis) -> Vec<PanelView> {
    let mut panels = Vec::with_capacity(4 + analysis.panel3.options.len());

    panels.push(PanelView {
        title: analysis.panel1.title.clone(),
        accent: PanelAccent::Situation,
        variant: PanelVariant::Default,
        body: vec![PanelLine::Text(analysis.panel1.narration.clone())],
    });

    panels.push(PanelView {
        title: analysis.panel2.title.clone(),
        accent: PanelAccent::Questions,
        variant: PanelVariant::Default,
        body: bullets('?', &analysis.panel2.questions).collect(),
    });

    panels.extend(analysis.panel3.options.iter().map(option_panel));

    let mut verdict = vec![
        PanelLine::Stamp(analysis.panel4.verdict.clone()),
        PanelLine::Emphasis(analysis.panel4.reasoning.clone()),
        PanelLine::Heading("Key Assumptions:".to_string()),
    ];
    verdict.extend(bullets('•', &analysis.panel4.assumptions));
    panels.push(PanelView {
        title: analysis.panel4.title.clone(),
        accent: PanelAccent::Verdict,
        variant: PanelVariant::Verdict,
        body: verdict,
    });

    panels.push(PanelView {
        title: analysis.panel5.title.clone(),
        accent: PanelAccent::Confidence,
        variant: PanelVariant::Default,
        body: vec![
            PanelLine::Score(display_confidence(analysis.panel5.confidence_score)),
            PanelLine::Text(analysis.panel5.explanation.clone()),
        ],
    });

    panels
}
