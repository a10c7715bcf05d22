//! Test-only analysis fixture shared by unit tests.

use super::types::*;

pub(crate) fn sample_json() -> String {
    r#"{
        "chatResponse": "Two roads, one bean. Here is your map.",
        "panel1": {
            "title": "The Crossroads",
            "narration": "A steady salary on one side, the smell of roasted beans on the other."
        },
        "panel2": {
            "title": "Key Questions",
            "questions": [
                "How many months of runway do you have?",
                "Have you tested demand at a local market?",
                "What would you regret more in ten years?"
            ]
        },
        "panel3": {
            "title": "Three Paths",
            "options": [
                {
                    "name": "Leap",
                    "description": "Quit and roast full time.",
                    "pros": ["Full ownership"],
                    "cons": ["No safety net"],
                    "tradeOff": "Security for autonomy"
                },
                {
                    "name": "Bridge",
                    "description": "Roast on weekends for a year.",
                    "pros": ["Low risk", "Real demand signal"],
                    "cons": ["Slow growth"],
                    "tradeOff": "Speed for certainty"
                },
                {
                    "name": "Stay",
                    "description": "Keep the job, keep it a hobby.",
                    "pros": ["Stable income"],
                    "cons": ["Dream deferred"],
                    "tradeOff": "Passion for comfort"
                }
            ]
        },
        "panel4": {
            "title": "The Verdict",
            "verdict": "Build the bridge",
            "reasoning": "Test the road before you burn the map.",
            "assumptions": ["You have savings for six months", "Local demand exists"]
        },
        "panel5": {
            "title": "Confidence",
            "confidenceScore": 72,
            "explanation": "Depends on the weekend market test."
        }
    }"#
    .to_string()
}

pub(crate) fn sample_analysis() -> DecisionAnalysis {
    let option = |name: &str, description: &str, pros: &[&str], cons: &[&str], trade_off: &str| {
        DecisionOption {
            name: name.to_string(),
            description: description.to_string(),
            pros: pros.iter().map(|s| s.to_string()).collect(),
            cons: cons.iter().map(|s| s.to_string()).collect(),
            trade_off: trade_off.to_string(),
        }
    };
    DecisionAnalysis {
        chat_response: Some("Two roads, one bean. Here is your map.".to_string()),
        panel1: SituationPanel {
            title: "The Crossroads".to_string(),
            narration: "A steady salary on one side, the smell of roasted beans on the other."
                .to_string(),
        },
        panel2: QuestionsPanel {
            title: "Key Questions".to_string(),
            questions: vec![
                "How many months of runway do you have?".to_string(),
                "Have you tested demand at a local market?".to_string(),
                "What would you regret more in ten years?".to_string(),
            ],
        },
        panel3: OptionsPanel {
            title: "Three Paths".to_string(),
            options: vec![
                option(
                    "Leap",
                    "Quit and roast full time.",
                    &["Full ownership"],
                    &["No safety net"],
                    "Security for autonomy",
                ),
                option(
                    "Bridge",
                    "Roast on weekends for a year.",
                    &["Low risk", "Real demand signal"],
                    &["Slow growth"],
                    "Speed for certainty",
                ),
                option(
                    "Stay",
                    "Keep the job, keep it a hobby.",
                    &["Stable income"],
                    &["Dream deferred"],
                    "Passion for comfort",
                ),
            ],
        },
        panel4: VerdictPanel {
            title: "The Verdict".to_string(),
            verdict: "Build the bridge".to_string(),
            reasoning: "Test the road before you burn the map.".to_string(),
            assumptions: vec![
                "You have savings for six months".to_string(),
                "Local demand exists".to_string(),
            ],
        },
        panel5: ConfidencePanel {
            title: "Confidence".to_string(),
            confidence_score: 72.0,
            explanation: "Depends on the weekend market test.".to_string(),
        },
    }
}
