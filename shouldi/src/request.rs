//! Decision request builder: system instruction + trimmed history → chat-completion body.
//!
//! The builder performs no schema generation; the system instruction text is the only
//! thing shaping the reply.

use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;

/// Role of a message on the wire. Adds `system` to the conversation roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    System,
    User,
    Assistant,
}

/// One message of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMessage {
    pub role: WireRole,
    pub content: String,
}

/// Chat-completion request body: `{ model, temperature, messages }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<RequestMessage>,
}

/// Builds the ordered message list: one system message, then one message per history turn.
pub fn build_messages(system_prompt: &str, history: &[ChatMessage]) -> Vec<RequestMessage> {
    let mut out = Vec::with_capacity(history.len() + 1);
    out.push(RequestMessage {
        role: WireRole::System,
        content: system_prompt.to_string(),
    });
    out.extend(history.iter().map(|m| RequestMessage {
        role: match m.role {
            crate::message::Role::User => WireRole::User,
            crate::message::Role::Assistant => WireRole::Assistant,
        },
        content: m.text.clone(),
    }));
    out
}

impl ChatCompletionRequest {
    pub fn new(
        model: impl Into<String>,
        temperature: f32,
        system_prompt: &str,
        history: &[ChatMessage],
    ) -> Self {
        Self {
            model: model.into(),
            temperature,
            messages: build_messages(system_prompt, history),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_message_comes_first_then_history_in_order() {
        let history = vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("second"),
        ];
        let msgs = build_messages("SYS", &history);
        assert_eq!(msgs.len(), 4);
        assert_eq!(msgs[0].role, WireRole::System);
        assert_eq!(msgs[0].content, "SYS");
        assert_eq!(msgs[1].role, WireRole::User);
        assert_eq!(msgs[2].role, WireRole::Assistant);
        assert_eq!(msgs[3].content, "second");
    }

    #[test]
    fn request_serializes_to_wire_shape() {
        let req = ChatCompletionRequest::new(
            "llama-3.1-70b-versatile",
            0.7,
            "SYS",
            &[ChatMessage::user("Should I move?")],
        );
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["model"], "llama-3.1-70b-versatile");
        assert!((v["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][1]["role"], "user");
        assert_eq!(v["messages"][1]["content"], "Should I move?");
    }
}
