//! Few-shot conversation builder for the speaking-paper prompt.
//!
//! Centralising the prompt here serves the same two purposes as keeping it
//! in one module ever does: a single source of truth for the paper format,
//! and unit tests that can inspect the conversation without a live API.
//!
//! The instruction text and the two example papers are embedded at compile
//! time so the binary needs no data directory at runtime. The conversation
//! shape is fixed: system instruction, two worked topic/paper exchanges to
//! steer the output format, then the caller's topic. Topic content is passed
//! through uninterpreted — an empty topic is a valid (if unhelpful) request.

use serde::Serialize;

/// System instruction describing the paper structure and style rules.
pub const SYSTEM_PROMPT: &str = include_str!("../assets/prompt.md");

/// First worked example: Japan culture — convenience stores.
pub const EXAMPLE_UNMANNED_STORE: &str = include_str!("../assets/examples/unmanned-store.md");

/// Second worked example: Health — sleep patterns.
pub const EXAMPLE_NIGHT_OWLS: &str = include_str!("../assets/examples/night-owls.md");

/// One role-tagged turn of a chat conversation, in the OpenAI-compatible
/// wire shape OpenRouter accepts.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Assemble the six-turn conversation for a topic.
///
/// Layout (always exactly six turns):
/// 1. system — format instructions
/// 2. user — `Topic: Japan culture Convenience stores`
/// 3. assistant — the unmanned-store example paper
/// 4. user — `Topic: Health Sleep patterns`
/// 5. assistant — the night-owls example paper
/// 6. user — `Topic: {topic}`
pub fn build_prompt(topic: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user("Topic: Japan culture Convenience stores"),
        ChatMessage::assistant(EXAMPLE_UNMANNED_STORE),
        ChatMessage::user("Topic: Health Sleep patterns"),
        ChatMessage::assistant(EXAMPLE_NIGHT_OWLS),
        ChatMessage::user(format!("Topic: {topic}")),
    ]
}
