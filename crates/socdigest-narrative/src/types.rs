//! Chat completion request and response bodies.
//!
//! Only the fields the client sends or reads are modelled; anything else in
//! the response is ignored.

use serde::{Deserialize, Serialize};

/// Upper bound on generated tokens per completion.
pub const MAX_TOKENS: u32 = 500;
pub const TEMPERATURE: f64 = 0.7;

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl<'a> ChatRequest<'a> {
    /// A single-turn request carrying `prompt` as the user message.
    #[must_use]
    pub fn single_user_message(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: String,
}
