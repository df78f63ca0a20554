//! Pure formatter from the transcript to the Gemini wire shape.
//!
//! Gemini expects `{role: "user"|"model", parts: [{text}]}` entries. The
//! mapping does no filtering, truncation, or summarization: same transcript
//! in, same contents out.

use serde::Serialize;

use crate::state::{Role, Transcript};

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

/// One entry of the model-facing `contents` array.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: "user", parts: vec![Part { text: text.into() }] }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: "model", parts: vec![Part { text: text.into() }] }
    }
}

/// Convert the transcript into the role/content structure expected by the
/// model API. User turns map to `"user"`, Assistant turns to `"model"`;
/// order and length are preserved.
pub fn format_history(transcript: &Transcript) -> Vec<Content> {
    transcript
        .turns()
        .iter()
        .map(|turn| match turn.role {
            Role::User => Content::user(turn.text.clone()),
            Role::Assistant => Content::model(turn.text.clone()),
        })
        .collect()
}
