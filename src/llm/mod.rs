//! Model client layer: streaming requests against the Gemini API.
//!
//! The client runs on a worker thread and reports back over an mpsc channel;
//! the UI thread consumes events between renders. One call in flight at a
//! time, no cancellation — a started stream runs to completion or to its
//! terminal error.

pub mod error;
pub mod gemini;

use std::sync::mpsc::Sender;

use serde::Serialize;

use crate::constants::{
    DETAILED_ANSWER_TEMPERATURE, SHORT_ANSWER_MAX_TOKENS, SHORT_ANSWER_TEMPERATURE, TOP_P,
};
use crate::history::Content;
pub use error::{ConfigError, ModelRequestError};

/// Events emitted during streaming
#[derive(Debug)]
pub enum StreamEvent {
    /// Text fragment from the response
    Chunk(String),
    /// Stream completed normally
    Done,
    /// Stream failed; fragments already delivered stay valid
    Error(String),
}

/// Per-call generation parameters, passed verbatim to the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    pub temperature: f32,
    pub top_p: f32,
}

impl GenerationConfig {
    /// Config for the first, token-capped, low-temperature answer
    pub fn short_answer() -> Self {
        Self {
            max_output_tokens: Some(SHORT_ANSWER_MAX_TOKENS),
            temperature: SHORT_ANSWER_TEMPERATURE,
            top_p: TOP_P,
        }
    }

    /// Config for the uncapped, higher-temperature elaboration
    pub fn detailed_answer() -> Self {
        Self { max_output_tokens: None, temperature: DETAILED_ANSWER_TEMPERATURE, top_p: TOP_P }
    }
}

/// One streaming completion request
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub contents: Vec<Content>,
    pub config: GenerationConfig,
}

/// Seam between the conversation controller and the network. Production
/// uses [`gemini::GeminiClient`]; tests drive the controller with scripted
/// clients instead.
pub trait ModelClient: Send + Sync {
    /// Issue the request, sending `Chunk` events as fragments arrive and a
    /// final `Done`. An `Err` return means the call failed; fragments sent
    /// before the failure are kept by the caller.
    fn stream(&self, request: ModelRequest, tx: Sender<StreamEvent>) -> Result<(), ModelRequestError>;
}

/// Run one streaming call on a worker thread. A stream() error is forwarded
/// as a terminal `Error` event so the UI thread sees exactly one outcome.
pub fn start_streaming(
    client: std::sync::Arc<dyn ModelClient>,
    request: ModelRequest,
    tx: Sender<StreamEvent>,
) {
    std::thread::spawn(move || {
        if let Err(e) = client.stream(request, tx.clone()) {
            let _ = tx.send(StreamEvent::Error(e.to_string()));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    struct ScriptedClient {
        fragments: Vec<&'static str>,
        fail_after: Option<&'static str>,
    }

    impl ModelClient for ScriptedClient {
        fn stream(
            &self,
            _request: ModelRequest,
            tx: Sender<StreamEvent>,
        ) -> Result<(), ModelRequestError> {
            for frag in &self.fragments {
                let _ = tx.send(StreamEvent::Chunk(frag.to_string()));
            }
            if let Some(msg) = self.fail_after {
                return Err(ModelRequestError::Network(msg.to_string()));
            }
            let _ = tx.send(StreamEvent::Done);
            Ok(())
        }
    }

    #[test]
    fn short_answer_config_matches_protocol() {
        let cfg = GenerationConfig::short_answer();
        assert_eq!(cfg.max_output_tokens, Some(150));
        assert_eq!(cfg.temperature, 0.4);
        assert_eq!(cfg.top_p, 0.9);
    }

    #[test]
    fn detailed_answer_config_has_no_token_cap() {
        let cfg = GenerationConfig::detailed_answer();
        assert_eq!(cfg.max_output_tokens, None);
        assert_eq!(cfg.temperature, 0.6);
    }

    #[test]
    fn config_serializes_camel_case_and_omits_absent_cap() {
        let json = serde_json::to_value(GenerationConfig::short_answer()).unwrap();
        assert_eq!(json["maxOutputTokens"], 150);
        assert_eq!(json["topP"], 0.9f32);

        let json = serde_json::to_value(GenerationConfig::detailed_answer()).unwrap();
        assert!(json.get("maxOutputTokens").is_none());
    }

    #[test]
    fn start_streaming_forwards_fragments_then_done() {
        let client = std::sync::Arc::new(ScriptedClient {
            fragments: vec!["Boil ", "your ", "water."],
            fail_after: None,
        });
        let (tx, rx) = mpsc::channel();
        start_streaming(
            client,
            ModelRequest {
                model: "test".into(),
                contents: Vec::new(),
                config: GenerationConfig::short_answer(),
            },
            tx,
        );

        let mut text = String::new();
        loop {
            match rx.recv().expect("stream events") {
                StreamEvent::Chunk(c) => text.push_str(&c),
                StreamEvent::Done => break,
                StreamEvent::Error(e) => panic!("unexpected error: {}", e),
            }
        }
        assert_eq!(text, "Boil your water.");
    }

    #[test]
    fn start_streaming_converts_failure_to_error_event() {
        let client = std::sync::Arc::new(ScriptedClient {
            fragments: vec!["Boil"],
            fail_after: Some("connection reset"),
        });
        let (tx, rx) = mpsc::channel();
        start_streaming(
            client,
            ModelRequest {
                model: "test".into(),
                contents: Vec::new(),
                config: GenerationConfig::short_answer(),
            },
            tx,
        );

        let mut text = String::new();
        let err = loop {
            match rx.recv().expect("stream events") {
                StreamEvent::Chunk(c) => text.push_str(&c),
                StreamEvent::Error(e) => break e,
                StreamEvent::Done => panic!("expected error, got done"),
            }
        };
        // Partial fragments stay valid alongside the terminal error.
        assert_eq!(text, "Boil");
        assert!(err.contains("connection reset"));
    }
}
