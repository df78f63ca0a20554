//! Gemini API implementation of the model client.
//!
//! Issues a blocking `streamGenerateContent` request with `alt=sse` and
//! forwards each text part as a chunk. The transport lives entirely here;
//! the rest of the app only sees [`StreamEvent`]s.

use std::io::{BufRead, BufReader};
use std::sync::mpsc::Sender;

use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{GenerationConfig, ModelClient, ModelRequest, ModelRequestError, StreamEvent};
use crate::constants::API_BASE;
use crate::history::Content;

pub struct GeminiClient {
    api_key: SecretString,
}

impl GeminiClient {
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:streamGenerateContent?alt=sse", API_BASE, model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Decode one SSE `data:` payload into its text fragments. Payloads that
/// carry only finishReason/usage metadata decode to an empty list.
fn decode_payload(json_str: &str) -> Result<Vec<String>, serde_json::Error> {
    let event = serde_json::from_str::<GenerateResponse>(json_str)?;
    Ok(event
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .collect())
}

/// Read SSE lines from an open response body and forward fragments.
///
/// A payload that fails to decode before anything has decoded means the
/// wire format itself is wrong, and the call fails as `Parse`. Once a
/// payload has decoded, a stray bad event is dropped instead — failing
/// there would discard text already delivered.
fn pump_sse<R: BufRead>(reader: R, tx: &Sender<StreamEvent>) -> Result<(), ModelRequestError> {
    let mut decoded_any = false;
    for line in reader.lines() {
        let line = line.map_err(|e| ModelRequestError::StreamRead(e.to_string()))?;

        let Some(json_str) = line.strip_prefix("data: ") else {
            continue;
        };

        match decode_payload(json_str) {
            Ok(fragments) => {
                decoded_any = true;
                for text in fragments {
                    let _ = tx.send(StreamEvent::Chunk(text));
                }
            }
            Err(e) if !decoded_any => return Err(e.into()),
            Err(_) => {}
        }
    }

    let _ = tx.send(StreamEvent::Done);
    Ok(())
}

impl ModelClient for GeminiClient {
    fn stream(&self, request: ModelRequest, tx: Sender<StreamEvent>) -> Result<(), ModelRequestError> {
        let client = Client::new();

        let body = GenerateRequest { contents: request.contents, generation_config: request.config };

        let response = client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(ModelRequestError::Auth(format!("API key rejected ({}): {}", status, body)));
            }
            return Err(ModelRequestError::Api { status: status.as_u16(), body });
        }

        pump_sse(BufReader::new(response), &tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc;

    fn collect_stream(body: &str) -> (Result<(), ModelRequestError>, Vec<StreamEvent>) {
        let (tx, rx) = mpsc::channel();
        let result = pump_sse(Cursor::new(body.to_string()), &tx);
        drop(tx);
        (result, rx.into_iter().collect())
    }

    #[test]
    fn decodes_text_parts_from_sse_payload() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Boil "},{"text":"it."}],"role":"model"}}]}"#;
        assert_eq!(decode_payload(json).unwrap(), vec!["Boil ".to_string(), "it.".to_string()]);
    }

    #[test]
    fn tolerates_payload_without_text() {
        // Final Gemini events may carry only finishReason/usage metadata.
        let json = r#"{"candidates":[{"finishReason":"STOP"}],"usageMetadata":{"totalTokenCount":42}}"#;
        assert!(decode_payload(json).unwrap().is_empty());
    }

    #[test]
    fn stream_forwards_fragments_then_done() {
        let body = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Boil \"}]}}]}\n\
                    \n\
                    data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"your water.\"}]}}]}\n";
        let (result, events) = collect_stream(body);
        assert!(result.is_ok());

        let mut text = String::new();
        let mut done = false;
        for evt in events {
            match evt {
                StreamEvent::Chunk(c) => text.push_str(&c),
                StreamEvent::Done => done = true,
                StreamEvent::Error(e) => panic!("unexpected error: {}", e),
            }
        }
        assert_eq!(text, "Boil your water.");
        assert!(done);
    }

    #[test]
    fn undecodable_first_payload_fails_as_parse() {
        // A stream that opens but speaks the wrong format must not finish
        // silently as an empty answer.
        let (result, events) = collect_stream("data: {not json\n");
        assert!(matches!(result, Err(ModelRequestError::Parse(_))));
        assert!(events.is_empty());
    }

    #[test]
    fn stray_bad_payload_after_text_is_dropped() {
        let body = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Boil\"}]}}]}\n\
                    data: {not json\n\
                    data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\" it\"}]}}]}\n";
        let (result, events) = collect_stream(body);
        assert!(result.is_ok());

        let mut text = String::new();
        for evt in &events {
            if let StreamEvent::Chunk(c) = evt {
                text.push_str(c);
            }
        }
        // Delivered text survives the stray event and the stream completes.
        assert_eq!(text, "Boil it");
        assert!(matches!(events.last(), Some(StreamEvent::Done)));
    }

    #[test]
    fn endpoint_targets_streaming_sse() {
        let client = GeminiClient::new(SecretString::from("k"));
        assert_eq!(
            client.endpoint("gemini-1.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:streamGenerateContent?alt=sse"
        );
    }

    /// Live round-trip against the real API.
    #[test]
    #[ignore] // Requires GEMINI_API_KEY — run with `cargo test -- --ignored`
    fn test_live_short_answer() {
        let key = std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY not set");
        let client = GeminiClient::new(SecretString::from(key));

        let (tx, rx) = std::sync::mpsc::channel();
        let request = ModelRequest {
            model: crate::constants::MODEL.to_string(),
            contents: vec![Content::user("Say ok")],
            config: GenerationConfig::short_answer(),
        };
        client.stream(request, tx).expect("stream failed");

        let mut text = String::new();
        while let Ok(evt) = rx.try_recv() {
            match evt {
                StreamEvent::Chunk(c) => text.push_str(&c),
                StreamEvent::Done => break,
                StreamEvent::Error(e) => panic!("stream error: {}", e),
            }
        }
        assert!(!text.is_empty());
    }
}
