use std::fmt;

/// What went wrong during a model call.
///
/// The controller converts any of these into an error-prefixed transcript
/// entry, so a failed call never crashes the session. Each variant is
/// produced by the Gemini client: `Auth`/`Api` from the HTTP status,
/// `Network` from the transport, `StreamRead` from a broken body read, and
/// `Parse` when the stream opens but its payloads are not the expected wire
/// format.
#[derive(Debug)]
pub enum ModelRequestError {
    /// The API rejected the key
    Auth(String),
    /// Connection-level failure before or during the call
    Network(String),
    /// Non-success HTTP status other than a key rejection
    Api { status: u16, body: String },
    /// The response body ended or broke mid-stream
    StreamRead(String),
    /// The first stream payload did not decode as a generate response
    Parse(String),
}

impl fmt::Display for ModelRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelRequestError::Auth(msg) => write!(f, "authentication failed: {}", msg),
            ModelRequestError::Network(msg) => write!(f, "network failure: {}", msg),
            ModelRequestError::Api { status, body } => {
                write!(f, "API returned HTTP {}: {}", status, body)
            }
            ModelRequestError::StreamRead(msg) => write!(f, "stream interrupted: {}", msg),
            ModelRequestError::Parse(msg) => write!(f, "unexpected response format: {}", msg),
        }
    }
}

impl std::error::Error for ModelRequestError {}

impl From<reqwest::Error> for ModelRequestError {
    fn from(e: reqwest::Error) -> Self {
        ModelRequestError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for ModelRequestError {
    fn from(e: serde_json::Error) -> Self {
        ModelRequestError::Parse(e.to_string())
    }
}

/// Fatal startup condition: the API key is absent. Reported to the operator
/// on stderr before the terminal enters raw mode, never mid-conversation.
#[derive(Debug)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}
