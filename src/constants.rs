// =============================================================================
// API & MODEL
// =============================================================================

/// Gemini model used for both answer phases
pub const MODEL: &str = "gemini-1.5-flash";

/// Base URL for the Gemini generative language API
pub const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the API key (read once at startup)
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Token cap for the short answer phase
pub const SHORT_ANSWER_MAX_TOKENS: u32 = 150;

/// Sampling temperature for the short answer phase
pub const SHORT_ANSWER_TEMPERATURE: f32 = 0.4;

/// Sampling temperature for the detailed answer phase
pub const DETAILED_ANSWER_TEMPERATURE: f32 = 0.6;

/// Nucleus sampling parameter shared by both phases
pub const TOP_P: f32 = 0.9;

// =============================================================================
// PROMPT WRAPPERS
// =============================================================================
// Sent to the model only — never stored in the transcript.

pub mod prompts {
    /// Instruction wrapper for the short answer call
    pub fn short_answer(prompt: &str) -> String {
        format!("Answer this question in 2-3 simple sentences:\n{}", prompt)
    }

    /// Instruction wrapper for the detailed answer call
    pub fn detailed_answer(prompt: &str) -> String {
        format!(
            "Provide a comprehensive, detailed, and informative answer for the original query about: {}",
            prompt
        )
    }
}

/// Prefix marking an assistant turn produced by a failed model call
pub const ERROR_PREFIX: &str = "[model error]";

// =============================================================================
// SCROLLING
// =============================================================================

/// Scroll amount for arrow keys
pub const SCROLL_ARROW_AMOUNT: f32 = 1.0;

/// Scroll amount for PageUp/PageDown
pub const SCROLL_PAGE_AMOUNT: f32 = 10.0;

// =============================================================================
// TYPEWRITER EFFECT
// =============================================================================

/// Size of moving average for chunk timing
pub const TYPEWRITER_MOVING_AVG_SIZE: usize = 10;

/// Minimum character delay in milliseconds
pub const TYPEWRITER_MIN_DELAY_MS: f64 = 5.0;

/// Maximum character delay in milliseconds
pub const TYPEWRITER_MAX_DELAY_MS: f64 = 50.0;

/// Default character delay in milliseconds
pub const TYPEWRITER_DEFAULT_DELAY_MS: f64 = 15.0;

// =============================================================================
// EVENT LOOP
// =============================================================================

/// Poll interval for events while streaming, in milliseconds
pub const EVENT_POLL_MS: u64 = 8;

/// Poll interval for events while idle, in milliseconds
pub const IDLE_POLL_MS: u64 = 50;

/// Minimum time between renders (ms) - caps at ~28fps
pub const RENDER_THROTTLE_MS: u64 = 36;

// =============================================================================
// UI LAYOUT
// =============================================================================

/// Width of the sidebar in characters
pub const SIDEBAR_WIDTH: u16 = 34;

/// Glyph appended to live streaming text
pub const STREAM_CURSOR: &str = "▌";

// =============================================================================
// ERROR LOGGING
// =============================================================================

/// Directory for panic and model-error logs
pub const ERROR_DIR: &str = ".aquasathi/errors";
