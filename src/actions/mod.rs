//! Conversation controller: every session event becomes an [`Action`], and
//! `apply_action` drives the phase machine over the session state.
//!
//! - `input` — prompt submission and session clearing
//! - `detail` — the one-shot "more details" affordance
//! - `streaming` — chunk append, stream completion, stream failure

pub mod detail;
pub mod input;
pub mod streaming;

use crate::constants::{SCROLL_ARROW_AMOUNT, SCROLL_PAGE_AMOUNT};
use crate::state::State;

/// Session events, translated from terminal input or stream progress.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    InputChar(char),
    InputBackspace,
    InputSubmit,
    RequestDetail,
    ClearSession,
    AppendChunk(String),
    StreamDone,
    StreamError(String),
    ScrollUp(f32),
    ScrollDown(f32),
    None,
}

/// What the app must do after an action is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    Nothing,
    /// Start the token-capped short-answer call for the submitted prompt
    StartShortAnswer,
    /// Start the uncapped detailed-answer call for the pending prompt
    StartDetailedAnswer,
}

pub fn apply_action(state: &mut State, action: Action) -> ActionResult {
    match action {
        Action::InputChar(c) => {
            state.input.insert(state.input_cursor, c);
            state.input_cursor += c.len_utf8();
            ActionResult::Nothing
        }
        Action::InputBackspace => {
            if state.input_cursor > 0 {
                let prev = state.input[..state.input_cursor]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                state.input.remove(prev);
                state.input_cursor = prev;
            }
            ActionResult::Nothing
        }
        Action::InputSubmit => input::handle_input_submit(state),
        Action::RequestDetail => detail::handle_request_detail(state),
        Action::ClearSession => input::handle_clear_session(state),
        Action::AppendChunk(text) => streaming::handle_append_chunk(state, &text),
        Action::StreamDone => streaming::handle_stream_done(state),
        Action::StreamError(error) => streaming::handle_stream_error(state, &error),
        Action::ScrollUp(amount) => {
            state.scroll_offset += amount;
            state.user_scrolled = true;
            ActionResult::Nothing
        }
        Action::ScrollDown(amount) => {
            state.scroll_offset = (state.scroll_offset - amount).max(0.0);
            if state.scroll_offset == 0.0 {
                state.user_scrolled = false;
            }
            ActionResult::Nothing
        }
        Action::None => ActionResult::Nothing,
    }
}

/// Convenience constructors used by the event translator.
pub fn scroll_up_arrow() -> Action {
    Action::ScrollUp(SCROLL_ARROW_AMOUNT)
}

pub fn scroll_up_page() -> Action {
    Action::ScrollUp(SCROLL_PAGE_AMOUNT)
}

pub fn scroll_down_arrow() -> Action {
    Action::ScrollDown(SCROLL_ARROW_AMOUNT)
}

pub fn scroll_down_page() -> Action {
    Action::ScrollDown(SCROLL_PAGE_AMOUNT)
}
