use crate::state::{Phase, State, Turn};

use super::ActionResult;

/// Handle InputSubmit — append the user turn and start the short-answer call
pub fn handle_input_submit(state: &mut State) -> ActionResult {
    if state.input.trim().is_empty() {
        return ActionResult::Nothing;
    }
    if !state.phase.accepts_prompt() || state.is_streaming {
        return ActionResult::Nothing;
    }

    let prompt = std::mem::take(&mut state.input);
    state.input_cursor = 0;

    // A new prompt discards any pending affordance before claiming the slot.
    state.pending_detail.reset();
    state.pending_detail.last_user_prompt = prompt.clone();

    state.transcript.append(Turn::user(prompt));
    state.streaming.clear();
    state.is_streaming = true;
    state.phase = Phase::AwaitingShortAnswer;
    state.scroll_offset = 0.0;
    state.user_scrolled = false;

    ActionResult::StartShortAnswer
}

/// Handle ClearSession — empty the transcript and return to Idle
pub fn handle_clear_session(state: &mut State) -> ActionResult {
    if state.is_streaming {
        return ActionResult::Nothing;
    }

    state.transcript.clear();
    state.pending_detail.reset();
    state.phase = Phase::Idle;
    state.input.clear();
    state.input_cursor = 0;
    state.streaming.clear();
    state.scroll_offset = 0.0;
    state.user_scrolled = false;

    ActionResult::Nothing
}
