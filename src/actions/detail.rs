use crate::state::{Phase, State};

use super::ActionResult;

/// Handle RequestDetail — one-shot expansion of the latest short answer.
///
/// The affordance is hidden before the call starts so a second invocation
/// finds it already false and does nothing.
pub fn handle_request_detail(state: &mut State) -> ActionResult {
    if state.is_streaming {
        return ActionResult::Nothing;
    }
    if state.phase != Phase::ShortAnswerReady
        || !state.pending_detail.affordance_visible
        || state.pending_detail.last_user_prompt.is_empty()
    {
        return ActionResult::Nothing;
    }

    state.pending_detail.affordance_visible = false;
    state.streaming.clear();
    state.is_streaming = true;
    state.phase = Phase::AwaitingDetailedAnswer;
    state.scroll_offset = 0.0;
    state.user_scrolled = false;

    ActionResult::StartDetailedAnswer
}
