use crate::constants::ERROR_PREFIX;
use crate::errlog::log_error;
use crate::state::{Phase, State, Turn};

use super::ActionResult;

/// Handle AppendChunk — accumulate streamed text in the live buffer.
/// The transcript is untouched; turns are immutable once appended.
pub fn handle_append_chunk(state: &mut State, text: &str) -> ActionResult {
    if state.is_streaming {
        state.streaming.push_str(text);
    }
    ActionResult::Nothing
}

/// Handle StreamDone — turn the accumulated buffer into an assistant turn
/// and advance the phase machine.
pub fn handle_stream_done(state: &mut State) -> ActionResult {
    if !state.is_streaming {
        return ActionResult::Nothing;
    }
    state.is_streaming = false;

    let text = std::mem::take(&mut state.streaming);
    state.transcript.append(Turn::assistant(text));

    match state.phase {
        Phase::AwaitingShortAnswer => {
            state.pending_detail.affordance_visible = true;
            state.phase = Phase::ShortAnswerReady;
        }
        Phase::AwaitingDetailedAnswer => {
            state.pending_detail.reset();
            state.phase = Phase::DetailedAnswerReady;
        }
        // Done without a matching in-flight phase: nothing to advance.
        _ => {}
    }
    ActionResult::Nothing
}

/// Handle StreamError — keep whatever streamed before the failure and append
/// it as an error-annotated assistant turn. The session stays usable.
pub fn handle_stream_error(state: &mut State, error: &str) -> ActionResult {
    if !state.is_streaming {
        return ActionResult::Nothing;
    }
    state.is_streaming = false;

    log_error(error);

    let partial = std::mem::take(&mut state.streaming);
    let text = if partial.is_empty() {
        format!("{} {}", ERROR_PREFIX, error)
    } else {
        format!("{}\n\n{} {}", partial, ERROR_PREFIX, error)
    };
    state.transcript.append(Turn::assistant(text));

    match state.phase {
        Phase::AwaitingShortAnswer => {
            // Retryable dead-end: the user may still ask for detail.
            state.pending_detail.affordance_visible = true;
            state.phase = Phase::ShortAnswerReady;
        }
        Phase::AwaitingDetailedAnswer => {
            // Terminal for this prompt; no automatic follow-up.
            state.pending_detail.reset();
            state.phase = Phase::DetailedAnswerReady;
        }
        _ => {}
    }
    ActionResult::Nothing
}
