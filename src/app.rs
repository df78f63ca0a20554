//! App run loop: input-first event polling, stream-event pumping, paced
//! chunk release, and throttled rendering.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossterm::event;
use ratatui::Terminal;
use ratatui::prelude::CrosstermBackend;

use crate::actions::{Action, ActionResult, apply_action};
use crate::constants::{EVENT_POLL_MS, IDLE_POLL_MS, MODEL, RENDER_THROTTLE_MS, prompts};
use crate::events::handle_event;
use crate::history::{Content, format_history};
use crate::llm::{GenerationConfig, ModelClient, ModelRequest, StreamEvent, start_streaming};
use crate::state::State;
use crate::typewriter::TypewriterBuffer;
use crate::ui;

fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

/// Build the short-answer request: full formatted history plus one synthetic
/// instruction turn that exists in the payload only, never in the transcript.
pub fn build_short_answer_request(state: &State) -> ModelRequest {
    let mut contents = format_history(&state.transcript);
    contents.push(Content::user(prompts::short_answer(&state.pending_detail.last_user_prompt)));
    ModelRequest { model: MODEL.to_string(), contents, config: GenerationConfig::short_answer() }
}

/// Build the detailed-answer request from the full current transcript,
/// short answer included, plus the call-only instruction turn.
pub fn build_detailed_answer_request(state: &State) -> ModelRequest {
    let mut contents = format_history(&state.transcript);
    contents.push(Content::user(prompts::detailed_answer(&state.pending_detail.last_user_prompt)));
    ModelRequest { model: MODEL.to_string(), contents, config: GenerationConfig::detailed_answer() }
}

pub struct App {
    pub state: State,
    client: Arc<dyn ModelClient>,
    typewriter: TypewriterBuffer,
    /// Set when the worker reported Done; the turn is finalized once the
    /// typewriter has drained so no displayed text is lost.
    pending_done: bool,
    last_render_ms: u64,
    last_spinner_ms: u64,
}

impl App {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            state: State::new(),
            client,
            typewriter: TypewriterBuffer::new(),
            pending_done: false,
            last_render_ms: 0,
            last_spinner_ms: 0,
        }
    }

    pub fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tx: Sender<StreamEvent>,
        rx: Receiver<StreamEvent>,
    ) -> io::Result<()> {
        loop {
            let current_ms = now_ms();

            // Input first: minimal latency on keystrokes.
            if event::poll(Duration::ZERO)? {
                let evt = event::read()?;
                let Some(action) = handle_event(&evt, &self.state) else {
                    break; // User quit
                };
                self.handle_action(action, &tx);

                if self.state.dirty {
                    terminal.draw(|frame| ui::render(frame, &mut self.state))?;
                    self.state.dirty = false;
                    self.last_render_ms = current_ms;
                }
            }

            self.process_stream_events(&rx);
            self.process_typewriter();
            self.finalize_stream();
            self.update_spinner();

            if self.state.dirty && current_ms.saturating_sub(self.last_render_ms) >= RENDER_THROTTLE_MS {
                terminal.draw(|frame| ui::render(frame, &mut self.state))?;
                self.state.dirty = false;
                self.last_render_ms = current_ms;
            }

            // Adaptive poll: tight while streaming, relaxed when idle.
            let poll_ms = if self.state.is_streaming || self.state.dirty {
                EVENT_POLL_MS
            } else {
                IDLE_POLL_MS
            };
            let _ = event::poll(Duration::from_millis(poll_ms))?;
        }

        Ok(())
    }

    fn handle_action(&mut self, action: Action, tx: &Sender<StreamEvent>) {
        self.state.dirty = true;
        match apply_action(&mut self.state, action) {
            ActionResult::StartShortAnswer => {
                let request = build_short_answer_request(&self.state);
                self.typewriter.reset();
                self.pending_done = false;
                start_streaming(self.client.clone(), request, tx.clone());
            }
            ActionResult::StartDetailedAnswer => {
                let request = build_detailed_answer_request(&self.state);
                self.typewriter.reset();
                self.pending_done = false;
                start_streaming(self.client.clone(), request, tx.clone());
            }
            ActionResult::Nothing => {}
        }
    }

    fn process_stream_events(&mut self, rx: &Receiver<StreamEvent>) {
        while let Ok(evt) = rx.try_recv() {
            if !self.state.is_streaming {
                continue;
            }
            self.state.dirty = true;
            match evt {
                StreamEvent::Chunk(text) => self.typewriter.add_chunk(&text),
                StreamEvent::Done => {
                    self.typewriter.mark_done();
                    self.pending_done = true;
                }
                StreamEvent::Error(e) => {
                    // Flush everything still queued so the partial answer is
                    // preserved in the error turn.
                    if let Some(chars) = self.typewriter.drain_all() {
                        apply_action(&mut self.state, Action::AppendChunk(chars));
                    }
                    self.typewriter.reset();
                    self.pending_done = false;
                    apply_action(&mut self.state, Action::StreamError(e));
                }
            }
        }
    }

    fn process_typewriter(&mut self) {
        if self.state.is_streaming
            && let Some(chars) = self.typewriter.take_chars()
        {
            apply_action(&mut self.state, Action::AppendChunk(chars));
            self.state.dirty = true;
        }
    }

    fn finalize_stream(&mut self) {
        if self.pending_done && self.state.is_streaming && self.typewriter.is_drained() {
            self.pending_done = false;
            self.typewriter.reset();
            apply_action(&mut self.state, Action::StreamDone);
            self.state.dirty = true;
        }
    }

    /// Advance the spinner while a response is being generated, ~10fps.
    fn update_spinner(&mut self) {
        if !self.state.is_streaming {
            return;
        }
        let now = now_ms();
        if now.saturating_sub(self.last_spinner_ms) >= 100 {
            self.last_spinner_ms = now;
            self.state.spinner_frame = self.state.spinner_frame.wrapping_add(1);
            self.state.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Action, apply_action};

    fn state_with_prompt(prompt: &str) -> State {
        let mut state = State::new();
        for c in prompt.chars() {
            apply_action(&mut state, Action::InputChar(c));
        }
        apply_action(&mut state, Action::InputSubmit);
        state
    }

    #[test]
    fn short_answer_request_wraps_prompt_without_touching_transcript() {
        let state = state_with_prompt("What is safe drinking water?");
        let len_before = state.transcript.len();

        let request = build_short_answer_request(&state);

        // Payload = history + one synthetic instruction turn.
        assert_eq!(request.contents.len(), len_before + 1);
        let last = request.contents.last().unwrap();
        assert_eq!(last.role, "user");
        assert!(last.parts[0].text.starts_with("Answer this question in 2-3 simple sentences:"));
        assert!(last.parts[0].text.contains("What is safe drinking water?"));
        // The wrapper never leaks into the visible chat.
        assert_eq!(state.transcript.len(), len_before);
        assert_eq!(request.config.max_output_tokens, Some(150));
    }

    #[test]
    fn detailed_answer_request_includes_short_answer_context() {
        let mut state = state_with_prompt("why boil water?");
        apply_action(&mut state, Action::AppendChunk("It kills pathogens.".to_string()));
        apply_action(&mut state, Action::StreamDone);
        apply_action(&mut state, Action::RequestDetail);

        let request = build_detailed_answer_request(&state);

        // User turn + short answer + synthetic instruction.
        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[1].role, "model");
        assert_eq!(request.contents[1].parts[0].text, "It kills pathogens.");
        let last = request.contents.last().unwrap();
        assert!(last.parts[0].text.contains("comprehensive, detailed, and informative"));
        assert!(last.parts[0].text.contains("why boil water?"));
        assert_eq!(request.config.max_output_tokens, None);
        assert_eq!(state.transcript.len(), 2);
    }
}
