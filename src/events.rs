//! Translation from terminal events to session actions.
//!
//! One interaction at a time: while a stream is in flight, prompt
//! submission, detail requests, and clear are refused here so no session
//! event can interleave with it. Typing and scrolling stay live.

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::actions::{self, Action};
use crate::state::State;

/// Map a terminal event to an action. `None` means quit.
pub fn handle_event(event: &Event, state: &State) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

            if ctrl {
                match key.code {
                    KeyCode::Char('q') => return None, // Quit
                    KeyCode::Char('l') if !state.is_streaming => {
                        return Some(Action::ClearSession);
                    }
                    KeyCode::Char('d') if !state.is_streaming => {
                        return Some(Action::RequestDetail);
                    }
                    _ => return Some(Action::None),
                }
            }

            let action = match key.code {
                KeyCode::Enter if !state.is_streaming => Action::InputSubmit,
                KeyCode::Char(c) => Action::InputChar(c),
                KeyCode::Backspace => Action::InputBackspace,
                KeyCode::Up => actions::scroll_up_arrow(),
                KeyCode::Down => actions::scroll_down_arrow(),
                KeyCode::PageUp => actions::scroll_up_page(),
                KeyCode::PageDown => actions::scroll_down_page(),
                _ => Action::None,
            };
            Some(action)
        }
        _ => Some(Action::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn ctrl_q_quits() {
        let state = State::new();
        assert_eq!(handle_event(&key(KeyCode::Char('q'), KeyModifiers::CONTROL), &state), None);
    }

    #[test]
    fn enter_submits_when_idle() {
        let state = State::new();
        assert_eq!(
            handle_event(&key(KeyCode::Enter, KeyModifiers::NONE), &state),
            Some(Action::InputSubmit)
        );
    }

    #[test]
    fn session_events_refused_while_streaming() {
        let mut state = State::new();
        state.is_streaming = true;

        assert_eq!(
            handle_event(&key(KeyCode::Enter, KeyModifiers::NONE), &state),
            Some(Action::None)
        );
        assert_eq!(
            handle_event(&key(KeyCode::Char('d'), KeyModifiers::CONTROL), &state),
            Some(Action::None)
        );
        assert_eq!(
            handle_event(&key(KeyCode::Char('l'), KeyModifiers::CONTROL), &state),
            Some(Action::None)
        );
        // Typing stays live.
        assert_eq!(
            handle_event(&key(KeyCode::Char('x'), KeyModifiers::NONE), &state),
            Some(Action::InputChar('x'))
        );
    }

    #[test]
    fn ctrl_d_requests_detail() {
        let state = State::new();
        assert_eq!(
            handle_event(&key(KeyCode::Char('d'), KeyModifiers::CONTROL), &state),
            Some(Action::RequestDetail)
        );
    }
}
