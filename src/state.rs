//! Session-scoped state: the transcript, the pending-detail bookkeeping,
//! and the conversation phase machine.
//!
//! Everything lives in one explicit [`State`] owned by the app — no globals —
//! so independent sessions and deterministic tests are both possible.

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation. Immutable once appended to the
/// transcript; insertion order defines the context sent to the model.
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, text: text.into() }
    }
}

/// Append-only ordered log of turns, owned by the single active session.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Add a turn at the end. Never reorders or mutates existing turns.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Read-only view of the full ordered sequence.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

/// Tracks whether the most recent short answer is eligible for expansion.
///
/// `affordance_visible` is true only while `last_user_prompt` is non-empty
/// and the newest transcript turn is the short answer produced for that
/// prompt. Both fields reset together.
#[derive(Debug, Default)]
pub struct PendingDetail {
    pub last_user_prompt: String,
    pub affordance_visible: bool,
}

impl PendingDetail {
    pub fn reset(&mut self) {
        self.last_user_prompt.clear();
        self.affordance_visible = false;
    }
}

/// Conversation controller phases. `DetailedAnswerReady` accepts the same
/// events as `Idle` — no further affordance exists for a finished prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingShortAnswer,
    ShortAnswerReady,
    AwaitingDetailedAnswer,
    DetailedAnswerReady,
}

impl Phase {
    /// Whether a new prompt submission is accepted in this phase.
    pub fn accepts_prompt(&self) -> bool {
        matches!(self, Phase::Idle | Phase::ShortAnswerReady | Phase::DetailedAnswerReady)
    }
}

/// All mutable state for one interactive session.
#[derive(Debug, Default)]
pub struct State {
    pub transcript: Transcript,
    pub pending_detail: PendingDetail,
    pub phase: Phase,

    /// Accumulation buffer for the in-flight model response. Kept outside
    /// the transcript so appended turns stay immutable; the renderer shows
    /// transcript + this buffer.
    pub streaming: String,
    pub is_streaming: bool,

    // Input line
    pub input: String,
    pub input_cursor: usize,

    // Conversation viewport
    pub scroll_offset: f32,
    pub user_scrolled: bool,

    // Render bookkeeping
    pub dirty: bool,
    pub spinner_frame: u64,
}

impl State {
    pub fn new() -> Self {
        Self { dirty: true, ..Default::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_append_preserves_order() {
        let mut t = Transcript::new();
        t.append(Turn::user("first"));
        t.append(Turn::assistant("second"));
        t.append(Turn::user("third"));

        let turns = t.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].text, "first");
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[1].text, "second");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[2].text, "third");
    }

    #[test]
    fn transcript_clear_empties() {
        let mut t = Transcript::new();
        t.append(Turn::user("hello"));
        assert!(!t.is_empty());
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn pending_detail_reset_clears_both_fields() {
        let mut pd = PendingDetail {
            last_user_prompt: "why boil water?".to_string(),
            affordance_visible: true,
        };
        pd.reset();
        assert_eq!(pd.last_user_prompt, "");
        assert!(!pd.affordance_visible);
    }

    #[test]
    fn phase_prompt_acceptance() {
        assert!(Phase::Idle.accepts_prompt());
        assert!(Phase::ShortAnswerReady.accepts_prompt());
        assert!(Phase::DetailedAnswerReady.accepts_prompt());
        assert!(!Phase::AwaitingShortAnswer.accepts_prompt());
        assert!(!Phase::AwaitingDetailedAnswer.accepts_prompt());
    }
}
