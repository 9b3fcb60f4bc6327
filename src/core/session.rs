/// Per-game narration state, owned by the caller.
///
/// Holds the single previous-state memo and a short history of emitted
/// comments. One session per followed game; nothing is shared globally.
use std::collections::VecDeque;

use crate::schema::comment::Narration;
use crate::schema::game_state::{GameState, PreviousGameState};

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Lifecycle of a followed game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NoSnapshot,
    Observed,
    Terminated,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    previous: Option<PreviousGameState>,
    history: VecDeque<Narration>,
    history_limit: usize,
    phase: SessionPhase,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl GameSession {
    pub fn new(history_limit: usize) -> Self {
        Self {
            previous: None,
            history: VecDeque::with_capacity(history_limit),
            history_limit,
            phase: SessionPhase::NoSnapshot,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn previous(&self) -> Option<&PreviousGameState> {
        self.previous.as_ref()
    }

    /// Replace the memo with `state`. Called once per accepted poll,
    /// after generation ran.
    pub fn record_state(&mut self, state: &GameState) {
        if self.phase == SessionPhase::Terminated {
            return;
        }
        self.previous = Some(PreviousGameState::from(state));
        self.phase = SessionPhase::Observed;
    }

    /// Newest first; the oldest entry is dropped past the limit.
    pub fn record_narration(&mut self, narration: Narration) {
        if self.history_limit == 0 {
            return;
        }
        self.history.push_front(narration);
        self.history.truncate(self.history_limit);
    }

    pub fn history(&self) -> impl Iterator<Item = &Narration> {
        self.history.iter()
    }

    pub fn recent(&self, count: usize) -> Vec<&Narration> {
        self.history.iter().take(count).collect()
    }

    pub fn last(&self) -> Option<&Narration> {
        self.history.front()
    }

    /// The followed game ended; further polls are ignored.
    pub fn finish(&mut self) {
        self.phase = SessionPhase::Terminated;
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Terminated
    }

    /// Forget everything and start over as a fresh game.
    pub fn reset(&mut self) {
        self.previous = None;
        self.history.clear();
        self.phase = SessionPhase::NoSnapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::comment::Category;

    fn narration(id: u32) -> Narration {
        Narration {
            template_id: id,
            category: Category::HomeRun,
            kind: "일반 홈런".to_string(),
            text: format!("comment {}", id),
        }
    }

    #[test]
    fn phases() {
        let mut session = GameSession::default();
        assert_eq!(session.phase(), SessionPhase::NoSnapshot);
        session.record_state(&GameState::opening("KT"));
        assert_eq!(session.phase(), SessionPhase::Observed);
        assert!(session.previous().is_some());
        session.finish();
        assert!(session.is_finished());
        session.reset();
        assert_eq!(session.phase(), SessionPhase::NoSnapshot);
        assert!(session.previous().is_none());
    }

    #[test]
    fn terminated_session_keeps_its_memo() {
        let mut session = GameSession::default();
        let mut state = GameState::opening("KT");
        session.record_state(&state);
        session.finish();
        state.inning = 2;
        session.record_state(&state);
        assert_eq!(session.previous().map(|p| p.inning), Some(1));
    }

    #[test]
    fn history_is_bounded_and_newest_first() {
        let mut session = GameSession::new(3);
        for id in 1..=5 {
            session.record_narration(narration(id));
        }
        let ids: Vec<u32> = session.history().map(|n| n.template_id).collect();
        assert_eq!(ids, vec![5, 4, 3]);
        assert_eq!(session.recent(2).len(), 2);
        assert_eq!(session.last().map(|n| n.template_id), Some(5));
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let mut session = GameSession::new(0);
        session.record_narration(narration(1));
        assert!(session.last().is_none());
    }
}
