/// State change detection. Decides whether a poll deserves narration.
use crate::schema::game_state::{GameState, PreviousGameState};

/// True on the first observation, or when score, base occupancy,
/// inning, half or the last play's result moved. Outs and names alone
/// never trigger narration.
pub fn should_emit(prev: Option<&PreviousGameState>, curr: &GameState) -> bool {
    let Some(prev) = prev else {
        return true;
    };
    prev.score != curr.score
        || prev.on_base != curr.on_base
        || prev.inning != curr.inning
        || prev.half != curr.half
        || prev.main_result != curr.main_result
}
