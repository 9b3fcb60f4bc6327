/// Template selection over the eligible set, preferring the result's category.
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::catalog::{Catalog, CommentTemplate};
use crate::core::condition::UnrecognizedPolicy;
use crate::schema::comment::Category;
use crate::schema::game_state::{GameState, PreviousGameState};

/// The category a play should be narrated from, if any.
///
/// Home runs win over other hits; strikeouts come last.
pub fn preferred_category(state: &GameState) -> Option<Category> {
    if state.is_home_run() {
        Some(Category::HomeRun)
    } else if state.is_hit() {
        Some(Category::ScoringChance)
    } else if state.is_strikeout() {
        Some(Category::Strikeout)
    } else {
        None
    }
}

/// All templates eligible for this transition, in catalog order.
pub fn eligible<'c>(
    catalog: &'c Catalog,
    curr: &GameState,
    prev: Option<&PreviousGameState>,
    policy: UnrecognizedPolicy,
) -> Vec<&'c CommentTemplate> {
    catalog
        .iter()
        .filter(|t| t.condition.evaluate(curr, prev, policy))
        .collect()
}

/// Pick one template, or `None` when nothing is eligible.
///
/// Members of the preferred category are drawn from when any are
/// eligible; otherwise the draw is over every eligible template.
pub fn select<'c, R: Rng + ?Sized>(
    catalog: &'c Catalog,
    curr: &GameState,
    prev: Option<&PreviousGameState>,
    policy: UnrecognizedPolicy,
    rng: &mut R,
) -> Option<&'c CommentTemplate> {
    let candidates = eligible(catalog, curr, prev, policy);
    if candidates.is_empty() {
        return None;
    }

    let preferred: Vec<&CommentTemplate> = match preferred_category(curr) {
        Some(category) => candidates
            .iter()
            .copied()
            .filter(|t| t.category == category)
            .collect(),
        None => Vec::new(),
    };

    let pool = if preferred.is_empty() {
        &candidates
    } else {
        &preferred
    };

    let chosen = pool.choose(rng).copied();
    if let Some(template) = chosen {
        log::debug!(
            "selected template {} ({} / {}) from {} candidates",
            template.id,
            template.category,
            template.kind,
            pool.len()
        );
    }
    chosen
}
