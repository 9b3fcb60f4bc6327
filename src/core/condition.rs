/// Template eligibility: a small typed predicate language over game state.
///
/// Each catalog entry carries a Korean label for editors and the typed
/// clauses that are actually evaluated, normally compiled from that label
/// with `ConditionSpec::from_label`.
use serde::{Deserialize, Serialize};

use crate::schema::game_state::{
    is_home_run_result, GameState, Half, PreviousGameState,
};

/// One eligibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// The play was hit-class (안타, 1-3루타, 출루, 홈런).
    HitResult,
    HomeRunResult,
    StrikeoutResult,
    /// A batted-ball out (플라이, 땅볼, 라인드라이브, 아웃); strikeouts excluded.
    OutResult,
    /// The prior score was not tied and it moved. Which side took the
    /// lead is not checked.
    LeadFlipped,
    /// Tied before, not tied now.
    TieBroken,
    /// Not tied before, tied now.
    GameTied,
    /// First run of a scoreless game.
    FirstRun,
    InningAtLeast(u32),
    BottomHalf,
    BasesLoadedBefore,
    ScoringPositionBefore,
    TwoOuts,
    BackToBackHomeRun,
    PinchHitter,
    ScoreChanged,
}

/// Label fragments recognized by `ConditionSpec::from_label`.
/// `InningAtLeast` is matched separately since it carries a number.
const FRAGMENTS: [(&str, Condition); 15] = [
    ("main_result에 '안타', '2루타' 등 득점타 포함", Condition::HitResult),
    ("직전 타석의 main_result에도 '홈런'이 포함", Condition::BackToBackHomeRun),
    ("main_result에 '홈런' 포함", Condition::HomeRunResult),
    ("main_result에 '삼진' 포함", Condition::StrikeoutResult),
    ("main_result에 '플라이', '땅볼' 등 범타 포함", Condition::OutResult),
    ("score가 지는 상황에서 이기는 상황으로 변경", Condition::LeadFlipped),
    ("score가 동점에서 이기는 상황으로 변경", Condition::TieBroken),
    ("score가 지는 상황에서 동점으로 변경", Condition::GameTied),
    ("score가 0:0에서 득점하는 상황으로 변경", Condition::FirstRun),
    ("score가 변경되는", Condition::ScoreChanged),
    ("half == 'bottom'", Condition::BottomHalf),
    (
        "플레이 전 on_base가 {'base1':'n', 'base2':'n', 'base3':'n'}",
        Condition::BasesLoadedBefore,
    ),
    (
        "플레이 전 on_base의 base2 또는 base3가 '0'이 아닐 때",
        Condition::ScoringPositionBefore,
    ),
    ("out == '2'", Condition::TwoOuts),
    ("original_batter != null", Condition::PinchHitter),
];

const INNING_PREFIX: &str = "inning >= ";

impl Condition {
    /// Whether this rule reads the previous snapshot. Such rules are
    /// false on the first observation of a game.
    pub fn needs_previous(&self) -> bool {
        matches!(
            self,
            Self::LeadFlipped
                | Self::TieBroken
                | Self::GameTied
                | Self::FirstRun
                | Self::BasesLoadedBefore
                | Self::ScoringPositionBefore
                | Self::BackToBackHomeRun
                | Self::ScoreChanged
        )
    }

    pub fn evaluate(&self, curr: &GameState, prev: Option<&PreviousGameState>) -> bool {
        match self {
            Self::HitResult => curr.is_hit(),
            Self::HomeRunResult => curr.is_home_run(),
            Self::StrikeoutResult => curr.is_strikeout(),
            Self::OutResult => curr.is_out(),
            Self::InningAtLeast(n) => curr.inning >= *n,
            Self::BottomHalf => curr.half == Half::Bottom,
            Self::TwoOuts => curr.outs == 2,
            Self::PinchHitter => curr.original_batter.is_some(),
            Self::LeadFlipped => {
                prev.is_some_and(|p| !p.score.is_tied() && curr.score != p.score)
            }
            Self::TieBroken => prev.is_some_and(|p| p.score.is_tied() && !curr.score.is_tied()),
            Self::GameTied => prev.is_some_and(|p| !p.score.is_tied() && curr.score.is_tied()),
            Self::FirstRun => {
                prev.is_some_and(|p| p.score.is_scoreless() && !curr.score.is_scoreless())
            }
            Self::BasesLoadedBefore => prev.is_some_and(|p| p.on_base.is_loaded()),
            Self::ScoringPositionBefore => {
                prev.is_some_and(|p| p.on_base.has_runner_in_scoring_position())
            }
            Self::BackToBackHomeRun => prev.is_some_and(|p| is_home_run_result(&p.main_result)),
            Self::ScoreChanged => prev.is_some_and(|p| p.score != curr.score),
        }
    }

    /// The canonical label fragment for this rule.
    pub fn label(&self) -> String {
        match self {
            Self::InningAtLeast(n) => format!("{}{}", INNING_PREFIX, n),
            other => FRAGMENTS
                .iter()
                .find(|(_, c)| c == other)
                .map(|(text, _)| text.to_string())
                .unwrap_or_default(),
        }
    }

    /// Recognize a single label fragment.
    pub fn from_fragment(fragment: &str) -> Option<Condition> {
        if let Some(pos) = fragment.find(INNING_PREFIX) {
            let digits: String = fragment[pos + INNING_PREFIX.len()..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if let Ok(n) = digits.parse() {
                return Some(Self::InningAtLeast(n));
            }
        }
        FRAGMENTS
            .iter()
            .find(|(text, _)| fragment.contains(text))
            .map(|(_, c)| *c)
    }
}

/// What an unrecognized clause evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnrecognizedPolicy {
    /// Ignore it: the template may still be selected.
    #[default]
    Eligible,
    /// Treat it as failed: the template is never selected.
    Ineligible,
}

/// One conjunct of a template's condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clause {
    Known(Condition),
    /// Label text no rule matched.
    Unrecognized(String),
}

impl Clause {
    fn evaluate(
        &self,
        curr: &GameState,
        prev: Option<&PreviousGameState>,
        policy: UnrecognizedPolicy,
    ) -> bool {
        match self {
            Self::Known(condition) => condition.evaluate(curr, prev),
            Self::Unrecognized(_) => policy == UnrecognizedPolicy::Eligible,
        }
    }
}

/// A template's full eligibility condition: label plus executable clauses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionSpec {
    pub label: String,
    pub clauses: Vec<Clause>,
}

impl ConditionSpec {
    /// Always eligible.
    pub fn always() -> Self {
        Self::default()
    }

    pub fn new(label: impl Into<String>, conditions: &[Condition]) -> Self {
        Self {
            label: label.into(),
            clauses: conditions.iter().copied().map(Clause::Known).collect(),
        }
    }

    /// Compile a Korean condition label into clauses.
    ///
    /// The label is split on `AND`; each fragment becomes a known rule or
    /// an `Unrecognized` clause. An empty label yields no clauses.
    pub fn from_label(label: &str) -> Self {
        let clauses = label
            .split("AND")
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .map(|fragment| match Condition::from_fragment(fragment) {
                Some(condition) => Clause::Known(condition),
                None => {
                    log::warn!("unrecognized condition fragment: '{}'", fragment);
                    Clause::Unrecognized(fragment.to_string())
                }
            })
            .collect();

        Self {
            label: label.to_string(),
            clauses,
        }
    }

    pub fn conditions(&self) -> impl Iterator<Item = Condition> + '_ {
        self.clauses.iter().filter_map(|c| match c {
            Clause::Known(condition) => Some(*condition),
            Clause::Unrecognized(_) => None,
        })
    }

    pub fn unrecognized(&self) -> impl Iterator<Item = &str> + '_ {
        self.clauses.iter().filter_map(|c| match c {
            Clause::Unrecognized(text) => Some(text.as_str()),
            Clause::Known(_) => None,
        })
    }

    /// AND of all clauses; vacuously true when there are none.
    pub fn evaluate(
        &self,
        curr: &GameState,
        prev: Option<&PreviousGameState>,
        policy: UnrecognizedPolicy,
    ) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.evaluate(curr, prev, policy))
    }
}

/// Eligibility under the default, permissive policy.
pub fn is_eligible(
    spec: &ConditionSpec,
    curr: &GameState,
    prev: Option<&PreviousGameState>,
) -> bool {
    spec.evaluate(curr, prev, UnrecognizedPolicy::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::game_state::{Bases, Occupant, Score};

    fn state(away: u32, home: u32) -> GameState {
        let mut s = GameState::opening("LG");
        s.score = Score::new(away, home);
        s
    }

    fn prev_of(away: u32, home: u32) -> PreviousGameState {
        PreviousGameState::from(&state(away, home))
    }

    fn loaded() -> Bases {
        Bases {
            first: Occupant::Runner("1".to_string()),
            second: Occupant::Runner("2".to_string()),
            third: Occupant::Runner("3".to_string()),
        }
    }

    #[test]
    fn result_conditions() {
        let mut s = state(0, 0);
        s.main_result = "좌전 안타".to_string();
        assert!(Condition::HitResult.evaluate(&s, None));
        assert!(!Condition::HomeRunResult.evaluate(&s, None));
        s.main_result = "홈런".to_string();
        assert!(Condition::HitResult.evaluate(&s, None));
        assert!(Condition::HomeRunResult.evaluate(&s, None));
        s.main_result = "헛스윙 삼진".to_string();
        assert!(Condition::StrikeoutResult.evaluate(&s, None));
        assert!(!Condition::HitResult.evaluate(&s, None));
        assert!(!Condition::OutResult.evaluate(&s, None));
        s.main_result = "우익수 플라이".to_string();
        assert!(Condition::OutResult.evaluate(&s, None));
        assert!(!Condition::HitResult.evaluate(&s, None));
    }

    #[test]
    fn previous_dependent_rules_fail_without_previous() {
        let s = state(1, 0);
        for condition in FRAGMENTS.iter().map(|(_, c)| *c) {
            if condition.needs_previous() {
                assert!(!condition.evaluate(&s, None), "{:?}", condition);
            }
        }
    }

    #[test]
    fn score_transitions() {
        // tied -> decisive
        assert!(Condition::TieBroken.evaluate(&state(3, 2), Some(&prev_of(2, 2))));
        assert!(!Condition::TieBroken.evaluate(&state(3, 2), Some(&prev_of(2, 1))));
        // decisive -> tied
        assert!(Condition::GameTied.evaluate(&state(4, 4), Some(&prev_of(2, 4))));
        assert!(!Condition::GameTied.evaluate(&state(4, 4), Some(&prev_of(4, 4))));
        // first run
        assert!(Condition::FirstRun.evaluate(&state(0, 1), Some(&prev_of(0, 0))));
        assert!(!Condition::FirstRun.evaluate(&state(2, 1), Some(&prev_of(1, 1))));
        // score changed
        assert!(Condition::ScoreChanged.evaluate(&state(1, 1), Some(&prev_of(0, 1))));
        assert!(!Condition::ScoreChanged.evaluate(&state(1, 1), Some(&prev_of(1, 1))));
    }

    #[test]
    fn lead_flip_is_permissive_about_side() {
        // 2:4 -> 5:4 is a real flip.
        assert!(Condition::LeadFlipped.evaluate(&state(5, 4), Some(&prev_of(2, 4))));
        // 2:4 -> 2:5 only extends the lead but still counts.
        assert!(Condition::LeadFlipped.evaluate(&state(2, 5), Some(&prev_of(2, 4))));
        // Tied before never counts.
        assert!(!Condition::LeadFlipped.evaluate(&state(3, 2), Some(&prev_of(2, 2))));
        // No change never counts.
        assert!(!Condition::LeadFlipped.evaluate(&state(2, 4), Some(&prev_of(2, 4))));
    }

    #[test]
    fn comeback_tie_scenario() {
        let curr = state(4, 4);
        let prev = prev_of(2, 4);
        assert!(Condition::GameTied.evaluate(&curr, Some(&prev)));
        assert!(!Condition::LeadFlipped.evaluate(&curr, Some(&prev)));
    }

    #[test]
    fn situation_conditions() {
        let mut s = state(0, 0);
        s.inning = 8;
        s.half = Half::Bottom;
        s.outs = 2;
        assert!(Condition::InningAtLeast(7).evaluate(&s, None));
        assert!(!Condition::InningAtLeast(9).evaluate(&s, None));
        assert!(Condition::BottomHalf.evaluate(&s, None));
        assert!(Condition::TwoOuts.evaluate(&s, None));
        assert!(!Condition::PinchHitter.evaluate(&s, None));
        s.original_batter = Some("박해민".to_string());
        assert!(Condition::PinchHitter.evaluate(&s, None));
    }

    #[test]
    fn base_conditions_read_previous_occupancy() {
        let curr = state(0, 4);
        let mut before = state(0, 0);
        before.on_base = loaded();
        let prev = PreviousGameState::from(&before);
        assert!(Condition::BasesLoadedBefore.evaluate(&curr, Some(&prev)));
        assert!(Condition::ScoringPositionBefore.evaluate(&curr, Some(&prev)));

        before.on_base = Bases {
            first: Occupant::Runner("1".to_string()),
            ..Bases::empty()
        };
        let prev = PreviousGameState::from(&before);
        assert!(!Condition::BasesLoadedBefore.evaluate(&curr, Some(&prev)));
        assert!(!Condition::ScoringPositionBefore.evaluate(&curr, Some(&prev)));
    }

    #[test]
    fn back_to_back_reads_previous_result() {
        let mut before = state(0, 0);
        before.main_result = "솔로 홈런".to_string();
        let prev = PreviousGameState::from(&before);
        assert!(Condition::BackToBackHomeRun.evaluate(&state(0, 2), Some(&prev)));
        before.main_result = "삼진".to_string();
        let prev = PreviousGameState::from(&before);
        assert!(!Condition::BackToBackHomeRun.evaluate(&state(0, 2), Some(&prev)));
    }

    #[test]
    fn from_label_compiles_known_fragments() {
        let spec = ConditionSpec::from_label(
            "main_result에 '홈런' 포함 AND inning >= 9 AND half == 'bottom' AND 플레이 전 out == '2' 일 때",
        );
        assert_eq!(
            spec.conditions().collect::<Vec<_>>(),
            vec![
                Condition::HomeRunResult,
                Condition::InningAtLeast(9),
                Condition::BottomHalf,
                Condition::TwoOuts,
            ]
        );
        assert_eq!(spec.unrecognized().count(), 0);
    }

    #[test]
    fn from_label_keeps_unrecognized_fragments() {
        let spec = ConditionSpec::from_label("main_result에 '삼진' 포함 AND 공격팀이 지는 상황");
        assert_eq!(spec.clauses.len(), 2);
        assert_eq!(spec.unrecognized().collect::<Vec<_>>(), vec!["공격팀이 지는 상황"]);

        let mut s = state(0, 0);
        s.main_result = "삼진".to_string();
        assert!(spec.evaluate(&s, None, UnrecognizedPolicy::Eligible));
        assert!(!spec.evaluate(&s, None, UnrecognizedPolicy::Ineligible));
    }

    #[test]
    fn empty_spec_is_always_eligible() {
        let spec = ConditionSpec::from_label("");
        assert!(spec.clauses.is_empty());
        assert!(is_eligible(&spec, &state(0, 0), None));
        assert!(spec.evaluate(&state(9, 9), None, UnrecognizedPolicy::Ineligible));
    }

    #[test]
    fn labels_recompile_to_the_same_rule() {
        let mut all: Vec<Condition> = FRAGMENTS.iter().map(|(_, c)| *c).collect();
        all.push(Condition::InningAtLeast(7));
        for condition in all {
            assert_eq!(Condition::from_fragment(&condition.label()), Some(condition));
        }
    }
}
