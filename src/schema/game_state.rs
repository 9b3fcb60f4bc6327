use serde::{Deserialize, Serialize};
use std::fmt;

/// Result tokens that count as a hit-class play.
pub const HIT_TOKENS: [&str; 6] = ["안타", "1루타", "2루타", "3루타", "출루", "홈런"];
pub const HOME_RUN_TOKEN: &str = "홈런";
pub const STRIKEOUT_TOKEN: &str = "삼진";
/// Batted-ball outs. Strikeouts are classified separately.
pub const OUT_TOKENS: [&str; 4] = ["아웃", "플라이", "땅볼", "라인드라이브"];

/// Which team is batting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    /// Korean suffix used in inning labels: "초" (top) or "말" (bottom).
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Top => "초",
            Self::Bottom => "말",
        }
    }
}

/// Runs for each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Score {
    pub away: u32,
    pub home: u32,
}

impl Score {
    pub fn new(away: u32, home: u32) -> Self {
        Self { away, home }
    }

    pub fn is_tied(&self) -> bool {
        self.away == self.home
    }

    pub fn is_scoreless(&self) -> bool {
        self.away == 0 && self.home == 0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.away, self.home)
    }
}

/// What stands on a base.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Occupant {
    #[default]
    Empty,
    /// Opaque runner marker: a player reference or a synthetic id.
    Runner(String),
}

impl Occupant {
    pub fn is_occupied(&self) -> bool {
        matches!(self, Self::Runner(_))
    }
}

/// Base occupancy, first through third.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bases {
    pub first: Occupant,
    pub second: Occupant,
    pub third: Occupant,
}

impl Bases {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn occupied_count(&self) -> usize {
        [&self.first, &self.second, &self.third]
            .into_iter()
            .filter(|o| o.is_occupied())
            .count()
    }

    pub fn is_loaded(&self) -> bool {
        self.occupied_count() == 3
    }

    /// A runner on second or third.
    pub fn has_runner_in_scoring_position(&self) -> bool {
        self.second.is_occupied() || self.third.is_occupied()
    }
}

/// Snapshot of the live at-bat, recreated on every poll.
///
/// `on_base` is the live occupancy after the most recent completed play,
/// which `main_result` and `full_result` describe. Results are matched
/// by substring because upstream labels are inconsistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub inning: u32,
    pub half: Half,
    pub score: Score,
    /// Always below 3 while the half-inning is live.
    pub outs: u8,
    pub on_base: Bases,
    pub batter_name: String,
    pub pitcher_name: String,
    pub main_result: String,
    pub full_result: String,
    pub team_name: String,
    pub attacking_team_name: String,
    /// Set when the batter entered as a pinch hitter.
    pub original_batter: Option<String>,
    pub strikeout_count: u32,
}

impl GameState {
    /// A top-of-the-first state with nothing happened yet.
    pub fn opening(team_name: &str) -> Self {
        Self {
            inning: 1,
            half: Half::Top,
            score: Score::default(),
            outs: 0,
            on_base: Bases::empty(),
            batter_name: String::new(),
            pitcher_name: String::new(),
            main_result: String::new(),
            full_result: String::new(),
            team_name: team_name.to_string(),
            attacking_team_name: String::new(),
            original_batter: None,
            strikeout_count: 0,
        }
    }

    pub fn is_hit(&self) -> bool {
        is_hit_result(&self.main_result)
    }

    pub fn is_home_run(&self) -> bool {
        is_home_run_result(&self.main_result)
    }

    pub fn is_strikeout(&self) -> bool {
        is_strikeout_result(&self.main_result)
    }

    pub fn is_out(&self) -> bool {
        is_out_result(&self.main_result)
    }
}

/// The reduced memo of the prior snapshot kept between polls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousGameState {
    pub score: Score,
    pub on_base: Bases,
    pub main_result: String,
    pub inning: u32,
    pub half: Half,
}

impl From<&GameState> for PreviousGameState {
    fn from(state: &GameState) -> Self {
        Self {
            score: state.score,
            on_base: state.on_base.clone(),
            main_result: state.main_result.clone(),
            inning: state.inning,
            half: state.half,
        }
    }
}

pub fn is_hit_result(main_result: &str) -> bool {
    HIT_TOKENS.iter().any(|t| main_result.contains(t))
}

pub fn is_home_run_result(main_result: &str) -> bool {
    main_result.contains(HOME_RUN_TOKEN)
}

pub fn is_strikeout_result(main_result: &str) -> bool {
    main_result.contains(STRIKEOUT_TOKEN)
}

pub fn is_out_result(main_result: &str) -> bool {
    !is_strikeout_result(main_result) && OUT_TOKENS.iter().any(|t| main_result.contains(t))
}
