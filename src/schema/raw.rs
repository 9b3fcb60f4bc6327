/// Raw play-by-play payloads and their normalization into `GameState`.
///
/// Upstream records are loosely shaped: players arrive as either a bare
/// string or an object, counts as either numbers or numeric strings, and
/// empty bases as `"0"`. All of that is settled here so the narration
/// core only ever sees a strict `GameState`.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::game_state::{Bases, GameState, Half, Occupant, Score};

#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("invalid score '{0}': expected away:home")]
    InvalidScore(String),
    #[error("out count {0} is not a live count (0-2)")]
    OutsOutOfRange(u64),
    #[error("invalid out count '{0}'")]
    InvalidOuts(String),
    #[error("inning must be at least 1")]
    InvalidInning,
    #[error("invalid inning '{0}'")]
    InvalidInningText(String),
}

/// A player reference as the upstream API sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPlayer {
    Named {
        #[serde(default)]
        player_name: Option<String>,
    },
    Plain(String),
}

impl RawPlayer {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Named { player_name } => player_name.as_deref().unwrap_or(""),
            Self::Plain(name) => name,
        }
    }
}

/// A count or marker that may be a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(u64),
    Text(String),
}

impl NumberOrText {
    fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

/// Base occupancy in upstream form; `"0"` or an empty string is an empty base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBases {
    #[serde(default)]
    pub base1: Option<NumberOrText>,
    #[serde(default)]
    pub base2: Option<NumberOrText>,
    #[serde(default)]
    pub base3: Option<NumberOrText>,
}

fn occupant(marker: &Option<NumberOrText>) -> Occupant {
    match marker.as_ref().map(NumberOrText::as_text) {
        None => Occupant::Empty,
        Some(text) if text.is_empty() || text == "0" => Occupant::Empty,
        Some(text) => Occupant::Runner(text),
    }
}

impl From<&RawBases> for Bases {
    fn from(raw: &RawBases) -> Self {
        Bases {
            first: occupant(&raw.base1),
            second: occupant(&raw.base2),
            third: occupant(&raw.base3),
        }
    }
}

/// One polled at-bat record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAtBat {
    #[serde(default)]
    pub actual_batter: Option<RawPlayer>,
    #[serde(default)]
    pub pitcher: Option<RawPlayer>,
    #[serde(default)]
    pub main_result: Option<String>,
    #[serde(default)]
    pub full_result: Option<String>,
    /// Absent or `null` when the feed has no base data.
    #[serde(default)]
    pub on_base: Option<RawBases>,
    #[serde(default)]
    pub out: Option<NumberOrText>,
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub inning: Option<NumberOrText>,
    #[serde(default)]
    pub half: Option<String>,
    #[serde(default)]
    pub original_batter: Option<RawPlayer>,
    #[serde(default)]
    pub strikeout_count: Option<NumberOrText>,
}

/// Parse `"away:home"`. A missing score is treated as 0:0.
pub fn parse_score(text: &str) -> Result<Score, SnapshotError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Score::default());
    }
    let (away, home) = trimmed
        .split_once(':')
        .ok_or_else(|| SnapshotError::InvalidScore(text.to_string()))?;
    let away = away
        .trim()
        .parse()
        .map_err(|_| SnapshotError::InvalidScore(text.to_string()))?;
    let home = home
        .trim()
        .parse()
        .map_err(|_| SnapshotError::InvalidScore(text.to_string()))?;
    Ok(Score { away, home })
}

/// Innings come as `9` or `"9"`; a missing inning is the first.
fn parse_inning(raw: Option<&NumberOrText>) -> Result<u32, SnapshotError> {
    let Some(raw) = raw else {
        return Ok(1);
    };
    let text = raw.as_text();
    let inning: u32 = text
        .parse()
        .map_err(|_| SnapshotError::InvalidInningText(text.clone()))?;
    if inning == 0 {
        return Err(SnapshotError::InvalidInning);
    }
    Ok(inning)
}

/// Out counts come as `2`, `"2"` or `"2사"`.
fn parse_outs(raw: Option<&NumberOrText>) -> Result<u8, SnapshotError> {
    let Some(raw) = raw else {
        return Ok(0);
    };
    let text = raw.as_text();
    let digits = text.trim_end_matches('사').trim();
    let digits = if digits == "무" || digits.is_empty() { "0" } else { digits };
    let outs: u64 = digits
        .parse()
        .map_err(|_| SnapshotError::InvalidOuts(text.clone()))?;
    if outs >= 3 {
        return Err(SnapshotError::OutsOutOfRange(outs));
    }
    Ok(outs as u8)
}

impl RawAtBat {
    /// Normalize into the strict snapshot shape.
    ///
    /// `team_name` is the followed team; `attacking_team_name` is the
    /// side currently batting.
    pub fn normalize(
        &self,
        team_name: &str,
        attacking_team_name: &str,
    ) -> Result<GameState, SnapshotError> {
        let inning = parse_inning(self.inning.as_ref())?;

        let half = match self.half.as_deref().map(str::trim) {
            Some("bot") | Some("bottom") | Some("말") => Half::Bottom,
            _ => Half::Top,
        };

        let score = parse_score(self.score.as_deref().unwrap_or(""))?;
        let outs = parse_outs(self.out.as_ref())?;

        // Best effort: an unparseable count is treated as unknown.
        let strikeout_count = self
            .strikeout_count
            .as_ref()
            .and_then(|c| c.as_text().parse().ok())
            .unwrap_or(0);

        let original_batter = self
            .original_batter
            .as_ref()
            .map(|p| p.display_name().to_string())
            .filter(|name| !name.is_empty());

        Ok(GameState {
            inning,
            half,
            score,
            outs,
            on_base: self.on_base.as_ref().map(Bases::from).unwrap_or_default(),
            batter_name: self
                .actual_batter
                .as_ref()
                .map(|p| p.display_name().to_string())
                .unwrap_or_default(),
            pitcher_name: self
                .pitcher
                .as_ref()
                .map(|p| p.display_name().to_string())
                .unwrap_or_default(),
            main_result: self.main_result.clone().unwrap_or_default(),
            full_result: self.full_result.clone().unwrap_or_default(),
            team_name: team_name.to_string(),
            attacking_team_name: attacking_team_name.to_string(),
            original_batter,
            strikeout_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_score_forms() {
        assert_eq!(parse_score("3:5").unwrap(), Score::new(3, 5));
        assert_eq!(parse_score(" 0 : 0 ").unwrap(), Score::new(0, 0));
        assert_eq!(parse_score("").unwrap(), Score::default());
        assert!(matches!(
            parse_score("3-5"),
            Err(SnapshotError::InvalidScore(_))
        ));
        assert!(parse_score("a:1").is_err());
    }

    #[test]
    fn parse_outs_forms() {
        assert_eq!(parse_outs(None).unwrap(), 0);
        assert_eq!(parse_outs(Some(&NumberOrText::Number(2))).unwrap(), 2);
        assert_eq!(
            parse_outs(Some(&NumberOrText::Text("1사".to_string()))).unwrap(),
            1
        );
        assert_eq!(
            parse_outs(Some(&NumberOrText::Text("무사".to_string()))).unwrap(),
            0
        );
        assert_eq!(
            parse_outs(Some(&NumberOrText::Number(3))),
            Err(SnapshotError::OutsOutOfRange(3))
        );
        assert!(matches!(
            parse_outs(Some(&NumberOrText::Text("two".to_string()))),
            Err(SnapshotError::InvalidOuts(_))
        ));
    }

    #[test]
    fn zero_marker_means_empty_base() {
        let raw = RawBases {
            base1: Some(NumberOrText::Text("0".to_string())),
            base2: Some(NumberOrText::Text("김현수".to_string())),
            base3: Some(NumberOrText::Number(0)),
        };
        let bases = Bases::from(&raw);
        assert_eq!(bases.first, Occupant::Empty);
        assert_eq!(bases.second, Occupant::Runner("김현수".to_string()));
        assert_eq!(bases.third, Occupant::Empty);
    }

    #[test]
    fn normalize_accepts_string_or_object_players() {
        let raw = RawAtBat {
            actual_batter: Some(RawPlayer::Named {
                player_name: Some("양의지".to_string()),
            }),
            pitcher: Some(RawPlayer::Plain("알칸타라".to_string())),
            main_result: Some("홈런".to_string()),
            score: Some("3:2".to_string()),
            inning: Some(NumberOrText::Number(7)),
            half: Some("bot".to_string()),
            out: Some(NumberOrText::Text("1".to_string())),
            strikeout_count: Some(NumberOrText::Text("8".to_string())),
            ..RawAtBat::default()
        };
        let state = raw.normalize("두산", "두산").unwrap();
        assert_eq!(state.batter_name, "양의지");
        assert_eq!(state.pitcher_name, "알칸타라");
        assert_eq!(state.half, Half::Bottom);
        assert_eq!(state.outs, 1);
        assert_eq!(state.score, Score::new(3, 2));
        assert_eq!(state.strikeout_count, 8);
        assert!(state.original_batter.is_none());
    }

    #[test]
    fn normalize_rejects_bad_inputs() {
        let raw = RawAtBat {
            inning: Some(NumberOrText::Number(0)),
            ..RawAtBat::default()
        };
        assert_eq!(raw.normalize("", ""), Err(SnapshotError::InvalidInning));

        let raw = RawAtBat {
            inning: Some(NumberOrText::Text("연장".to_string())),
            ..RawAtBat::default()
        };
        assert_eq!(
            raw.normalize("", ""),
            Err(SnapshotError::InvalidInningText("연장".to_string()))
        );

        let raw = RawAtBat {
            out: Some(NumberOrText::Number(3)),
            ..RawAtBat::default()
        };
        assert_eq!(
            raw.normalize("", ""),
            Err(SnapshotError::OutsOutOfRange(3))
        );
    }

    #[test]
    fn empty_original_batter_is_not_a_pinch_hitter() {
        let raw = RawAtBat {
            original_batter: Some(RawPlayer::Named { player_name: None }),
            ..RawAtBat::default()
        };
        assert!(raw.normalize("", "").unwrap().original_batter.is_none());
    }

    #[test]
    fn deserialize_upstream_json() {
        let json = r#"{
            "actual_batter": {"player_name": "이정후"},
            "pitcher": "오승환",
            "main_result": "홈런",
            "full_result": "이정후 : 우측 담장 넘어가는 홈런 (1루주자 홈인)",
            "on_base": {"base1": "1", "base2": "0", "base3": "0"},
            "out": "2",
            "score": "2:3",
            "inning": 9,
            "half": "top",
            "original_batter": {"player_name": "송성문"}
        }"#;
        let raw: RawAtBat = serde_json::from_str(json).unwrap();
        let state = raw.normalize("키움", "키움").unwrap();
        assert_eq!(state.on_base.occupied_count(), 1);
        assert_eq!(state.outs, 2);
        assert_eq!(state.original_batter.as_deref(), Some("송성문"));
    }

    #[test]
    fn parse_inning_forms() {
        assert_eq!(parse_inning(None).unwrap(), 1);
        assert_eq!(parse_inning(Some(&NumberOrText::Number(9))).unwrap(), 9);
        assert_eq!(
            parse_inning(Some(&NumberOrText::Text(" 11 ".to_string()))).unwrap(),
            11
        );
        assert_eq!(
            parse_inning(Some(&NumberOrText::Text("0".to_string()))),
            Err(SnapshotError::InvalidInning)
        );
    }

    #[test]
    fn null_bases_and_text_inning_in_json() {
        let json = r#"{
            "actual_batter": "노시환",
            "main_result": "중견수 플라이 아웃",
            "on_base": null,
            "out": 1,
            "score": "0:0",
            "inning": "9",
            "half": "bot"
        }"#;
        let raw: RawAtBat = serde_json::from_str(json).unwrap();
        assert!(raw.on_base.is_none());
        let state = raw.normalize("한화", "한화").unwrap();
        assert_eq!(state.inning, 9);
        assert_eq!(state.half, Half::Bottom);
        assert_eq!(state.on_base, Bases::empty());
    }
}
