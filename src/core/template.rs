/// Comment template bodies: placeholder vocabulary and parsing.
use serde::{Deserialize, Serialize};

/// A substitution slot recognized in template bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placeholder {
    PlayerName,
    PitcherName,
    TeamName,
    AttackingTeamName,
    Score,
    Inning,
    Outs,
    StrikeoutCount,
    HrType,
    RunType,
    OutType,
    PlayerJosaIga,
    PlayerJosaEulreul,
    PitcherJosaIga,
    PitcherJosaEulreul,
    TeamJosaIga,
    TeamJosaEulreul,
    TeamJosaEunneun,
}

impl Placeholder {
    pub const ALL: [Placeholder; 18] = [
        Self::PlayerName,
        Self::PitcherName,
        Self::TeamName,
        Self::AttackingTeamName,
        Self::Score,
        Self::Inning,
        Self::Outs,
        Self::StrikeoutCount,
        Self::HrType,
        Self::RunType,
        Self::OutType,
        Self::PlayerJosaIga,
        Self::PlayerJosaEulreul,
        Self::PitcherJosaIga,
        Self::PitcherJosaEulreul,
        Self::TeamJosaIga,
        Self::TeamJosaEulreul,
        Self::TeamJosaEunneun,
    ];

    /// The token name as written between braces.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlayerName => "PLAYER_NAME",
            Self::PitcherName => "PITCHER_NAME",
            Self::TeamName => "TEAM_NAME",
            Self::AttackingTeamName => "ATTACKING_TEAM_NAME",
            Self::Score => "SCORE",
            Self::Inning => "INNING",
            Self::Outs => "OUTS",
            Self::StrikeoutCount => "STRIKEOUT_COUNT",
            Self::HrType => "HR_TYPE",
            Self::RunType => "RUN_TYPE",
            Self::OutType => "OUT_TYPE",
            Self::PlayerJosaIga => "PLAYER_JOSA_IGA",
            Self::PlayerJosaEulreul => "PLAYER_JOSA_EULREUL",
            Self::PitcherJosaIga => "PITCHER_JOSA_IGA",
            Self::PitcherJosaEulreul => "PITCHER_JOSA_EULREUL",
            Self::TeamJosaIga => "TEAM_JOSA_IGA",
            Self::TeamJosaEulreul => "TEAM_JOSA_EULREUL",
            Self::TeamJosaEunneun => "TEAM_JOSA_EUNNEUN",
        }
    }

    pub fn from_name(name: &str) -> Option<Placeholder> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// A segment of a parsed template body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateSegment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// A recognized `{NAME}` slot.
    Placeholder(Placeholder),
    /// A well-formed `{NAME}` token nobody knows how to fill.
    /// Rendered verbatim.
    Unknown(String),
}

/// A parsed template body as a sequence of segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub segments: Vec<TemplateSegment>,
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'
}

impl Template {
    /// Parse a body string into segments.
    ///
    /// Syntax:
    /// - `{NAME}` with `NAME` in `[A-Z0-9_]+` → `Placeholder` or `Unknown`
    /// - `{{` / `}}` → literal `{` / `}`
    /// - anything else, stray braces included → `Literal`
    ///
    /// Parsing never fails; malformed braces stay in the text.
    pub fn parse(input: &str) -> Template {
        let mut segments = Vec::new();
        let mut literal_buf = String::new();
        let chars: Vec<char> = input.chars().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            match chars[i] {
                '{' if i + 1 < len && chars[i + 1] == '{' => {
                    literal_buf.push('{');
                    i += 2;
                }
                '}' if i + 1 < len && chars[i + 1] == '}' => {
                    literal_buf.push('}');
                    i += 2;
                }
                '{' => {
                    let start = i + 1;
                    let mut end = start;
                    while end < len && is_token_char(chars[end]) {
                        end += 1;
                    }

                    if end == start || end >= len || chars[end] != '}' {
                        literal_buf.push('{');
                        i += 1;
                        continue;
                    }

                    if !literal_buf.is_empty() {
                        segments.push(TemplateSegment::Literal(std::mem::take(
                            &mut literal_buf,
                        )));
                    }

                    let name: String = chars[start..end].iter().collect();
                    segments.push(match Placeholder::from_name(&name) {
                        Some(p) => TemplateSegment::Placeholder(p),
                        None => TemplateSegment::Unknown(name),
                    });
                    i = end + 1;
                }
                c => {
                    literal_buf.push(c);
                    i += 1;
                }
            }
        }

        if !literal_buf.is_empty() {
            segments.push(TemplateSegment::Literal(literal_buf));
        }

        Template { segments }
    }

    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|s| match s {
            TemplateSegment::Placeholder(p) => Some(*p),
            _ => None,
        })
    }

    pub fn unknown_tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|s| match s {
            TemplateSegment::Unknown(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn uses(&self, placeholder: Placeholder) -> bool {
        self.placeholders().any(|p| p == placeholder)
    }
}
