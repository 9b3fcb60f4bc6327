use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of comment categories.
///
/// Selection prefers a category based on the play that just finished,
/// so the set is closed rather than free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// 득점/찬스
    ScoringChance,
    /// 홈런
    HomeRun,
    /// 탈삼진
    Strikeout,
    /// 선수교체
    Substitution,
    /// 아웃카운트
    OutEvent,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::ScoringChance,
        Self::HomeRun,
        Self::Strikeout,
        Self::Substitution,
        Self::OutEvent,
    ];

    /// The Korean label shown to editors and in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ScoringChance => "득점/찬스",
            Self::HomeRun => "홈런",
            Self::Strikeout => "탈삼진",
            Self::Substitution => "선수교체",
            Self::OutEvent => "아웃카운트",
        }
    }

    pub fn from_label(label: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.label() == label.trim())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A rendered comment, handed to whatever displays or forwards it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narration {
    pub template_id: u32,
    pub category: Category,
    pub kind: String,
    pub text: String,
}
