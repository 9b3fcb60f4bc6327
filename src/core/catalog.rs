/// The comment template catalog: loading, validation and lookup.
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::condition::{Clause, Condition, ConditionSpec};
use crate::core::template::Template;
use crate::schema::comment::Category;

/// The catalog shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../../catalog/comments.ron");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("template id must be positive")]
    InvalidId,
    #[error("duplicate template id: {0}")]
    DuplicateId(u32),
    #[error("catalog has no templates")]
    Empty,
}

/// One comment template. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentTemplate {
    pub id: u32,
    pub category: Category,
    /// Subtype within the category, e.g. "역전" or "만루 홈런".
    pub kind: String,
    pub body: Template,
    pub condition: ConditionSpec,
}

// RON shape of a catalog entry: the body is plain text and the typed
// clauses are optional, falling back to compiling the label.

#[derive(Debug, Deserialize)]
struct RonTemplate {
    id: u32,
    category: Category,
    kind: String,
    body: String,
    #[serde(default)]
    condition: String,
    #[serde(default)]
    when: Option<Vec<Condition>>,
}

impl From<RonTemplate> for CommentTemplate {
    fn from(raw: RonTemplate) -> Self {
        let condition = match raw.when {
            Some(conditions) => ConditionSpec {
                label: raw.condition,
                clauses: conditions.into_iter().map(Clause::Known).collect(),
            },
            None => ConditionSpec::from_label(&raw.condition),
        };
        CommentTemplate {
            id: raw.id,
            category: raw.category,
            kind: raw.kind,
            body: Template::parse(&raw.body),
            condition,
        }
    }
}

/// An ordered, id-indexed set of templates.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    templates: Vec<CommentTemplate>,
    index: FxHashMap<u32, usize>,
}

impl Catalog {
    /// The compiled-in catalog.
    pub fn builtin() -> Result<Catalog, CatalogError> {
        Self::parse_ron(BUILTIN_CATALOG)
    }

    /// Load a catalog from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Catalog, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::parse_ron(&contents)?;
        log::info!(
            "loaded {} comment templates from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse a catalog from a RON string.
    pub fn parse_ron(input: &str) -> Result<Catalog, CatalogError> {
        let raw: Vec<RonTemplate> = ron::from_str(input)?;
        Self::from_templates(raw.into_iter().map(CommentTemplate::from).collect())
    }

    /// Build from templates, keeping their order. Ids must be positive
    /// and unique.
    pub fn from_templates(templates: Vec<CommentTemplate>) -> Result<Catalog, CatalogError> {
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut index = FxHashMap::default();
        for (pos, template) in templates.iter().enumerate() {
            if template.id == 0 {
                return Err(CatalogError::InvalidId);
            }
            if index.insert(template.id, pos).is_some() {
                return Err(CatalogError::DuplicateId(template.id));
            }
        }
        Ok(Catalog { templates, index })
    }

    /// Merge another catalog into this one. Templates from `other`
    /// replace templates with the same id in place; new ids are appended.
    pub fn merge(&mut self, other: Catalog) {
        for template in other.templates {
            match self.index.get(&template.id) {
                Some(&pos) => self.templates[pos] = template,
                None => {
                    self.index.insert(template.id, self.templates.len());
                    self.templates.push(template);
                }
            }
        }
    }

    pub fn get(&self, id: u32) -> Option<&CommentTemplate> {
        self.index.get(&id).map(|&pos| &self.templates[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommentTemplate> {
        self.templates.iter()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &CommentTemplate> {
        self.templates.iter().filter(move |t| t.category == category)
    }

    pub fn by_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a CommentTemplate> {
        self.templates.iter().filter(move |t| t.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"[
        (
            id: 1,
            category: HomeRun,
            kind: "일반 홈런",
            body: "넘어갔습니다! {PLAYER_NAME}의 {HR_TYPE}!",
            condition: "main_result에 '홈런' 포함되는 모든 상황",
        ),
        (
            id: 2,
            category: Strikeout,
            kind: "이닝 종료",
            body: "{PITCHER_NAME}, 이닝 종료!",
            condition: "main_result에 '삼진' 포함 AND 공격팀이 지는 상황",
            when: Some([StrikeoutResult, InningAtLeast(9)]),
        ),
        (
            id: 3,
            category: Substitution,
            kind: "일반",
            body: "감독의 선택은 {PLAYER_NAME}.",
        ),
    ]"#;

    #[test]
    fn parse_small_catalog() {
        let catalog = Catalog::parse_ron(SMALL).unwrap();
        assert_eq!(catalog.len(), 3);

        let hr = catalog.get(1).unwrap();
        assert_eq!(
            hr.condition.conditions().collect::<Vec<_>>(),
            vec![Condition::HomeRunResult]
        );

        // Typed clauses win over the label.
        let k = catalog.get(2).unwrap();
        assert_eq!(
            k.condition.clauses,
            vec![
                Clause::Known(Condition::StrikeoutResult),
                Clause::Known(Condition::InningAtLeast(9)),
            ]
        );

        let sub = catalog.get(3).unwrap();
        assert!(sub.condition.clauses.is_empty());
        assert!(catalog.get(4).is_none());
    }

    #[test]
    fn lookups_by_category_and_kind() {
        let catalog = Catalog::parse_ron(SMALL).unwrap();
        assert_eq!(catalog.by_category(Category::HomeRun).count(), 1);
        assert_eq!(catalog.by_category(Category::OutEvent).count(), 0);
        assert_eq!(catalog.by_kind("이닝 종료").next().map(|t| t.id), Some(2));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let ron = r#"[
            (id: 7, category: HomeRun, kind: "a", body: "x"),
            (id: 7, category: HomeRun, kind: "b", body: "y"),
        ]"#;
        assert!(matches!(
            Catalog::parse_ron(ron),
            Err(CatalogError::DuplicateId(7))
        ));
    }

    #[test]
    fn zero_id_and_empty_rejected() {
        let ron = r#"[(id: 0, category: HomeRun, kind: "a", body: "x")]"#;
        assert!(matches!(Catalog::parse_ron(ron), Err(CatalogError::InvalidId)));
        assert!(matches!(Catalog::parse_ron("[]"), Err(CatalogError::Empty)));
    }

    #[test]
    fn malformed_ron_is_an_error() {
        assert!(matches!(
            Catalog::parse_ron("[(id: 1,"),
            Err(CatalogError::Ron(_))
        ));
    }

    #[test]
    fn merge_overrides_by_id() {
        let mut base = Catalog::parse_ron(SMALL).unwrap();
        let patch = Catalog::parse_ron(
            r#"[
                (id: 3, category: Substitution, kind: "대타", body: "대타 {PLAYER_NAME}."),
                (id: 99, category: OutEvent, kind: "병살타", body: "병살!"),
            ]"#,
        )
        .unwrap();
        base.merge(patch);
        assert_eq!(base.len(), 4);
        assert_eq!(base.get(3).unwrap().kind, "대타");
        assert_eq!(base.get(99).unwrap().category, Category::OutEvent);
        // Order is kept: replaced entries stay where they were.
        let ids: Vec<u32> = base.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 99]);
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.len() >= 75);
        for category in Category::ALL {
            assert!(catalog.by_category(category).count() > 0, "{}", category);
        }
    }
}
