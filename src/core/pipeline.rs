/// The narration pipeline: snapshot → detect → select → render.
///
/// Wires together change detection, condition evaluation, template
/// selection and substitution around a caller-owned `GameSession`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::catalog::{Catalog, CatalogError};
use crate::core::condition::UnrecognizedPolicy;
use crate::core::detector::should_emit;
use crate::core::render::render_transition;
use crate::core::selector::select;
use crate::core::session::{GameSession, DEFAULT_HISTORY_LIMIT};
use crate::schema::comment::Narration;
use crate::schema::game_state::{GameState, PreviousGameState};
use crate::schema::raw::{RawAtBat, SnapshotError};

#[derive(Debug, Error)]
pub enum NarratorError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// Settings file contents. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarratorConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub unrecognized_conditions: UnrecognizedPolicy,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Extra catalog merged over the built-in one.
    #[serde(default)]
    pub catalog_path: Option<String>,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            unrecognized_conditions: UnrecognizedPolicy::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            catalog_path: None,
        }
    }
}

impl NarratorConfig {
    pub fn load_from_ron(path: &Path) -> Result<NarratorConfig, NarratorError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }
}

/// Turns game-state snapshots into comments. Built via `Narrator::builder()`.
pub struct Narrator {
    catalog: Catalog,
    policy: UnrecognizedPolicy,
    history_limit: usize,
    rng: StdRng,
}

/// Builder for constructing a `Narrator`.
pub struct NarratorBuilder {
    seed: Option<u64>,
    config_path: Option<String>,
    catalog_paths: Vec<String>,
    policy: Option<UnrecognizedPolicy>,
    history_limit: Option<usize>,
    /// Directly provided catalog, replacing the built-in one.
    catalog: Option<Catalog>,
}

impl Narrator {
    pub fn builder() -> NarratorBuilder {
        NarratorBuilder {
            seed: None,
            config_path: None,
            catalog_paths: Vec::new(),
            policy: None,
            history_limit: None,
            catalog: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> UnrecognizedPolicy {
        self.policy
    }

    /// A fresh session using the configured history limit.
    pub fn new_session(&self) -> GameSession {
        GameSession::new(self.history_limit)
    }

    /// Select and render a comment for one transition, without touching
    /// any session.
    pub fn generate(
        &mut self,
        curr: &GameState,
        prev: Option<&PreviousGameState>,
    ) -> Option<Narration> {
        let template = select(&self.catalog, curr, prev, self.policy, &mut self.rng)?;
        Some(Narration {
            template_id: template.id,
            category: template.category,
            kind: template.kind.clone(),
            text: render_transition(template, curr, prev),
        })
    }

    /// Generate several independent picks for the same transition.
    pub fn generate_variants(
        &mut self,
        curr: &GameState,
        prev: Option<&PreviousGameState>,
        count: usize,
    ) -> Vec<Narration> {
        (0..count)
            .filter_map(|_| self.generate(curr, prev))
            .collect()
    }

    /// Feed one polled snapshot through the session.
    ///
    /// Returns `None` for no-op polls, finished sessions, and
    /// transitions no template fits. The session baseline moves to
    /// `curr` after generation ran, whatever it produced.
    pub fn observe(&mut self, session: &mut GameSession, curr: &GameState) -> Option<Narration> {
        if session.is_finished() {
            log::debug!("ignoring snapshot for a finished game");
            return None;
        }
        if !should_emit(session.previous(), curr) {
            log::debug!(
                "no change at {}회 {}, score {}",
                curr.inning,
                curr.half.suffix(),
                curr.score
            );
            return None;
        }

        let narration = self.generate(curr, session.previous());
        session.record_state(curr);

        match narration {
            Some(ref n) => session.record_narration(n.clone()),
            None => log::debug!("no eligible template for '{}'", curr.main_result),
        }
        narration
    }

    /// Normalize a raw at-bat record and observe it.
    pub fn observe_raw(
        &mut self,
        session: &mut GameSession,
        raw: &RawAtBat,
        team_name: &str,
        attacking_team_name: &str,
    ) -> Result<Option<Narration>, NarratorError> {
        let state = raw.normalize(team_name, attacking_team_name)?;
        Ok(self.observe(session, &state))
    }

    /// Parse an upstream JSON at-bat record and observe it.
    pub fn observe_json(
        &mut self,
        session: &mut GameSession,
        json: &str,
        team_name: &str,
        attacking_team_name: &str,
    ) -> Result<Option<Narration>, NarratorError> {
        let raw: RawAtBat = serde_json::from_str(json)?;
        self.observe_raw(session, &raw, team_name, attacking_team_name)
    }
}

impl NarratorBuilder {
    /// Fix the RNG seed. Without one, selection is seeded from entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Read settings from a RON file. Explicit builder calls win.
    pub fn config_file(mut self, path: &str) -> Self {
        self.config_path = Some(path.to_string());
        self
    }

    /// Merge a RON catalog over the base catalog.
    pub fn catalog_file(mut self, path: &str) -> Self {
        self.catalog_paths.push(path.to_string());
        self
    }

    pub fn unrecognized_policy(mut self, policy: UnrecognizedPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Provide the base catalog directly instead of the built-in one.
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn build(self) -> Result<Narrator, NarratorError> {
        let config = match self.config_path {
            Some(ref path) => NarratorConfig::load_from_ron(Path::new(path))?,
            None => NarratorConfig::default(),
        };

        let mut catalog = match self.catalog {
            Some(catalog) => catalog,
            None => Catalog::builtin()?,
        };

        // Config catalog first, then builder-supplied ones on top.
        let overlays = config.catalog_path.iter().chain(self.catalog_paths.iter());
        for path in overlays {
            catalog.merge(Catalog::load_from_ron(Path::new(path))?);
        }

        let rng = match self.seed.or(config.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Narrator {
            catalog,
            policy: self.policy.unwrap_or(config.unrecognized_conditions),
            history_limit: self.history_limit.unwrap_or(config.history_limit),
            rng,
        })
    }
}
