//! WASM bindings for baseball-narrative, used by the live scoreboard widget.

use wasm_bindgen::prelude::*;

use baseball_narrative::core::catalog::Catalog;
use baseball_narrative::core::pipeline::Narrator;
use baseball_narrative::core::session::{GameSession, SessionPhase};
use baseball_narrative::schema::comment::Category;

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct SessionStatus {
    phase: &'static str,
    team: String,
    score: Option<String>,
    inning: Option<u32>,
    half: Option<&'static str>,
    comments: usize,
}

fn phase_label(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::NoSnapshot => "no_snapshot",
        SessionPhase::Observed => "observed",
        SessionPhase::Terminated => "terminated",
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// LiveCommentary: one followed game
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct LiveCommentary {
    narrator: Narrator,
    session: GameSession,
    team: String,
    seed: u64,
    catalog_ron: Option<String>,
}

#[wasm_bindgen]
impl LiveCommentary {
    /// Follow `team` with the built-in catalog.
    #[wasm_bindgen(constructor)]
    pub fn new(team: &str, seed: u64) -> Result<LiveCommentary, JsError> {
        Self::build(team, seed, None)
    }

    /// Follow `team` with a RON catalog merged over the built-in one.
    pub fn with_catalog(team: &str, seed: u64, catalog_ron: &str) -> Result<LiveCommentary, JsError> {
        Self::build(team, seed, Some(catalog_ron.to_string()))
    }

    /// Feed one polled at-bat record (upstream JSON shape).
    ///
    /// Returns the comment as a JSON object, or `undefined` when the poll
    /// changed nothing or no template fits.
    pub fn observe(
        &mut self,
        at_bat_json: &str,
        attacking_team: &str,
    ) -> Result<Option<String>, JsError> {
        let narration = self
            .narrator
            .observe_json(&mut self.session, at_bat_json, &self.team, attacking_team)
            .map_err(|e| JsError::new(&format!("Observe error: {e}")))?;
        narration.as_ref().map(to_json).transpose()
    }

    /// The latest `count` comments, newest first, as a JSON array.
    pub fn recent(&self, count: usize) -> Result<String, JsError> {
        to_json(&self.session.recent(count))
    }

    /// JSON summary of where the session stands.
    pub fn status(&self) -> Result<String, JsError> {
        let prev = self.session.previous();
        to_json(&SessionStatus {
            phase: phase_label(self.session.phase()),
            team: self.team.clone(),
            score: prev.map(|p| p.score.to_string()),
            inning: prev.map(|p| p.inning),
            half: prev.map(|p| p.half.suffix()),
            comments: self.session.history().count(),
        })
    }

    /// The followed game is over; later polls are ignored.
    pub fn finish(&mut self) {
        self.session.finish();
    }

    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    /// The seed the current narrator was built with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Start over with a new seed, keeping the team and catalog.
    pub fn reset(&mut self, seed: u64) -> Result<(), JsError> {
        let fresh = Self::build(&self.team.clone(), seed, self.catalog_ron.clone())?;
        *self = fresh;
        Ok(())
    }

    /// Return JSON array of comment category labels.
    pub fn categories() -> String {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        serde_json::to_string(&labels).unwrap_or_else(|_| "[]".to_string())
    }
}

// Private helpers
impl LiveCommentary {
    fn build(team: &str, seed: u64, catalog_ron: Option<String>) -> Result<LiveCommentary, JsError> {
        let mut builder = Narrator::builder().seed(seed);
        if let Some(ref ron) = catalog_ron {
            let mut catalog = Catalog::builtin()
                .map_err(|e| JsError::new(&format!("Catalog error: {e}")))?;
            let overlay = Catalog::parse_ron(ron)
                .map_err(|e| JsError::new(&format!("Catalog parse error: {e}")))?;
            catalog.merge(overlay);
            builder = builder.with_catalog(catalog);
        }
        let narrator = builder
            .build()
            .map_err(|e| JsError::new(&format!("Narrator build error: {e}")))?;
        let session = narrator.new_session();

        Ok(LiveCommentary {
            narrator,
            session,
            team: team.to_string(),
            seed,
            catalog_ron,
        })
    }
}
