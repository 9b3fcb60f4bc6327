//! Baseball Narrative: live commentary for baseball at-bats.
//!
//! Watches polled game-state snapshots and emits one contextual Korean
//! broadcast sentence per meaningful change, using a catalog of
//! condition-tagged templates, category-priority selection and
//! placeholder substitution.

pub mod core;
pub mod schema;
