//! Error types.
//!
//! Queries never fail: a missing session, an unknown class or a broken
//! feature reference all fall back to a neutral answer. `CastError` is
//! reserved for building tables, loading content and committing a
//! level-up onto the character record.

use crate::ids::{CharacterId, FeatureId};
use thiserror::Error;

/// Format a cycle path as a readable string.
fn format_cycle_path(path: &[FeatureId]) -> String {
    if path.is_empty() {
        return String::from("(empty cycle)");
    }
    path.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors raised while constructing tables, validating content or
/// committing a level-up.
///
/// # Examples
///
/// ```rust
/// use zzcast::{CastError, CharacterId};
///
/// let err = CastError::NoClassSelected(CharacterId::from_str("Aria"));
/// assert_eq!(err.to_string(), "No class selected for character: Aria");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CastError {
    /// A slot table did not have one row per character level.
    #[error("Slot table has {found} rows, expected {expected}")]
    SlotTableRowCount { expected: usize, found: usize },

    /// A slot table row is missing its trailing zero sentinel, or has
    /// non-zero counts after it.
    #[error("Malformed slot table row for level {level}: {reason}")]
    MalformedSlotRow { level: u8, reason: String },

    /// The feature catalog contains a reference cycle.
    ///
    /// The path is closed: its first and last entries are the same feature.
    #[error("Feature cycle detected: {}", format_cycle_path(.path))]
    FeatureCycle { path: Vec<FeatureId> },

    /// Configuration or content JSON could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A commit was attempted before any class was selected.
    #[error("No class selected for character: {0}")]
    NoClassSelected(CharacterId),

    /// A commit would push the character past its level ceiling.
    #[error("Character {character} is already at the level ceiling ({max_level})")]
    LevelCeilingReached {
        character: CharacterId,
        max_level: u8,
    },

    /// The character has no registered level-up session.
    #[error("No level-up session for character: {0}")]
    SessionNotFound(CharacterId),
}
