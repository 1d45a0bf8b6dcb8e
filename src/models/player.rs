//! Player and Classification data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in rosters, pairings and lookups).
pub type PlayerId = Uuid;

/// Bracket placement class for a player.
///
/// `Seed` gets priority slots and bye protection; `Separated` gets priority
/// slots only. Absent entries in a classification map read as `Normal`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Seed,
    Separated,
    #[default]
    Normal,
}

/// A player on the roster. Immutable once created.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    /// Create a new player with the given name and a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
