//! Competitor: a bracket entrant (one player, a doubles pair, or a bye).

use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a competitor within one tournament.
pub type CompetitorId = Uuid;

/// Running group-stage statistics (round-robin format only).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CompetitorStats {
    pub wins: u32,
    pub points: u32,
    pub played: u32,
}

/// A bracket entrant: one player (singles), a pair (doubles), or a bye
/// placeholder. Created once at tournament build time; only `stats` is
/// recomputed afterwards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    /// Constituent players (empty for a bye).
    pub players: Vec<Player>,
    pub is_bye: bool,
    /// Priority 1: best positions + bye protection.
    pub is_seed: bool,
    /// Priority 2: good positions, no bye protection. Mutually exclusive
    /// with `is_seed`; seed takes priority when both players qualify.
    pub is_separated: bool,
    /// Group-stage stats; `None` in knockout format.
    pub stats: Option<CompetitorStats>,
}

impl Competitor {
    /// Singles competitor wrapping one player.
    pub fn singles(player: Player) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: player.name.clone(),
            players: vec![player],
            is_bye: false,
            is_seed: false,
            is_separated: false,
            stats: None,
        }
    }

    /// Doubles competitor wrapping a pair of players.
    pub fn doubles(p1: Player, p2: Player) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("{} & {}", p1.name, p2.name),
            players: vec![p1, p2],
            is_bye: false,
            is_seed: false,
            is_separated: false,
            stats: None,
        }
    }

    /// The synthetic "no opponent" placeholder.
    pub fn bye() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Bye".to_string(),
            players: Vec::new(),
            is_bye: true,
            is_seed: false,
            is_separated: false,
            stats: None,
        }
    }
}
