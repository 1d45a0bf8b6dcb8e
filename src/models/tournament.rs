//! Tournament aggregate: competitors, matches, status, champion.

use crate::models::competitor::{Competitor, CompetitorId};
use crate::models::game::{BracketMatch, MatchId};
use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during roster and tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Not enough players for the requested format.
    InsufficientPlayers { required: usize, provided: usize },
    /// Scores are negative or equal (a winner must be determinable).
    InvalidScore,
    /// The referenced match does not exist in this tournament.
    MatchNotFound(MatchId),
    /// The referenced player is not on the roster.
    PlayerNotFound(PlayerId),
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Player names must be non-empty after trimming.
    EmptyPlayerName,
    /// Roster CSV could not be parsed.
    CsvImport(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InsufficientPlayers { required, provided } => {
                write!(f, "Need at least {} players (got {})", required, provided)
            }
            TournamentError::InvalidScore => {
                write!(f, "Scores must be non-negative and unequal")
            }
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::DuplicatePlayerName => {
                write!(f, "A player with this name already exists")
            }
            TournamentError::EmptyPlayerName => write!(f, "Player name must not be empty"),
            TournamentError::CsvImport(msg) => write!(f, "CSV import failed: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Singles (one player per competitor) or doubles (a pair).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    #[default]
    Singles,
    Doubles,
}

/// Bracket format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Single-elimination bracket with seeding and byes.
    #[default]
    Knockout,
    /// Six doubles teams, two groups of three, gold/bronze finals.
    RoundRobinSix,
}

/// Lifecycle status. A tournament exists only once built; it flips back to
/// `Active` if the terminal winner is retracted by an upstream score edit.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Active,
    Completed,
}

/// Full tournament state.
///
/// Competitors live in an arena (`competitors`); matches reference them by
/// id so the same competitor can appear in several rounds and identity
/// comparison stays authoritative during propagation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub kind: MatchKind,
    pub format: Format,
    pub competitors: Vec<Competitor>,
    pub matches: Vec<BracketMatch>,
    /// Total round count (log2 of bracket size; 2 for round-robin).
    pub rounds: u32,
    pub status: TournamentStatus,
    /// Mirrors the terminal match's winner exactly.
    pub champion: Option<CompetitorId>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    pub fn new(kind: MatchKind, format: Format) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            format,
            competitors: Vec::new(),
            matches: Vec::new(),
            rounds: 0,
            status: TournamentStatus::Active,
            champion: None,
            created_at: Utc::now(),
        }
    }

    /// Competitor lookup by id.
    pub fn competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    /// Mutable competitor lookup by id.
    pub fn competitor_mut(&mut self, id: CompetitorId) -> Option<&mut Competitor> {
        self.competitors.iter_mut().find(|c| c.id == id)
    }

    /// Match lookup by id.
    pub fn find_match(&self, id: MatchId) -> Option<&BracketMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Mutable match lookup by id.
    pub fn find_match_mut(&mut self, id: MatchId) -> Option<&mut BracketMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// True if the competitor in the given slot is a bye.
    pub fn is_bye(&self, id: CompetitorId) -> bool {
        self.competitor(id).map_or(false, |c| c.is_bye)
    }
}
