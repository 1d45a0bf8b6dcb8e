//! Club tournament web app: library with models, bracket logic, and the
//! player roster.

pub mod logic;
pub mod models;
pub mod roster;

pub use logic::{apply_result, build_knockout, build_round_robin, recompute, validate_scores};
pub use models::{
    BracketMatch, Classification, Competitor, CompetitorId, CompetitorStats, Format, Group,
    MatchId, MatchKind, Player, PlayerId, Tournament, TournamentError, TournamentId,
    TournamentStatus,
};
pub use roster::Roster;
