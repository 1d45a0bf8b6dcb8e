//! Data structures for the tournament organizer: players, competitors,
//! matches, and the tournament aggregate.

mod competitor;
mod game;
mod player;
mod tournament;

pub use competitor::{Competitor, CompetitorId, CompetitorStats};
pub use game::{BracketMatch, Group, MatchId};
pub use player::{Classification, Player, PlayerId};
pub use tournament::{
    Format, MatchKind, Tournament, TournamentError, TournamentId, TournamentStatus,
};
