//! Six-team round-robin construction: two groups of three plus gold and
//! bronze finals placeholders.

use crate::logic::bracket::recompute;
use crate::models::{
    BracketMatch, Classification, Competitor, CompetitorId, CompetitorStats, Format, Group,
    MatchKind, Player, PlayerId, Tournament, TournamentError,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Six doubles teams.
const REQUIRED_PLAYERS: usize = 12;

/// Round-robin pairings for a 3-team group, by group-local index.
const GROUP_PAIRINGS: [(usize, usize); 3] = [(0, 1), (1, 2), (0, 2)];

/// Build the six-team, two-group round-robin tournament.
///
/// Shuffles the players, pairs the first twelve into six doubles teams with
/// zeroed stats, and splits them into Group A (first 3) and Group B (next 3).
/// Groups are assigned without seeding logic; the classification map is
/// accepted for interface symmetry with the knockout builder.
pub fn build_round_robin(
    players: &[Player],
    _classification: &HashMap<PlayerId, Classification>,
    rng: &mut impl Rng,
) -> Result<Tournament, TournamentError> {
    if players.len() < REQUIRED_PLAYERS {
        return Err(TournamentError::InsufficientPlayers {
            required: REQUIRED_PLAYERS,
            provided: players.len(),
        });
    }

    let mut shuffled: Vec<Player> = players.to_vec();
    shuffled.shuffle(rng);

    let competitors: Vec<Competitor> = shuffled[..REQUIRED_PLAYERS]
        .chunks_exact(2)
        .map(|pair| {
            let mut c = Competitor::doubles(pair[0].clone(), pair[1].clone());
            c.stats = Some(CompetitorStats::default());
            c
        })
        .collect();

    let group_a: Vec<CompetitorId> = competitors[..3].iter().map(|c| c.id).collect();
    let group_b: Vec<CompetitorId> = competitors[3..6].iter().map(|c| c.id).collect();

    let mut matches: Vec<BracketMatch> = Vec::with_capacity(8);
    for (group, ids) in [(Group::A, &group_a), (Group::B, &group_b)] {
        for &(x, y) in &GROUP_PAIRINGS {
            let index = matches.len();
            matches.push(BracketMatch::group(group, index, ids[x], ids[y]));
        }
    }

    // Gold: A1 vs B1, bronze: A2 vs B2; filled in once both groups complete.
    matches.push(BracketMatch::finals_placeholder(0));
    matches.push(BracketMatch::finals_placeholder(1));

    let mut tournament = Tournament::new(MatchKind::Doubles, Format::RoundRobinSix);
    tournament.competitors = competitors;
    tournament.matches = matches;
    tournament.rounds = 2; // group phase, finals phase

    recompute(&mut tournament);

    Ok(tournament)
}
