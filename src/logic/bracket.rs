//! Bracket recomputation: bye resolution, winner propagation, group
//! standings, finals selection, and champion/status derivation.
//!
//! The whole derived state is recomputed from scratch on every call rather
//! than diffed incrementally, so score corrections on earlier rounds
//! retract everything downstream that depended on the changed path.

use crate::models::{
    BracketMatch, CompetitorId, CompetitorStats, Format, Group, MatchId, Tournament,
    TournamentError, TournamentStatus,
};

/// Record a match result (winner plus any provided scores), then recompute
/// all derived state.
pub fn apply_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: CompetitorId,
    score_a: Option<u32>,
    score_b: Option<u32>,
) -> Result<(), TournamentError> {
    let m = tournament
        .find_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    m.winner = Some(winner);
    if let Some(a) = score_a {
        m.score_a = Some(a);
    }
    if let Some(b) = score_b {
        m.score_b = Some(b);
    }
    recompute(tournament);
    Ok(())
}

/// Re-derive winners, standings, finals participants, champion and status.
/// Idempotent; safe to call at any time.
pub fn recompute(tournament: &mut Tournament) {
    match tournament.format {
        Format::Knockout => recompute_knockout(tournament),
        Format::RoundRobinSix => recompute_round_robin(tournament),
    }
}

fn recompute_knockout(tournament: &mut Tournament) {
    // One pass in ascending round order cascades changes to the end of the
    // bracket, since every next_match_id points one round later.
    let mut order: Vec<usize> = (0..tournament.matches.len()).collect();
    order.sort_by_key(|&i| tournament.matches[i].round);

    for idx in order {
        // Infer a winner when a bye is involved.
        let (a, b, winner) = {
            let m = &tournament.matches[idx];
            (m.competitor_a, m.competitor_b, m.winner)
        };
        if winner.is_none() {
            if let (Some(a), Some(b)) = (a, b) {
                let a_bye = tournament.is_bye(a);
                let b_bye = tournament.is_bye(b);
                let inferred = if b_bye && !a_bye {
                    Some(a)
                } else if a_bye && !b_bye {
                    Some(b)
                } else if a_bye && b_bye {
                    // Degenerate pairing: slot A advances.
                    Some(a)
                } else {
                    None
                };
                if inferred.is_some() {
                    tournament.matches[idx].winner = inferred;
                }
            }
        }

        // Push the (possibly absent) winner into the successor match. A
        // changed slot clears the successor's winner so everything
        // downstream of a score correction re-resolves.
        let (winner, next_id, match_index) = {
            let m = &tournament.matches[idx];
            (m.winner, m.next_match_id, m.match_index)
        };
        if let Some(next_id) = next_id {
            if let Some(next) = tournament.find_match_mut(next_id) {
                let slot = if match_index % 2 == 0 {
                    &mut next.competitor_a
                } else {
                    &mut next.competitor_b
                };
                if *slot != winner {
                    *slot = winner;
                    next.winner = None;
                }
            }
        }
    }

    let final_winner = tournament
        .matches
        .iter()
        .find(|m| m.round == tournament.rounds)
        .and_then(|m| m.winner);
    set_champion(tournament, final_winner);
}

fn recompute_round_robin(tournament: &mut Tournament) {
    // 1. Reset stats for every competitor appearing in a group match,
    // collected in discovery order.
    let mut participants: Vec<CompetitorId> = Vec::new();
    for m in &tournament.matches {
        if matches!(m.group, Some(Group::A) | Some(Group::B)) {
            for id in [m.competitor_a, m.competitor_b].into_iter().flatten() {
                if !participants.contains(&id) {
                    participants.push(id);
                }
            }
        }
    }
    for &id in &participants {
        if let Some(c) = tournament.competitor_mut(id) {
            c.stats = Some(CompetitorStats::default());
        }
    }

    // 2. Tally from scratch. A match counts only with a winner and both
    // scores recorded.
    let tallies: Vec<(CompetitorId, CompetitorId, u32, u32, CompetitorId)> = tournament
        .matches
        .iter()
        .filter(|m| matches!(m.group, Some(Group::A) | Some(Group::B)))
        .filter_map(|m| {
            let winner = m.winner?;
            Some((m.competitor_a?, m.competitor_b?, m.score_a?, m.score_b?, winner))
        })
        .collect();
    for (a, b, score_a, score_b, winner) in tallies {
        add_group_result(tournament, a, score_a, winner == a);
        add_group_result(tournament, b, score_b, winner == b);
    }

    // 3. Standings and completion per group.
    let (standings_a, complete_a) = group_standings(tournament, Group::A);
    let (standings_b, complete_b) = group_standings(tournament, Group::B);

    // 4. Finals participants: rank 1 meets rank 1, rank 2 meets rank 2.
    // An incomplete group (after a score edit) retracts the finals.
    let gold_id = finals_match_id(tournament, 0);
    let bronze_id = finals_match_id(tournament, 1);
    if complete_a && complete_b {
        if let Some(id) = gold_id {
            set_finals_slots(
                tournament,
                id,
                standings_a.first().copied(),
                standings_b.first().copied(),
            );
        }
        if let Some(id) = bronze_id {
            set_finals_slots(
                tournament,
                id,
                standings_a.get(1).copied(),
                standings_b.get(1).copied(),
            );
        }
    } else {
        for id in [gold_id, bronze_id].into_iter().flatten() {
            if let Some(m) = tournament.find_match_mut(id) {
                m.competitor_a = None;
                m.competitor_b = None;
                m.winner = None;
            }
        }
    }

    // 5. Champion mirrors the gold final.
    let champion = gold_id
        .and_then(|id| tournament.find_match(id))
        .and_then(|m| m.winner);
    set_champion(tournament, champion);
}

fn set_champion(tournament: &mut Tournament, winner: Option<CompetitorId>) {
    match winner {
        Some(w) => {
            tournament.champion = Some(w);
            tournament.status = TournamentStatus::Completed;
        }
        None => {
            tournament.champion = None;
            tournament.status = TournamentStatus::Active;
        }
    }
}

fn add_group_result(tournament: &mut Tournament, id: CompetitorId, points: u32, won: bool) {
    if let Some(stats) = tournament
        .competitor_mut(id)
        .and_then(|c| c.stats.as_mut())
    {
        stats.played += 1;
        // Scores are only bounded by u32, so the running total saturates
        // rather than overflowing across a team's matches.
        stats.points = stats.points.saturating_add(points);
        if won {
            stats.wins += 1;
        }
    }
}

/// Standings (best first) and completion flag for one group. Sorted by wins
/// descending, then points descending; the stable sort keeps discovery
/// order for full ties.
fn group_standings(tournament: &Tournament, group: Group) -> (Vec<CompetitorId>, bool) {
    let matches: Vec<&BracketMatch> = tournament
        .matches
        .iter()
        .filter(|m| m.group == Some(group))
        .collect();

    let mut ids: Vec<CompetitorId> = Vec::new();
    for m in &matches {
        for id in [m.competitor_a, m.competitor_b].into_iter().flatten() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }

    let stats_of = |id: CompetitorId| -> CompetitorStats {
        tournament
            .competitor(id)
            .and_then(|c| c.stats)
            .unwrap_or_default()
    };
    ids.sort_by(|&x, &y| {
        let (sx, sy) = (stats_of(x), stats_of(y));
        sy.wins.cmp(&sx.wins).then(sy.points.cmp(&sx.points))
    });

    let complete = matches.iter().all(|m| m.winner.is_some());
    (ids, complete)
}

fn finals_match_id(tournament: &Tournament, index: usize) -> Option<MatchId> {
    tournament
        .matches
        .iter()
        .find(|m| m.group == Some(Group::Finals) && m.match_index == index)
        .map(|m| m.id)
}

/// Overwrite a finals match's slots only where the id actually differs.
fn set_finals_slots(
    tournament: &mut Tournament,
    id: MatchId,
    a: Option<CompetitorId>,
    b: Option<CompetitorId>,
) {
    if let Some(m) = tournament.find_match_mut(id) {
        if m.competitor_a != a {
            m.competitor_a = a;
        }
        if m.competitor_b != b {
            m.competitor_b = b;
        }
    }
}
