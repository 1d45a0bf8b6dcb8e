//! Knockout bracket construction: competitor pairing, seed placement,
//! bye assignment, and the round/match skeleton.

use crate::logic::bracket::recompute;
use crate::models::{
    BracketMatch, Classification, Competitor, CompetitorId, Format, MatchId, MatchKind, Player,
    PlayerId, Tournament, TournamentError,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Priority list of slot indices for seed placement in a bracket of `size`
/// slots: top, bottom, the middle pair (size >= 4), then the four quarter
/// boundaries (size >= 8). Placement falls back to the first empty slot in
/// index order once the list is exhausted.
fn seeding_indices(size: usize) -> Vec<usize> {
    let mut priority = vec![0];
    if size > 1 {
        priority.push(size - 1);
    }
    if size >= 4 {
        priority.push(size / 2);
        priority.push(size / 2 - 1);
    }
    if size >= 8 {
        let q = size / 4;
        priority.push(q);
        priority.push(size - 1 - q);
        priority.push(size / 2 + q);
        priority.push(size / 2 - 1 - q);
    }
    priority
}

/// Place one competitor into the highest-priority empty slot, falling back
/// to the first empty slot in index order.
fn place_priority(slots: &mut [Option<CompetitorId>], priority: &[usize], id: CompetitorId) {
    if let Some(&idx) = priority.iter().find(|&&i| slots[i].is_none()) {
        slots[idx] = Some(id);
    } else if let Some(empty) = slots.iter().position(|s| s.is_none()) {
        slots[empty] = Some(id);
    }
}

/// The round-1 slot a competitor at slot `i` faces.
fn opponent_slot(i: usize) -> usize {
    if i % 2 == 0 {
        i + 1
    } else {
        i - 1
    }
}

/// Build a single-elimination tournament.
///
/// Singles needs 2 players, doubles 4; doubles pairs consecutive players
/// from a shuffled ordering, dropping a trailing unpaired player. The
/// bracket is padded with byes to the next power of two, seeds and
/// separated competitors get priority slots, seeds get bye protection, and
/// the updater runs once to resolve bye-only pairings before returning.
pub fn build_knockout(
    players: &[Player],
    classification: &HashMap<PlayerId, Classification>,
    kind: MatchKind,
    rng: &mut impl Rng,
) -> Result<Tournament, TournamentError> {
    let required = match kind {
        MatchKind::Singles => 2,
        MatchKind::Doubles => 4,
    };
    if players.len() < required {
        return Err(TournamentError::InsufficientPlayers {
            required,
            provided: players.len(),
        });
    }

    let mut shuffled: Vec<Player> = players.to_vec();
    shuffled.shuffle(rng);

    // 1. Competitors: one per player, or consecutive shuffled pairs.
    let mut competitors: Vec<Competitor> = match kind {
        MatchKind::Singles => shuffled.into_iter().map(Competitor::singles).collect(),
        MatchKind::Doubles => shuffled
            .chunks_exact(2)
            .map(|pair| Competitor::doubles(pair[0].clone(), pair[1].clone()))
            .collect(),
    };

    // 2. Classify: seed wins over separated when a pair qualifies for both.
    for comp in &mut competitors {
        let has_seed = comp
            .players
            .iter()
            .any(|p| classification.get(&p.id) == Some(&Classification::Seed));
        let has_separated = comp
            .players
            .iter()
            .any(|p| classification.get(&p.id) == Some(&Classification::Separated));
        if has_seed {
            comp.is_seed = true;
        } else if has_separated {
            comp.is_separated = true;
        }
    }

    let seed_ids: Vec<CompetitorId> = competitors
        .iter()
        .filter(|c| c.is_seed)
        .map(|c| c.id)
        .collect();
    let separated_ids: Vec<CompetitorId> = competitors
        .iter()
        .filter(|c| c.is_separated)
        .map(|c| c.id)
        .collect();
    let regular_ids: Vec<CompetitorId> = competitors
        .iter()
        .filter(|c| !c.is_seed && !c.is_separated)
        .map(|c| c.id)
        .collect();

    // 3. Pad to the next power of two; unfilled slots become byes.
    let count = competitors.len();
    let size = count.next_power_of_two();

    let mut slots: Vec<Option<CompetitorId>> = vec![None; size];
    let priority = seeding_indices(size);

    // 3a/3b. Seeds first, then separated, by priority index.
    for &id in &seed_ids {
        place_priority(&mut slots, &priority, id);
    }
    for &id in &separated_ids {
        place_priority(&mut slots, &priority, id);
    }

    // 3c. One shared bye competitor covers every empty pairing.
    let mut byes_needed = size - count;
    let bye_id = if byes_needed > 0 {
        let bye = Competitor::bye();
        let id = bye.id;
        competitors.push(bye);
        Some(id)
    } else {
        None
    };

    // 3d. Bye protection: seeds without a sibling get a bye opponent while
    // unassigned byes remain.
    if let Some(bye) = bye_id {
        for i in 0..size {
            if byes_needed == 0 {
                break;
            }
            let Some(id) = slots[i] else { continue };
            if !seed_ids.contains(&id) {
                continue;
            }
            let opponent = opponent_slot(i);
            if slots[opponent].is_none() {
                slots[opponent] = Some(bye);
                byes_needed -= 1;
            }
        }
    }

    // 3e. Remaining byes and regulars shuffled together, poured into the
    // remaining empty slots in index order.
    let mut pool: Vec<CompetitorId> = regular_ids;
    if let Some(bye) = bye_id {
        pool.extend(std::iter::repeat(bye).take(byes_needed));
    }
    pool.shuffle(rng);

    let empty_slots: Vec<usize> = (0..size).filter(|&i| slots[i].is_none()).collect();
    for (slot_idx, comp_id) in empty_slots.into_iter().zip(pool) {
        slots[slot_idx] = Some(comp_id);
    }

    // 4. Skeleton for every round, built last round first so each match
    // knows where its winner advances.
    let rounds = size.trailing_zeros();
    let mut per_round: Vec<Vec<BracketMatch>> = Vec::new();
    let mut next_ids: Vec<MatchId> = Vec::new();
    for r in (1..=rounds).rev() {
        let num = size >> r;
        let round: Vec<BracketMatch> = (0..num)
            .map(|i| BracketMatch::knockout(r, i, next_ids.get(i / 2).copied()))
            .collect();
        next_ids = round.iter().map(|m| m.id).collect();
        per_round.push(round);
    }
    let mut matches: Vec<BracketMatch> = per_round.into_iter().rev().flatten().collect();

    for m in matches.iter_mut().filter(|m| m.round == 1) {
        m.competitor_a = slots[m.match_index * 2];
        m.competitor_b = slots[m.match_index * 2 + 1];
    }

    let mut tournament = Tournament::new(kind, Format::Knockout);
    tournament.competitors = competitors;
    tournament.matches = matches;
    tournament.rounds = rounds;

    // Resolve bye-only pairings immediately.
    recompute(&mut tournament);

    Ok(tournament)
}
