//! Integration tests for the six-team, two-group round-robin format.

use bracket_tournament_web::{
    apply_result, build_round_robin, recompute, Classification, CompetitorId, Group, MatchId,
    Player, PlayerId, Tournament, TournamentError, TournamentStatus,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

fn players(n: usize) -> Vec<Player> {
    (0..n).map(|i| Player::new(format!("P{i}"))).collect()
}

fn no_classes() -> HashMap<PlayerId, Classification> {
    HashMap::new()
}

fn build(n: usize, seed: u64) -> Tournament {
    let mut rng = StdRng::seed_from_u64(seed);
    build_round_robin(&players(n), &no_classes(), &mut rng).unwrap()
}

/// Competitor ids of one group, in discovery order over its matches.
fn group_ids(t: &Tournament, group: Group) -> Vec<CompetitorId> {
    let mut ids = Vec::new();
    for m in t.matches.iter().filter(|m| m.group == Some(group)) {
        for id in [m.competitor_a, m.competitor_b].into_iter().flatten() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

fn finals_match(t: &Tournament, index: usize) -> &bracket_tournament_web::BracketMatch {
    t.matches
        .iter()
        .find(|m| m.group == Some(Group::Finals) && m.match_index == index)
        .expect("finals placeholder present")
}

/// Submit a group result between x and y with the scores in that order.
fn submit(t: &mut Tournament, x: CompetitorId, y: CompetitorId, sx: u32, sy: u32) {
    let (id, a): (MatchId, CompetitorId) = {
        let m = t
            .matches
            .iter()
            .find(|m| {
                (m.competitor_a == Some(x) && m.competitor_b == Some(y))
                    || (m.competitor_a == Some(y) && m.competitor_b == Some(x))
            })
            .expect("pairing exists");
        (m.id, m.competitor_a.unwrap())
    };
    let (score_a, score_b) = if a == x { (sx, sy) } else { (sy, sx) };
    let winner = if sx > sy { x } else { y };
    apply_result(t, id, winner, Some(score_a), Some(score_b)).unwrap();
}

/// Group A: a0 sweeps, a1 takes one. Clear 2/1/0 win split.
fn play_group_a(t: &mut Tournament) -> Vec<CompetitorId> {
    let a = group_ids(t, Group::A);
    submit(t, a[0], a[1], 21, 10);
    submit(t, a[1], a[2], 21, 12);
    submit(t, a[0], a[2], 21, 8);
    a
}

/// Group B: a 1-1-1 win cycle decided by points (b0 40, b1 36, b2 31).
fn play_group_b(t: &mut Tournament) -> Vec<CompetitorId> {
    let b = group_ids(t, Group::B);
    submit(t, b[0], b[1], 21, 15);
    submit(t, b[1], b[2], 21, 10);
    submit(t, b[2], b[0], 21, 19);
    b
}

#[test]
fn rejects_below_twelve_players() {
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(
        build_round_robin(&players(11), &no_classes(), &mut rng).err(),
        Some(TournamentError::InsufficientPlayers {
            required: 12,
            provided: 11
        })
    );
}

#[test]
fn twelve_players_make_six_teams_two_groups() {
    let t = build(12, 2);
    assert_eq!(t.competitors.len(), 6);
    assert_eq!(t.rounds, 2);
    assert_eq!(t.matches.len(), 8);
    assert_eq!(group_ids(&t, Group::A).len(), 3);
    assert_eq!(group_ids(&t, Group::B).len(), 3);
    assert!(group_ids(&t, Group::A)
        .iter()
        .all(|id| !group_ids(&t, Group::B).contains(id)));

    // Every team starts with zeroed stats.
    for c in &t.competitors {
        let stats = c.stats.expect("round-robin teams carry stats");
        assert_eq!((stats.wins, stats.points, stats.played), (0, 0, 0));
    }

    // Finals placeholders are empty until both groups complete.
    for index in [0, 1] {
        let f = finals_match(&t, index);
        assert_eq!(f.round, 2);
        assert!(f.competitor_a.is_none() && f.competitor_b.is_none());
    }
}

#[test]
fn extra_players_beyond_twelve_sit_out() {
    let t = build(14, 3);
    assert_eq!(t.competitors.len(), 6);
    assert_eq!(t.matches.len(), 8);
}

#[test]
fn finals_populate_once_both_groups_complete() {
    let mut t = build(12, 4);
    let a = play_group_a(&mut t);

    // One group done, the other untouched: finals stay empty.
    assert!(finals_match(&t, 0).competitor_a.is_none());

    let b = play_group_b(&mut t);

    // Group A standings by wins, group B by the points tie-break.
    let gold = finals_match(&t, 0);
    assert_eq!(gold.competitor_a, Some(a[0]));
    assert_eq!(gold.competitor_b, Some(b[0]));
    let bronze = finals_match(&t, 1);
    assert_eq!(bronze.competitor_a, Some(a[1]));
    assert_eq!(bronze.competitor_b, Some(b[1]));

    // Stats were recomputed from scratch.
    let a0 = t.competitor(a[0]).unwrap().stats.unwrap();
    assert_eq!((a0.wins, a0.played, a0.points), (2, 2, 42));
    let b0 = t.competitor(b[0]).unwrap().stats.unwrap();
    assert_eq!((b0.wins, b0.played, b0.points), (1, 2, 40));

    assert_eq!(t.status, TournamentStatus::Active);
    assert!(t.champion.is_none());
}

#[test]
fn gold_final_winner_becomes_champion() {
    let mut t = build(12, 5);
    let a = play_group_a(&mut t);
    let b = play_group_b(&mut t);

    let gold_id = finals_match(&t, 0).id;
    apply_result(&mut t, gold_id, a[0], Some(21), Some(17)).unwrap();
    assert_eq!(t.champion, Some(a[0]));
    assert_eq!(t.status, TournamentStatus::Completed);

    // The bronze final does not affect champion or status.
    let bronze_id = finals_match(&t, 1).id;
    apply_result(&mut t, bronze_id, b[1], Some(15), Some(21)).unwrap();
    assert_eq!(t.champion, Some(a[0]));
    assert_eq!(t.status, TournamentStatus::Completed);
}

#[test]
fn group_regression_retracts_finals_and_champion() {
    let mut t = build(12, 6);
    let a = play_group_a(&mut t);
    play_group_b(&mut t);

    let gold_id = finals_match(&t, 0).id;
    apply_result(&mut t, gold_id, a[0], Some(21), Some(17)).unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);

    // Wind a group match back to unplayed: both finals empty again and the
    // champion is retracted.
    let edited = t
        .matches
        .iter_mut()
        .find(|m| m.group == Some(Group::A))
        .unwrap();
    edited.winner = None;
    edited.score_a = None;
    edited.score_b = None;
    recompute(&mut t);

    for index in [0, 1] {
        let f = finals_match(&t, index);
        assert!(f.competitor_a.is_none() && f.competitor_b.is_none());
        assert!(f.winner.is_none());
    }
    assert!(t.champion.is_none());
    assert_eq!(t.status, TournamentStatus::Active);
}

#[test]
fn points_tally_saturates_on_huge_scores() {
    let mut t = build(12, 8);
    let a = group_ids(&t, Group::A);

    // Two maximum scores for the same team must not overflow the total.
    submit(&mut t, a[0], a[1], u32::MAX, 0);
    submit(&mut t, a[0], a[2], u32::MAX, 1);

    let stats = t.competitor(a[0]).unwrap().stats.unwrap();
    assert_eq!(stats.points, u32::MAX);
    assert_eq!(stats.played, 2);
    assert_eq!(stats.wins, 2);
}

#[test]
fn recompute_is_idempotent() {
    let mut t = build(12, 7);
    play_group_a(&mut t);
    let before = t.clone();
    recompute(&mut t);
    assert_eq!(t, before);

    play_group_b(&mut t);
    let after = t.clone();
    recompute(&mut t);
    assert_eq!(t, after);
}
