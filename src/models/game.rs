//! Match and group structures for the bracket.

use crate::models::competitor::CompetitorId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Round-robin grouping tag. Knockout matches carry no group.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    A,
    B,
    Finals,
}

/// A single contest between two competitor slots.
///
/// Slots are `None` until determined (later knockout rounds, round-robin
/// finals). The skeleton is created once at build time; only the updater
/// mutates slots, scores and winner afterwards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    /// 1-based round number (1 = first round).
    pub round: u32,
    /// 0-based index within the round.
    pub match_index: usize,
    pub group: Option<Group>,
    pub competitor_a: Option<CompetitorId>,
    pub competitor_b: Option<CompetitorId>,
    pub score_a: Option<u32>,
    pub score_b: Option<u32>,
    /// One of the two competitor slots, or `None` while undecided.
    pub winner: Option<CompetitorId>,
    /// Where the winner advances (knockout only).
    pub next_match_id: Option<MatchId>,
}

impl BracketMatch {
    /// Empty knockout skeleton match.
    pub fn knockout(round: u32, match_index: usize, next_match_id: Option<MatchId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            match_index,
            group: None,
            competitor_a: None,
            competitor_b: None,
            score_a: None,
            score_b: None,
            winner: None,
            next_match_id,
        }
    }

    /// Group-stage match with both competitors known up front.
    pub fn group(
        group: Group,
        match_index: usize,
        competitor_a: CompetitorId,
        competitor_b: CompetitorId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            round: 1,
            match_index,
            group: Some(group),
            competitor_a: Some(competitor_a),
            competitor_b: Some(competitor_b),
            score_a: None,
            score_b: None,
            winner: None,
            next_match_id: None,
        }
    }

    /// Finals placeholder (round-robin phase 2); competitors are filled in
    /// by the updater once both groups complete.
    pub fn finals_placeholder(match_index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            round: 2,
            match_index,
            group: Some(Group::Finals),
            competitor_a: None,
            competitor_b: None,
            score_a: None,
            score_b: None,
            winner: None,
            next_match_id: None,
        }
    }
}
