//! Caller-side score validation. The bracket core assumes a winner is
//! always determinable, so equal scores must be rejected before a result
//! reaches `apply_result`.

use crate::models::TournamentError;

/// Check a submitted score pair: both must be non-negative and unequal.
/// Returns the validated pair ready for `apply_result`.
pub fn validate_scores(score_a: i64, score_b: i64) -> Result<(u32, u32), TournamentError> {
    if score_a < 0 || score_b < 0 {
        return Err(TournamentError::InvalidScore);
    }
    if score_a > i64::from(u32::MAX) || score_b > i64::from(u32::MAX) {
        return Err(TournamentError::InvalidScore);
    }
    if score_a == score_b {
        return Err(TournamentError::InvalidScore);
    }
    Ok((score_a as u32, score_b as u32))
}
