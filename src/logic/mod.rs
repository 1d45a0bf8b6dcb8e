//! Tournament logic: bracket construction and result propagation.

mod bracket;
mod knockout;
mod round_robin;
mod score;

pub use bracket::{apply_result, recompute};
pub use knockout::build_knockout;
pub use round_robin::build_round_robin;
pub use score::validate_scores;
