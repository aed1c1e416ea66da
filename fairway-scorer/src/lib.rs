//! Score synthesis for Fairway course ratings.
//!
//! A final score in `1.0..=10.0` is blended from four components:
//! - a **base score** looked up from the play-again response,
//! - a **comparison adjustment** mapping the head-to-head win rate onto
//!   `2.0..=9.0`,
//! - a **position score** mapping the chosen insertion percentile onto
//!   `1.0..=10.0`,
//! - a **neighbor score** interpolated from the courses around the insertion
//!   point, falling back to the position score when the list is empty there.
//!
//! The constants live in a versioned [`ScorePolicy`] table.
//!
//! # Examples
//!
//! ```
//! use fairway_core::{NeighborScores, PlayAgainResponse};
//! use fairway_scorer::calculate_final_score;
//!
//! # fn main() -> Result<(), fairway_scorer::ScoreError> {
//! let score = calculate_final_score(PlayAgainResponse::No, 0, 2, 4, 5, NeighborScores::NONE)?;
//! assert_eq!(score, 2.0);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use fairway_core::{NeighborScores, PlayAgainResponse};

mod error;
mod policy;
mod synth;

pub use error::{NeighborSide, ScoreError};
pub use policy::{BlendWeights, PolicyTable, ScorePolicy};
pub use synth::{ComparisonTally, ScoreBreakdown, ScoreInputs, ScoreSynthesizer};

/// Compute a final score under the default policy.
///
/// # Errors
/// Returns [`ScoreError`] when `rank_position` exceeds `total_courses` or a
/// neighbor score is not finite.
pub fn calculate_final_score(
    play_again: PlayAgainResponse,
    wins: u32,
    losses: u32,
    rank_position: u32,
    total_courses: u32,
    neighbors: NeighborScores,
) -> Result<f64, ScoreError> {
    ScoreSynthesizer::default().calculate_final_score(&ScoreInputs {
        play_again,
        tally: ComparisonTally::new(wins, losses),
        rank_position,
        total_courses,
        neighbors,
    })
}

#[cfg(test)]
mod tests;
