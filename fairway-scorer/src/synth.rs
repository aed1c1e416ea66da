//! Blend the play-again response, comparison record and chosen position into
//! a final score.
#![forbid(unsafe_code)]

use fairway_core::{MAX_SCORE, MIN_SCORE, NeighborScores, PlayAgainResponse};
use serde::{Deserialize, Serialize};

use crate::{NeighborSide, PolicyTable, ScoreError, ScorePolicy};

/// Running count of comparison outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComparisonTally {
    /// Comparisons where the rated course was preferred.
    pub wins: u32,
    /// Comparisons where the other course was preferred.
    pub losses: u32,
}

impl ComparisonTally {
    /// Build a tally from explicit counts.
    #[must_use]
    pub const fn new(wins: u32, losses: u32) -> Self {
        Self { wins, losses }
    }

    /// Total comparisons answered.
    #[must_use]
    pub fn total(self) -> u64 {
        u64::from(self.wins) + u64::from(self.losses)
    }

    /// Return the tally with one more win.
    #[must_use]
    pub const fn with_win(self) -> Self {
        Self {
            wins: self.wins.saturating_add(1),
            losses: self.losses,
        }
    }

    /// Return the tally with one more loss.
    #[must_use]
    pub const fn with_loss(self) -> Self {
        Self {
            wins: self.wins,
            losses: self.losses.saturating_add(1),
        }
    }
}

/// Everything the synthesizer needs to score a course.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreInputs {
    /// Qualitative reaction.
    pub play_again: PlayAgainResponse,
    /// Comparison outcomes.
    pub tally: ComparisonTally,
    /// Chosen insertion index, `0` being best.
    pub rank_position: u32,
    /// List size before insertion.
    pub total_courses: u32,
    /// Scores around the insertion index.
    pub neighbors: NeighborScores,
}

/// Every intermediate value behind a final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Policy that produced the score.
    pub policy: ScorePolicy,
    /// Base score from the play-again response.
    pub base: f64,
    /// Comparison adjustment in `2.0..=9.0`, or neutral.
    pub comparison: f64,
    /// Position score from the insertion percentile, or neutral.
    pub position: f64,
    /// Interpolated neighbor score, absent when the list had no neighbors.
    pub neighbor: Option<f64>,
    /// Weighted sum before clamping and rounding.
    pub blended: f64,
    /// Final score in `1.0..=10.0`, rounded to one decimal place.
    pub final_score: f64,
}

/// Pure score calculator parameterised by a [`ScorePolicy`].
///
/// # Examples
/// ```
/// use fairway_core::{NeighborScores, PlayAgainResponse};
/// use fairway_scorer::{ComparisonTally, ScoreInputs, ScoreSynthesizer};
///
/// # fn main() -> Result<(), fairway_scorer::ScoreError> {
/// let synthesizer = ScoreSynthesizer::default();
/// let score = synthesizer.calculate_final_score(&ScoreInputs {
///     play_again: PlayAgainResponse::Definitely,
///     tally: ComparisonTally::new(3, 0),
///     rank_position: 0,
///     total_courses: 5,
///     neighbors: NeighborScores::NONE,
/// })?;
/// assert_eq!(score, 9.4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreSynthesizer {
    policy: ScorePolicy,
}

impl ScoreSynthesizer {
    /// Build a synthesizer for `policy`.
    #[must_use]
    pub const fn new(policy: ScorePolicy) -> Self {
        Self { policy }
    }

    /// Policy in use.
    #[must_use]
    pub const fn policy(&self) -> ScorePolicy {
        self.policy
    }

    /// Compute the final score.
    ///
    /// # Errors
    /// Returns [`ScoreError`] when the inputs are malformed.
    pub fn calculate_final_score(&self, inputs: &ScoreInputs) -> Result<f64, ScoreError> {
        self.breakdown(inputs).map(|breakdown| breakdown.final_score)
    }

    /// Compute the final score along with every intermediate component.
    ///
    /// # Errors
    /// Returns [`ScoreError::RankOutOfRange`] when `rank_position` exceeds
    /// `total_courses`, and [`ScoreError::NonFiniteNeighbor`] when a neighbor
    /// score is NaN or infinite.
    pub fn breakdown(&self, inputs: &ScoreInputs) -> Result<ScoreBreakdown, ScoreError> {
        validate(inputs)?;
        let table = self.policy.table();

        let base = self.policy.base_score(inputs.play_again);
        let comparison = comparison_adjustment(table, inputs.tally);
        let position = position_score(table, inputs.rank_position, inputs.total_courses);
        let neighbor = neighbor_score(table, inputs.neighbors);
        let blended = blend(table, base, comparison, position, neighbor);
        let final_score = round_to_tenth(blended.clamp(MIN_SCORE, MAX_SCORE));

        log::trace!(
            "scored base={base} comparison={comparison} position={position} \
             neighbor={neighbor:?} blended={blended} final={final_score}"
        );

        Ok(ScoreBreakdown {
            policy: self.policy,
            base,
            comparison,
            position,
            neighbor,
            blended,
            final_score,
        })
    }
}

fn validate(inputs: &ScoreInputs) -> Result<(), ScoreError> {
    if inputs.rank_position > inputs.total_courses {
        return Err(ScoreError::RankOutOfRange {
            rank_position: inputs.rank_position,
            total_courses: inputs.total_courses,
        });
    }
    for (side, score) in [
        (NeighborSide::Above, inputs.neighbors.above),
        (NeighborSide::Below, inputs.neighbors.below),
    ] {
        if let Some(value) = score
            && !value.is_finite()
        {
            return Err(ScoreError::NonFiniteNeighbor { side, score: value });
        }
    }
    Ok(())
}

#[expect(
    clippy::float_arithmetic,
    reason = "the win rate maps linearly onto the comparison range"
)]
fn comparison_adjustment(table: &PolicyTable, tally: ComparisonTally) -> f64 {
    if tally.total() == 0 {
        return table.neutral;
    }
    let wins = f64::from(tally.wins);
    let answered = wins + f64::from(tally.losses);
    table.comparison_floor + (wins / answered) * table.comparison_span
}

#[expect(
    clippy::float_arithmetic,
    reason = "the insertion percentile maps linearly onto the position range"
)]
fn position_score(table: &PolicyTable, rank_position: u32, total_courses: u32) -> f64 {
    if total_courses == 0 {
        return table.neutral;
    }
    let denominator = f64::from(total_courses.saturating_sub(1).max(1));
    let percentile = 1.0 - f64::from(rank_position) / denominator;
    table.position_floor + percentile * table.position_span
}

#[expect(
    clippy::float_arithmetic,
    reason = "neighbor interpolation averages or offsets adjacent scores"
)]
fn neighbor_score(table: &PolicyTable, neighbors: NeighborScores) -> Option<f64> {
    match (neighbors.above, neighbors.below) {
        (Some(above), Some(below)) => Some(f64::midpoint(above, below)),
        (Some(above), None) => Some((above - table.neighbor_offset).clamp(MIN_SCORE, MAX_SCORE)),
        (None, Some(below)) => Some((below + table.neighbor_offset).clamp(MIN_SCORE, MAX_SCORE)),
        (None, None) => None,
    }
}

// The neighbor slot falls back to the position score, so without neighbors
// the position carries both the position and the neighbor weight.
#[expect(
    clippy::float_arithmetic,
    reason = "the final score is a weighted sum of components"
)]
fn blend(
    table: &PolicyTable,
    base: f64,
    comparison: f64,
    position: f64,
    neighbor: Option<f64>,
) -> f64 {
    let weights = table.weights;
    weights.base * base
        + weights.comparison * comparison
        + weights.position * position
        + weights.neighbor * neighbor.unwrap_or(position)
}

/// Precision kept after scaling by ten; anything finer is representation
/// error from the weighted sum.
const SNAP: f64 = 1e6;

// A blend that is exactly k.k5 can come out as k.k4999..., so the scaled
// value is snapped to `SNAP` first and ties then round away from zero.
#[expect(
    clippy::float_arithmetic,
    reason = "rounding to one decimal scales by ten"
)]
fn round_to_tenth(value: f64) -> f64 {
    let scaled = value * 10.0;
    ((scaled * SNAP).round() / SNAP).round() / 10.0
}
