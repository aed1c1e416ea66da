//! The persisted per-course rating record.

use std::collections::HashSet;

use thiserror::Error;

use crate::{CourseId, PlayAgainResponse, UserId};

/// Lowest score a rating may carry.
pub const MIN_SCORE: f64 = 1.0;

/// Highest score a rating may carry.
pub const MAX_SCORE: f64 = 10.0;

/// One user's rating of one course.
///
/// This is the record exchanged with a [`RatingStore`](crate::RatingStore).
/// Flows assemble it in memory and persist it in a single call.
///
/// # Examples
///
/// ```
/// use fairway_core::{CourseId, CourseRating, PlayAgainResponse, UserId};
///
/// # fn main() -> Result<(), fairway_core::RatingError> {
/// let rating = CourseRating {
///     user_id: UserId::new("ada"),
///     course_id: CourseId::new("st-andrews"),
///     course_name: "Old Course".into(),
///     course_location: "St Andrews".into(),
///     play_again: PlayAgainResponse::Definitely,
///     comparison_wins: 1,
///     comparison_losses: 0,
///     compared_course_ids: vec![CourseId::new("carnoustie")],
///     rank_position: 0,
///     total_courses: 1,
///     final_score: 9.1,
///     play_count: 2,
/// };
/// rating.validate()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CourseRating {
    /// Owner of the rating.
    pub user_id: UserId,
    /// Rated course.
    pub course_id: CourseId,
    /// Display name of the course.
    pub course_name: String,
    /// Display location of the course.
    pub course_location: String,
    /// Qualitative reaction collected first in the flow.
    pub play_again: PlayAgainResponse,
    /// Comparisons where the rated course was preferred.
    pub comparison_wins: u32,
    /// Comparisons where the other course was preferred.
    pub comparison_losses: u32,
    /// Courses the rated course was compared against, in prompt order.
    pub compared_course_ids: Vec<CourseId>,
    /// Zero-based insertion index chosen by the user; `0` is best.
    pub rank_position: u32,
    /// Size of the ranked list when the rating was taken.
    pub total_courses: u32,
    /// Normalised score in `1.0..=10.0`, rounded to one decimal place.
    pub final_score: f64,
    /// Logged rounds on the course. Display only.
    pub play_count: u32,
}

/// Errors returned by [`CourseRating::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RatingError {
    /// The final score was NaN, infinite or outside `1.0..=10.0`.
    #[error("final score {score} is outside 1.0..=10.0")]
    ScoreOutOfRange {
        /// Offending score.
        score: f64,
    },
    /// The rank position lies beyond the end of the list.
    #[error("rank position {rank_position} exceeds list size {total_courses}")]
    RankOutOfRange {
        /// Recorded insertion index.
        rank_position: u32,
        /// Recorded list size.
        total_courses: u32,
    },
    /// Win and loss counts do not match the compared courses.
    #[error("{wins} wins and {losses} losses recorded against {compared} compared courses")]
    TallyMismatch {
        /// Recorded wins.
        wins: u32,
        /// Recorded losses.
        losses: u32,
        /// Number of compared course identifiers.
        compared: usize,
    },
    /// A course was compared against itself.
    #[error("course {0} lists itself as a comparison")]
    SelfComparison(CourseId),
    /// The same course appears twice in the comparison list.
    #[error("course {0} was compared more than once")]
    DuplicateComparison(CourseId),
}

impl CourseRating {
    /// Check the record's internal invariants.
    ///
    /// # Errors
    /// Returns the first [`RatingError`] encountered.
    pub fn validate(&self) -> Result<(), RatingError> {
        if !self.final_score.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&self.final_score) {
            return Err(RatingError::ScoreOutOfRange {
                score: self.final_score,
            });
        }
        if self.rank_position > self.total_courses {
            return Err(RatingError::RankOutOfRange {
                rank_position: self.rank_position,
                total_courses: self.total_courses,
            });
        }
        let recorded = u64::from(self.comparison_wins) + u64::from(self.comparison_losses);
        if usize::try_from(recorded).ok() != Some(self.compared_course_ids.len()) {
            return Err(RatingError::TallyMismatch {
                wins: self.comparison_wins,
                losses: self.comparison_losses,
                compared: self.compared_course_ids.len(),
            });
        }
        let mut seen = HashSet::with_capacity(self.compared_course_ids.len());
        for id in &self.compared_course_ids {
            if *id == self.course_id {
                return Err(RatingError::SelfComparison(id.clone()));
            }
            if !seen.insert(id) {
                return Err(RatingError::DuplicateComparison(id.clone()));
            }
        }
        Ok(())
    }
}
