//! Values exchanged between the rating flow and its caller.

use std::fmt;

use fairway_core::{CourseId, RankedEntry};
use fairway_scorer::ScoreBreakdown;

/// Course being rated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCourse {
    /// Course identifier.
    pub course_id: CourseId,
    /// Display name.
    pub course_name: String,
    /// Display location.
    pub course_location: String,
}

impl CandidateCourse {
    /// Describe a course to rate.
    pub fn new(
        course_id: impl Into<CourseId>,
        course_name: impl Into<String>,
        course_location: impl Into<String>,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            course_name: course_name.into(),
            course_location: course_location.into(),
        }
    }
}

/// Opaque identifier of a rating session.
///
/// Handles are never reused by the flow that issued them, so a handle kept
/// after confirmation or cancellation is simply unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(u64);

impl SessionHandle {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Numeric identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Phase a live session is waiting in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    /// Waiting for the play-again reaction.
    PlayAgain,
    /// Waiting for comparison `index` out of `of`.
    Comparison {
        /// Zero-based comparison index.
        index: usize,
        /// Number of comparisons in the session.
        of: usize,
    },
    /// Waiting for the insertion position.
    DragRank,
    /// Score computed, waiting for the commit.
    Confirmation,
}

impl fmt::Display for FlowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayAgain => f.write_str("a play-again response"),
            Self::Comparison { index, of } => {
                write!(f, "comparison {} of {of}", index.saturating_add(1))
            }
            Self::DragRank => f.write_str("a rank position"),
            Self::Confirmation => f.write_str("confirmation"),
        }
    }
}

/// One head-to-head question.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonPrompt {
    /// Zero-based comparison index.
    pub index: usize,
    /// Number of comparisons in the session.
    pub of: usize,
    /// Course being rated.
    pub candidate: CandidateCourse,
    /// Previously rated course it is compared against.
    pub opponent: RankedEntry,
}

/// Request for the insertion position.
#[derive(Debug, Clone, PartialEq)]
pub struct RankPrompt {
    /// Course being rated.
    pub candidate: CandidateCourse,
    /// The user's ranked list, best first, without the candidate.
    pub ranked: Vec<RankedEntry>,
}

impl RankPrompt {
    /// Number of ranked courses; valid positions are `0..=total_courses()`.
    #[must_use]
    pub fn total_courses(&self) -> usize {
        self.ranked.len()
    }
}

/// What the caller should ask for next.
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    /// Ask a comparison question.
    Compare(ComparisonPrompt),
    /// Ask for the insertion position.
    Rank(RankPrompt),
}

/// Result of placing the candidate in the ranked list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPlacement {
    /// Final score in `1.0..=10.0`.
    pub final_score: f64,
    /// Chosen insertion index.
    pub rank_position: u32,
    /// List size the index refers to.
    pub total_courses: u32,
    /// Components behind the final score.
    pub breakdown: ScoreBreakdown,
}
