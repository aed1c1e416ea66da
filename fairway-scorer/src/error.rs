//! Validation errors raised by the score synthesizer.
#![forbid(unsafe_code)]

use thiserror::Error;

/// Which neighbor a rejected score belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborSide {
    /// The course directly above the insertion point.
    Above,
    /// The course directly below the insertion point.
    Below,
}

impl std::fmt::Display for NeighborSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Above => "above",
            Self::Below => "below",
        })
    }
}

/// Errors returned when score inputs are malformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// The insertion index lies past the end of the list.
    #[error("rank position {rank_position} is outside 0..={total_courses}")]
    RankOutOfRange {
        /// Requested insertion index.
        rank_position: u32,
        /// List size at rating time.
        total_courses: u32,
    },
    /// A neighbor score was NaN or infinite.
    #[error("neighbor {side} score {score} is not finite")]
    NonFiniteNeighbor {
        /// Which neighbor carried the score.
        side: NeighborSide,
        /// Offending value.
        score: f64,
    },
}
