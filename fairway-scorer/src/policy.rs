//! Versioned scoring constants.
#![forbid(unsafe_code)]

use fairway_core::PlayAgainResponse;
use serde::{Deserialize, Serialize};

/// Weights applied to each component of the final blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    /// Weight of the play-again base score.
    pub base: f64,
    /// Weight of the comparison adjustment.
    pub comparison: f64,
    /// Weight of the position score.
    pub position: f64,
    /// Weight of the neighbor score, or of the position score again when no
    /// neighbor exists.
    pub neighbor: f64,
}

/// Every constant the synthesizer uses, frozen per policy version.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyTable {
    /// Base score for [`PlayAgainResponse::Definitely`].
    pub definitely: f64,
    /// Base score for [`PlayAgainResponse::Maybe`].
    pub maybe: f64,
    /// Base score for [`PlayAgainResponse::No`].
    pub no: f64,
    /// Score used when a component has no information to work from.
    pub neutral: f64,
    /// Comparison adjustment at a 0% win rate.
    pub comparison_floor: f64,
    /// Distance from the comparison floor to a 100% win rate.
    pub comparison_span: f64,
    /// Position score at the bottom of the list.
    pub position_floor: f64,
    /// Distance from the position floor to the top of the list.
    pub position_span: f64,
    /// Offset applied toward the open end when only one neighbor exists.
    pub neighbor_offset: f64,
    /// Blend weights.
    pub weights: BlendWeights,
}

const V1_TABLE: PolicyTable = PolicyTable {
    definitely: 8.5,
    maybe: 6.0,
    no: 3.5,
    neutral: 6.0,
    comparison_floor: 2.0,
    comparison_span: 7.0,
    position_floor: 1.0,
    position_span: 9.0,
    neighbor_offset: 0.5,
    weights: BlendWeights {
        base: 0.3,
        comparison: 0.2,
        position: 0.3,
        neighbor: 0.2,
    },
};

/// Named, versioned scoring policy.
///
/// Stored ratings were produced under a specific policy; new versions are
/// added as variants rather than editing an existing table.
///
/// # Examples
/// ```
/// use fairway_core::PlayAgainResponse;
/// use fairway_scorer::ScorePolicy;
///
/// let policy = ScorePolicy::default();
/// assert_eq!(policy, ScorePolicy::V1);
/// assert_eq!(policy.base_score(PlayAgainResponse::Definitely), 8.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorePolicy {
    /// First published weighting: `0.3/0.2/0.3/0.2` with base scores
    /// `8.5/6.0/3.5`.
    #[default]
    V1,
}

impl ScorePolicy {
    /// Return the constants for this policy.
    #[must_use]
    pub const fn table(self) -> &'static PolicyTable {
        match self {
            Self::V1 => &V1_TABLE,
        }
    }

    /// Fixed base score for a play-again response.
    #[must_use]
    pub const fn base_score(self, response: PlayAgainResponse) -> f64 {
        let table = self.table();
        match response {
            PlayAgainResponse::Definitely => table.definitely,
            PlayAgainResponse::Maybe => table.maybe,
            PlayAgainResponse::No => table.no,
        }
    }
}
