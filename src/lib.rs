//! Facade crate for the Fairway course rating engine.
//!
//! This crate re-exports the core rating records, the score synthesizer and
//! the rating flow controller, and exposes the SQLite store behind a feature
//! flag.

#![forbid(unsafe_code)]

pub use fairway_core::{
    CourseId, CourseRating, NeighborScores, PlayAgainResponse, RankedEntry, RankedList,
    RatingError, RatingStore, RoundLog, RoundRecord, StoreError, UserId,
};

#[cfg(feature = "store-sqlite")]
pub use fairway_core::{SqliteRatingStore, SqliteRatingStoreError};

pub use fairway_scorer::{
    ComparisonTally, ScoreBreakdown, ScoreError, ScoreInputs, ScorePolicy, ScoreSynthesizer,
    calculate_final_score,
};

pub use fairway_flow::{
    CandidateCourse, ComparisonPrompt, ComparisonSelector, FlowConfig, FlowError, FlowPhase,
    NextStep, RankPrompt, RatingFlow, ScoredPlacement, SessionHandle,
};
