//! Rating flow for Fairway: comparison selection and the session state
//! machine that turns a user's answers into a committed
//! [`CourseRating`](fairway_core::CourseRating).
//!
//! A session runs through four phases in a fixed order: the play-again
//! reaction, up to [`FlowConfig::comparison_count`] head-to-head comparisons
//! chosen by [`ComparisonSelector`], an insertion position in the ranked
//! list, and a confirmation. Scoring is delegated to
//! [`fairway_scorer::ScoreSynthesizer`]. Nothing reaches the
//! [`RatingStore`](fairway_core::RatingStore) until the confirmation, and a
//! cancelled session writes nothing at all.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod controller;
mod error;
mod selector;
mod state;
mod types;

pub use controller::{FlowConfig, RatingFlow};
pub use error::FlowError;
pub use selector::{ComparisonSelector, DEFAULT_COMPARISON_COUNT};
pub use types::{
    CandidateCourse, ComparisonPrompt, FlowPhase, NextStep, RankPrompt, ScoredPlacement,
    SessionHandle,
};
