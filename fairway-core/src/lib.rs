//! Core domain types for the Fairway course rating engine.
//!
//! A user's ranked list of golf courses is derived from one
//! [`CourseRating`] per course. This crate defines those records, derives the
//! [`RankedList`] and its neighbor lookups, and declares the storage
//! collaborators ([`RatingStore`], [`RoundLog`]) that flows read from and
//! commit to.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod course;
mod ranked;
mod rating;
pub mod store;
pub mod test_support;

pub use course::{CourseId, PlayAgainResponse, UnknownPlayAgainResponse, UserId};
pub use ranked::{NeighborScores, RankedEntry, RankedList};
pub use rating::{CourseRating, MAX_SCORE, MIN_SCORE, RatingError};
pub use store::{BackendError, RatingStore, RoundLog, RoundRecord, StoreError};

#[cfg(feature = "store-sqlite")]
pub use store::{SqliteRatingStore, SqliteRatingStoreError};
