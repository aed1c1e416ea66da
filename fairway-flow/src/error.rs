//! Errors surfaced by the rating flow.

use fairway_core::{CourseId, RatingError, StoreError};
use fairway_scorer::ScoreError;
use thiserror::Error;

use crate::{FlowPhase, SessionHandle};

/// Errors returned by [`RatingFlow`](crate::RatingFlow) operations.
///
/// Validation failures leave the session where it was; only
/// [`FlowError::Commit`] is raised after the session reached its final state.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The handle does not name the live session.
    #[error("no live rating session for handle {0}")]
    UnknownSession(SessionHandle),
    /// A session is already live and must be confirmed or cancelled first.
    #[error("rating session {0} is still in progress")]
    SessionInProgress(SessionHandle),
    /// The input does not belong to the session's current phase.
    #[error("{received} submitted while the session expects {expected}")]
    UnexpectedInput {
        /// Phase the session is in.
        expected: FlowPhase,
        /// Kind of input that was submitted.
        received: &'static str,
    },
    /// The chosen course is neither the candidate nor the course it is
    /// being compared against.
    #[error("course {chosen} is not part of the current comparison")]
    InvalidChoice {
        /// Course submitted by the caller.
        chosen: CourseId,
    },
    /// The synthesizer rejected the collected inputs.
    #[error("score inputs rejected: {0}")]
    Score(#[from] ScoreError),
    /// The assembled rating failed its own validation.
    #[error("assembled rating is invalid: {0}")]
    InvalidRecord(#[from] RatingError),
    /// Reading the rating snapshot failed when starting a session.
    #[error("failed to read existing ratings")]
    Snapshot(#[source] StoreError),
    /// The ranked list has more courses than a rating can record.
    #[error("ranked list of {courses} courses is too large to rate against")]
    ListTooLarge {
        /// Number of ranked courses in the snapshot.
        courses: usize,
    },
    /// The rating store rejected the commit; the session stays in
    /// confirmation so the commit can be retried.
    #[error("failed to commit rating for course {course_id}")]
    Commit {
        /// Course whose rating was being written.
        course_id: CourseId,
        /// Store failure.
        #[source]
        source: StoreError,
    },
}
