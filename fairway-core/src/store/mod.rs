//! Collaborator traits for persisted ratings and logged rounds.
//!
//! The `RatingStore` trait holds one [`CourseRating`] per (user, course) and
//! can list every rating for a user. The `RoundLog` trait is an append-only
//! record of played rounds used to count plays per course.

use thiserror::Error;

use crate::{CourseId, CourseRating, UserId};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteRatingStore, SqliteRatingStoreError};

/// Boxed error raised by a storage backend.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by [`RatingStore`] and [`RoundLog`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed while performing `operation`.
    #[error("rating store failed to {operation}: {source}")]
    Backend {
        /// Description of the failed operation.
        operation: &'static str,
        /// Underlying backend error.
        #[source]
        source: BackendError,
    },
    /// A stored row could not be turned back into a record.
    #[error("stored rating for course {course_id} is corrupt: {reason}")]
    CorruptRecord {
        /// Course whose row failed to decode.
        course_id: CourseId,
        /// Description of the problem.
        reason: String,
    },
    /// The backend is temporarily unable to accept writes.
    #[error("rating store is unavailable: {reason}")]
    Unavailable {
        /// Description supplied by the backend.
        reason: String,
    },
}

impl StoreError {
    /// Wrap a backend error raised during `operation`.
    pub fn backend<E>(operation: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            operation,
            source: Box::new(source),
        }
    }
}

/// Durable storage of course ratings.
///
/// # Examples
///
/// ```rust
/// use fairway_core::{CourseRating, RatingStore, StoreError, UserId};
///
/// #[derive(Default)]
/// struct VecStore {
///     rows: Vec<CourseRating>,
/// }
///
/// impl RatingStore for VecStore {
///     fn get_all_ratings(&self, user_id: &UserId) -> Result<Vec<CourseRating>, StoreError> {
///         Ok(self.rows.iter().filter(|r| r.user_id == *user_id).cloned().collect())
///     }
///
///     fn upsert(&mut self, rating: &CourseRating) -> Result<(), StoreError> {
///         self.rows.retain(|r| !(r.user_id == rating.user_id && r.course_id == rating.course_id));
///         self.rows.push(rating.clone());
///         Ok(())
///     }
/// }
///
/// let store = VecStore::default();
/// assert!(store.get_all_ratings(&UserId::new("ada")).unwrap().is_empty());
/// ```
pub trait RatingStore {
    /// Return every rating owned by `user_id`, in no particular order.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend cannot be read.
    fn get_all_ratings(&self, user_id: &UserId) -> Result<Vec<CourseRating>, StoreError>;

    /// Insert the rating, replacing any earlier rating of the same course by
    /// the same user.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the write fails. Implementations must not
    /// leave a partial row behind.
    fn upsert(&mut self, rating: &CourseRating) -> Result<(), StoreError>;
}

/// One logged round on a course.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundRecord {
    /// Player.
    pub user_id: UserId,
    /// Course played.
    pub course_id: CourseId,
    /// Free-form date label, e.g. `2024-06-01`.
    pub played_on: String,
}

/// Append-only log of played rounds.
pub trait RoundLog {
    /// Append a round.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the write fails.
    fn append(&mut self, round: &RoundRecord) -> Result<(), StoreError>;

    /// Count the rounds `user_id` has logged on `course_id`.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend cannot be read.
    fn count_plays(&self, user_id: &UserId, course_id: &CourseId) -> Result<u32, StoreError>;
}

impl<T: RatingStore + ?Sized> RatingStore for &mut T {
    fn get_all_ratings(&self, user_id: &UserId) -> Result<Vec<CourseRating>, StoreError> {
        (**self).get_all_ratings(user_id)
    }

    fn upsert(&mut self, rating: &CourseRating) -> Result<(), StoreError> {
        (**self).upsert(rating)
    }
}
