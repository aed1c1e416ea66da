//! In-memory collaborators and record builders used by unit and behaviour
//! tests.

use std::collections::BTreeMap;

use crate::{
    CourseId, CourseRating, PlayAgainResponse, RatingStore, RoundLog, RoundRecord, StoreError,
    UserId,
};

/// User assigned to records built by [`rating`].
pub const DEFAULT_USER: &str = "golfer";

/// In-memory `RatingStore` keyed by (user, course).
#[derive(Default, Debug, Clone)]
pub struct MemoryRatingStore {
    rows: BTreeMap<(UserId, CourseId), CourseRating>,
    writes: usize,
}

impl MemoryRatingStore {
    /// Create a store pre-populated with `ratings`.
    pub fn with_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = CourseRating>,
    {
        Self {
            rows: ratings
                .into_iter()
                .map(|rating| ((rating.user_id.clone(), rating.course_id.clone()), rating))
                .collect(),
            writes: 0,
        }
    }

    /// Number of stored ratings across all users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Report whether the store holds no ratings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of successful `upsert` calls.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl RatingStore for MemoryRatingStore {
    fn get_all_ratings(&self, user_id: &UserId) -> Result<Vec<CourseRating>, StoreError> {
        Ok(self
            .rows
            .values()
            .filter(|rating| rating.user_id == *user_id)
            .cloned()
            .collect())
    }

    fn upsert(&mut self, rating: &CourseRating) -> Result<(), StoreError> {
        self.rows.insert(
            (rating.user_id.clone(), rating.course_id.clone()),
            rating.clone(),
        );
        self.writes += 1;
        Ok(())
    }
}

/// In-memory `RoundLog`.
#[derive(Default, Debug, Clone)]
pub struct MemoryRoundLog {
    rounds: Vec<RoundRecord>,
}

impl MemoryRoundLog {
    /// Log `count` rounds of `course_id` for `user_id`.
    #[must_use]
    pub fn with_plays(user_id: &str, course_id: &str, count: usize) -> Self {
        let round = RoundRecord {
            user_id: UserId::new(user_id),
            course_id: CourseId::new(course_id),
            played_on: "2024-01-01".to_owned(),
        };
        Self {
            rounds: vec![round; count],
        }
    }
}

impl RoundLog for MemoryRoundLog {
    fn append(&mut self, round: &RoundRecord) -> Result<(), StoreError> {
        self.rounds.push(round.clone());
        Ok(())
    }

    fn count_plays(&self, user_id: &UserId, course_id: &CourseId) -> Result<u32, StoreError> {
        let count = self
            .rounds
            .iter()
            .filter(|round| round.user_id == *user_id && round.course_id == *course_id)
            .count();
        u32::try_from(count).map_err(|source| StoreError::backend("count rounds", source))
    }
}

/// `RatingStore` whose first `failures` writes report the store as
/// unavailable.
#[cfg(any(test, feature = "test-support"))]
#[derive(Default, Debug, Clone)]
pub struct FlakyRatingStore {
    inner: MemoryRatingStore,
    failures: usize,
}

#[cfg(any(test, feature = "test-support"))]
impl FlakyRatingStore {
    /// Wrap `inner`, failing the next `failures` writes.
    #[must_use]
    pub const fn new(inner: MemoryRatingStore, failures: usize) -> Self {
        Self { inner, failures }
    }

    /// Borrow the wrapped store.
    #[must_use]
    pub const fn inner(&self) -> &MemoryRatingStore {
        &self.inner
    }
}

#[cfg(any(test, feature = "test-support"))]
impl RatingStore for FlakyRatingStore {
    fn get_all_ratings(&self, user_id: &UserId) -> Result<Vec<CourseRating>, StoreError> {
        self.inner.get_all_ratings(user_id)
    }

    fn upsert(&mut self, rating: &CourseRating) -> Result<(), StoreError> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(StoreError::Unavailable {
                reason: "simulated outage".to_owned(),
            });
        }
        self.inner.upsert(rating)
    }
}

/// Build a rating of `course_id` scored `final_score` for [`DEFAULT_USER`].
#[must_use]
pub fn rating(course_id: &str, final_score: f64) -> CourseRating {
    rating_for(DEFAULT_USER, course_id, final_score)
}

/// Build a minimal valid rating for `user_id`.
#[must_use]
pub fn rating_for(user_id: &str, course_id: &str, final_score: f64) -> CourseRating {
    CourseRating {
        user_id: UserId::new(user_id),
        course_id: CourseId::new(course_id),
        course_name: format!("Course {course_id}"),
        course_location: "Somewhere".to_owned(),
        play_again: PlayAgainResponse::Maybe,
        comparison_wins: 0,
        comparison_losses: 0,
        compared_course_ids: Vec::new(),
        rank_position: 0,
        total_courses: 0,
        final_score,
        play_count: 0,
    }
}
