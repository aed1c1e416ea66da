//! A user's ranked list, derived from stored ratings.
//!
//! The list is never persisted. It is rebuilt from the current set of
//! [`CourseRating`] rows whenever it is needed, sorted by descending
//! `final_score` with ties broken by ascending course identifier.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::{CourseId, CourseRating};

/// A single row of a [`RankedList`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedEntry {
    /// Rated course.
    pub course_id: CourseId,
    /// Display name of the course.
    pub course_name: String,
    /// Display location of the course.
    pub course_location: String,
    /// Stored final score.
    pub final_score: f64,
}

impl From<&CourseRating> for RankedEntry {
    fn from(rating: &CourseRating) -> Self {
        Self {
            course_id: rating.course_id.clone(),
            course_name: rating.course_name.clone(),
            course_location: rating.course_location.clone(),
            final_score: rating.final_score,
        }
    }
}

/// Final scores of the courses immediately around an insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborScores {
    /// Score of the course that would sit directly above the new entry.
    pub above: Option<f64>,
    /// Score of the course that would sit directly below the new entry.
    pub below: Option<f64>,
}

impl NeighborScores {
    /// Neither neighbor exists.
    pub const NONE: Self = Self {
        above: None,
        below: None,
    };
}

/// Courses ordered from best to worst.
///
/// # Examples
/// ```
/// use fairway_core::{NeighborScores, RankedList};
/// use fairway_core::test_support::rating;
///
/// let list = RankedList::from_ratings(&[rating("a", 6.0), rating("b", 8.5)]);
/// assert_eq!(list.len(), 2);
/// assert_eq!(
///     list.neighbors_at(1),
///     NeighborScores { above: Some(8.5), below: Some(6.0) },
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RankedList {
    entries: Vec<RankedEntry>,
}

impl RankedList {
    /// Derive the ranked list from a user's ratings.
    ///
    /// Ratings with a non-finite score are left out. When the same course
    /// appears more than once only the first row is kept.
    pub fn from_ratings<'a, I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = &'a CourseRating>,
    {
        let mut seen = HashSet::new();
        let mut entries: Vec<RankedEntry> = ratings
            .into_iter()
            .filter(|rating| rating.final_score.is_finite())
            .filter(|rating| seen.insert(rating.course_id.clone()))
            .map(RankedEntry::from)
            .collect();
        entries.sort_by(compare_best_first);
        Self { entries }
    }

    /// Return a copy of the list without `course_id`.
    ///
    /// Used when a course is re-rated so its previous row does not influence
    /// its own placement.
    #[must_use]
    pub fn without(&self, course_id: &CourseId) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| entry.course_id != *course_id)
                .cloned()
                .collect(),
        }
    }

    /// Number of ranked courses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the entries, best first.
    #[must_use]
    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    /// Return the entry at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RankedEntry> {
        self.entries.get(index)
    }

    /// Return the zero-based position of a course, if ranked.
    #[must_use]
    pub fn position_of(&self, course_id: &CourseId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.course_id == *course_id)
    }

    /// Scores of the entries around insertion index `position`.
    ///
    /// `above` is the score at `position - 1` and `below` the score at
    /// `position`; either is absent past the ends of the list.
    #[must_use]
    pub fn neighbors_at(&self, position: usize) -> NeighborScores {
        let above = position
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
            .map(|entry| entry.final_score);
        let below = self.entries.get(position).map(|entry| entry.final_score);
        NeighborScores { above, below }
    }
}

fn compare_best_first(lhs: &RankedEntry, rhs: &RankedEntry) -> Ordering {
    rhs.final_score
        .total_cmp(&lhs.final_score)
        .then_with(|| lhs.course_id.cmp(&rhs.course_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::rating;
    use rstest::{fixture, rstest};

    #[fixture]
    fn list() -> RankedList {
        RankedList::from_ratings(&[
            rating("mid", 6.5),
            rating("top", 9.0),
            rating("low", 3.0),
        ])
    }

    #[rstest]
    fn sorts_by_descending_score(list: RankedList) {
        let ids: Vec<_> = list
            .entries()
            .iter()
            .map(|entry| entry.course_id.as_str())
            .collect();
        assert_eq!(ids, ["top", "mid", "low"]);
    }

    #[rstest]
    fn breaks_ties_by_course_id() {
        let list = RankedList::from_ratings(&[rating("b", 7.0), rating("a", 7.0)]);
        assert_eq!(list.position_of(&CourseId::new("a")), Some(0));
        assert_eq!(list.position_of(&CourseId::new("b")), Some(1));
    }

    #[rstest]
    #[case(0, None, Some(9.0))]
    #[case(1, Some(9.0), Some(6.5))]
    #[case(2, Some(6.5), Some(3.0))]
    #[case(3, Some(3.0), None)]
    #[case(7, None, None)]
    fn neighbors_follow_insertion_index(
        list: RankedList,
        #[case] position: usize,
        #[case] above: Option<f64>,
        #[case] below: Option<f64>,
    ) {
        assert_eq!(list.neighbors_at(position), NeighborScores { above, below });
    }

    #[rstest]
    fn empty_list_has_no_neighbors() {
        let list = RankedList::default();
        assert_eq!(list.neighbors_at(0), NeighborScores::NONE);
    }

    #[rstest]
    fn without_drops_the_course(list: RankedList) {
        let trimmed = list.without(&CourseId::new("mid"));
        assert_eq!(trimmed.len(), 2);
        assert_eq!(trimmed.position_of(&CourseId::new("mid")), None);
        assert_eq!(list.len(), 3);
    }

    #[rstest]
    fn skips_non_finite_scores_and_duplicates() {
        let list = RankedList::from_ratings(&[
            rating("a", 5.0),
            rating("a", 9.0),
            rating("b", f64::NAN),
        ]);
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(0).map(|entry| entry.final_score), Some(5.0));
    }
}
