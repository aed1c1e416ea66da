//! Choose which rated courses a candidate is compared against.

use std::cmp::Ordering;
use std::collections::HashSet;

use fairway_core::{CourseId, CourseRating};
use rand::Rng;

/// Default number of comparisons offered per session.
pub const DEFAULT_COMPARISON_COUNT: usize = 3;

/// Picks up to `count` comparison targets from a user's existing ratings.
///
/// Targets are chosen in a fixed order: the median-scored course, the
/// highest-scored remaining course, the lowest-scored remaining course, then
/// uniformly random picks from whatever is left. Only the random picks
/// consume the injected RNG, so a seeded generator makes selection
/// reproducible.
///
/// # Examples
/// ```
/// use fairway_core::CourseId;
/// use fairway_core::test_support::rating;
/// use fairway_flow::ComparisonSelector;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let existing = [rating("a", 3.0), rating("b", 6.0), rating("c", 9.0)];
/// let mut rng = StdRng::seed_from_u64(7);
/// let picked = ComparisonSelector::new(2).select(&existing, &CourseId::new("new"), &mut rng);
/// assert_eq!(picked, [CourseId::new("b"), CourseId::new("c")]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonSelector {
    count: usize,
}

impl Default for ComparisonSelector {
    fn default() -> Self {
        Self::new(DEFAULT_COMPARISON_COUNT)
    }
}

impl ComparisonSelector {
    /// Build a selector returning at most `count` targets.
    #[must_use]
    pub const fn new(count: usize) -> Self {
        Self { count }
    }

    /// Maximum number of targets returned.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Select comparison targets for `candidate`.
    ///
    /// The result never contains `candidate`, never repeats a course and is
    /// never longer than `count`. Rows with a non-finite score are ignored
    /// and repeated rows for one course keep the first.
    pub fn select<R: Rng>(
        &self,
        existing: &[CourseRating],
        candidate: &CourseId,
        rng: &mut R,
    ) -> Vec<CourseId> {
        let mut pool = ascending_pool(existing, candidate);
        let mut chosen = Vec::with_capacity(self.count.min(pool.len()));

        if self.count > 0 && !pool.is_empty() {
            let median = median_index(pool.len());
            chosen.push(pool.remove(median));
        }
        if chosen.len() < self.count
            && let Some(top) = pool.pop()
        {
            chosen.push(top);
        }
        if chosen.len() < self.count && !pool.is_empty() {
            chosen.push(pool.remove(0));
        }
        while chosen.len() < self.count && !pool.is_empty() {
            let index = rng.gen_range(0..pool.len());
            chosen.push(pool.remove(index));
        }

        log::debug!(
            "selected {} comparison target(s) for {candidate}",
            chosen.len()
        );
        chosen.into_iter().map(|rating| rating.course_id.clone()).collect()
    }
}

/// Eligible ratings, lowest score first.
///
/// Equal scores order by descending course identifier so the last element is
/// the course a ranked list would place first.
fn ascending_pool<'a>(existing: &'a [CourseRating], candidate: &CourseId) -> Vec<&'a CourseRating> {
    let mut seen = HashSet::new();
    let mut pool: Vec<&CourseRating> = existing
        .iter()
        .filter(|rating| rating.course_id != *candidate && rating.final_score.is_finite())
        .filter(|rating| seen.insert(&rating.course_id))
        .collect();
    pool.sort_by(|lhs, rhs| compare_worst_first(lhs, rhs));
    pool
}

fn compare_worst_first(lhs: &CourseRating, rhs: &CourseRating) -> Ordering {
    lhs.final_score
        .total_cmp(&rhs.final_score)
        .then_with(|| rhs.course_id.cmp(&lhs.course_id))
}

#[expect(
    clippy::integer_division,
    reason = "the tier match takes the lower middle of an even-sized pool"
)]
const fn median_index(len: usize) -> usize {
    len / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairway_core::test_support::rating;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    #[fixture]
    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn ids(values: &[&str]) -> Vec<CourseId> {
        values.iter().copied().map(CourseId::new).collect()
    }

    #[fixture]
    fn five() -> Vec<CourseRating> {
        vec![
            rating("e", 9.5),
            rating("a", 2.0),
            rating("c", 6.0),
            rating("b", 4.0),
            rating("d", 8.0),
        ]
    }

    #[rstest]
    fn picks_median_then_top_then_low(five: Vec<CourseRating>, mut rng: ChaCha8Rng) {
        let picked = ComparisonSelector::new(3).select(&five, &CourseId::new("new"), &mut rng);
        assert_eq!(picked, ids(&["c", "e", "a"]));
    }

    #[rstest]
    fn fills_remaining_slots_from_the_pool(five: Vec<CourseRating>, mut rng: ChaCha8Rng) {
        let picked = ComparisonSelector::new(5).select(&five, &CourseId::new("new"), &mut rng);
        assert_eq!(picked.len(), 5);
        assert_eq!(picked.get(..3), Some(ids(&["c", "e", "a"]).as_slice()));
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 5);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(3, 3)]
    #[case(10, 5)]
    fn never_exceeds_requested_or_available(
        five: Vec<CourseRating>,
        mut rng: ChaCha8Rng,
        #[case] count: usize,
        #[case] expected: usize,
    ) {
        let picked = ComparisonSelector::new(count).select(&five, &CourseId::new("new"), &mut rng);
        assert_eq!(picked.len(), expected);
    }

    #[rstest]
    fn empty_input_yields_no_targets(mut rng: ChaCha8Rng) {
        let picked = ComparisonSelector::default().select(&[], &CourseId::new("new"), &mut rng);
        assert!(picked.is_empty());
    }

    #[rstest]
    fn excludes_the_candidate(five: Vec<CourseRating>, mut rng: ChaCha8Rng) {
        let picked = ComparisonSelector::new(5).select(&five, &CourseId::new("c"), &mut rng);
        assert_eq!(picked.len(), 4);
        assert!(!picked.contains(&CourseId::new("c")));
    }

    #[rstest]
    fn duplicate_rows_keep_the_first(mut rng: ChaCha8Rng) {
        let existing = [rating("a", 9.0), rating("a", 1.0), rating("b", 5.0)];
        let picked = ComparisonSelector::new(3).select(&existing, &CourseId::new("new"), &mut rng);
        assert_eq!(picked, ids(&["a", "b"]));
    }

    #[rstest]
    fn ignores_non_finite_scores(mut rng: ChaCha8Rng) {
        let existing = [rating("a", f64::NAN), rating("b", 5.0)];
        let picked = ComparisonSelector::new(3).select(&existing, &CourseId::new("new"), &mut rng);
        assert_eq!(picked, ids(&["b"]));
    }

    #[rstest]
    fn tied_scores_prefer_the_ranked_order(mut rng: ChaCha8Rng) {
        let existing = [rating("z", 5.0), rating("y", 5.0), rating("x", 5.0)];
        let picked = ComparisonSelector::new(3).select(&existing, &CourseId::new("new"), &mut rng);
        assert_eq!(picked, ids(&["y", "x", "z"]));
    }

    #[rstest]
    fn same_seed_reproduces_selection(five: Vec<CourseRating>) {
        let selector = ComparisonSelector::new(5);
        let candidate = CourseId::new("new");
        let first = selector.select(&five, &candidate, &mut ChaCha8Rng::seed_from_u64(9));
        let second = selector.select(&five, &candidate, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(first, second);
    }
}
