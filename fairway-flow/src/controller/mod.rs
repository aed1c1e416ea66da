//! `RatingFlow`: the session controller driving a rating from the first
//! question to the single commit.
//!
//! At most one session is live per flow. Its records live in memory until
//! [`RatingFlow::confirm`] writes the finished [`CourseRating`] to the store;
//! [`RatingFlow::cancel`] drops them without touching the store.

use fairway_core::{
    CourseId, CourseRating, PlayAgainResponse, RankedList, RatingStore, RoundLog, UserId,
};
use fairway_scorer::{ScorePolicy, ScoreSynthesizer};
use rand::Rng;

use crate::selector::DEFAULT_COMPARISON_COUNT;
use crate::state::{FlowState, SessionContext, Transition, course_count};
use crate::{
    CandidateCourse, ComparisonSelector, FlowError, FlowPhase, NextStep, ScoredPlacement,
    SessionHandle,
};

/// Configuration for [`RatingFlow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowConfig {
    /// Maximum number of comparisons per session.
    pub comparison_count: usize,
    /// Scoring policy applied when the candidate is placed.
    pub policy: ScorePolicy,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            comparison_count: DEFAULT_COMPARISON_COUNT,
            policy: ScorePolicy::default(),
        }
    }
}

#[derive(Debug)]
struct LiveSession {
    handle: SessionHandle,
    state: FlowState,
}

/// Drives rating sessions for one user.
///
/// The flow is generic over its collaborators: the rating store it reads a
/// snapshot from and commits to, the round log consulted for play counts,
/// and the random source used to fill comparison slots.
///
/// # Examples
/// ```
/// use fairway_core::test_support::{MemoryRatingStore, MemoryRoundLog, rating};
/// use fairway_core::{PlayAgainResponse, RatingStore, UserId};
/// use fairway_flow::{CandidateCourse, NextStep, RatingFlow};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryRatingStore::with_ratings([rating("old", 7.0)]);
/// let mut flow = RatingFlow::new(
///     UserId::new("golfer"),
///     store,
///     MemoryRoundLog::default(),
///     StdRng::seed_from_u64(1),
/// );
///
/// let handle = flow.start_flow(CandidateCourse::new("new", "New Links", "Coast"))?;
/// let NextStep::Compare(prompt) = flow.submit_play_again(handle, PlayAgainResponse::Definitely)?
/// else {
///     unreachable!("one rated course means one comparison");
/// };
/// flow.submit_comparison_choice(handle, &prompt.candidate.course_id)?;
/// let placement = flow.submit_rank_position(handle, 0)?;
/// let committed = flow.confirm(handle)?;
///
/// assert_eq!(committed.final_score, placement.final_score);
/// assert_eq!(flow.store().get_all_ratings(&UserId::new("golfer"))?.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RatingFlow<S, L, R>
where
    S: RatingStore,
    L: RoundLog,
    R: Rng,
{
    user_id: UserId,
    store: S,
    rounds: L,
    rng: R,
    selector: ComparisonSelector,
    synthesizer: ScoreSynthesizer,
    session: Option<LiveSession>,
    issued: u64,
}

impl<S, L, R> RatingFlow<S, L, R>
where
    S: RatingStore,
    L: RoundLog,
    R: Rng,
{
    /// Construct a flow for `user_id` using default configuration.
    pub fn new(user_id: UserId, store: S, rounds: L, rng: R) -> Self {
        Self::with_config(user_id, store, rounds, rng, FlowConfig::default())
    }

    /// Construct a flow with explicit configuration.
    pub const fn with_config(
        user_id: UserId,
        store: S,
        rounds: L,
        rng: R,
        config: FlowConfig,
    ) -> Self {
        Self {
            user_id,
            store,
            rounds,
            rng,
            selector: ComparisonSelector::new(config.comparison_count),
            synthesizer: ScoreSynthesizer::new(config.policy),
            session: None,
            issued: 0,
        }
    }

    /// User whose ratings this flow manages.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Borrow the rating store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Borrow the round log.
    #[must_use]
    pub const fn rounds(&self) -> &L {
        &self.rounds
    }

    /// Handle of the live session, if any.
    #[must_use]
    pub fn active_session(&self) -> Option<SessionHandle> {
        self.session.as_ref().map(|live| live.handle)
    }

    /// Phase the live session is waiting in.
    ///
    /// # Errors
    /// Returns [`FlowError::UnknownSession`] when `handle` is not live.
    pub fn phase(&self, handle: SessionHandle) -> Result<FlowPhase, FlowError> {
        self.state(handle).map(FlowState::phase)
    }

    /// Open a session for `candidate`.
    ///
    /// Reads the user's ratings once; the ranked list, comparison targets and
    /// neighbors used for the rest of the session all come from this
    /// snapshot. An existing rating of the candidate is left out of it so a
    /// re-rating replaces the old row instead of competing with it.
    ///
    /// # Errors
    /// Returns [`FlowError::SessionInProgress`] when a session is already
    /// live, [`FlowError::Snapshot`] when the store cannot be read and
    /// [`FlowError::ListTooLarge`] when the ranked list cannot be counted
    /// in a `u32`.
    pub fn start_flow(&mut self, candidate: CandidateCourse) -> Result<SessionHandle, FlowError> {
        if let Some(live) = &self.session {
            return Err(FlowError::SessionInProgress(live.handle));
        }

        let existing: Vec<CourseRating> = self
            .store
            .get_all_ratings(&self.user_id)
            .map_err(FlowError::Snapshot)?
            .into_iter()
            .filter(|rating| rating.course_id != candidate.course_id)
            .collect();
        let snapshot = RankedList::from_ratings(&existing);
        let total_courses = course_count(snapshot.len()).inspect_err(log_rejection)?;
        let targets = self
            .selector
            .select(&existing, &candidate.course_id, &mut self.rng)
            .iter()
            .filter_map(|course_id| {
                snapshot
                    .position_of(course_id)
                    .and_then(|position| snapshot.get(position))
                    .cloned()
            })
            .collect();
        let play_count = self.play_count(&candidate.course_id);

        self.issued = self.issued.wrapping_add(1);
        let handle = SessionHandle::new(self.issued);
        log::debug!(
            "session {handle} started for {} against {} ranked course(s)",
            candidate.course_id,
            snapshot.len()
        );
        self.session = Some(LiveSession {
            handle,
            state: FlowState::start(SessionContext {
                user_id: self.user_id.clone(),
                candidate,
                snapshot,
                total_courses,
                targets,
                play_count,
            }),
        });
        Ok(handle)
    }

    /// Record the play-again reaction.
    ///
    /// # Errors
    /// Returns [`FlowError::UnknownSession`] for a stale handle and
    /// [`FlowError::UnexpectedInput`] outside the play-again phase.
    pub fn submit_play_again(
        &mut self,
        handle: SessionHandle,
        response: PlayAgainResponse,
    ) -> Result<NextStep, FlowError> {
        let transition = match self.state(handle)? {
            FlowState::PlayAgain(stage) => stage.answer(response),
            other => return Err(unexpected(other, "play-again response")),
        };
        Ok(self.advance(handle, transition))
    }

    /// Record which course won the current comparison.
    ///
    /// Choosing the candidate counts as a win, choosing the opponent as a
    /// loss.
    ///
    /// # Errors
    /// Returns [`FlowError::InvalidChoice`] when `chosen` is neither course
    /// in the comparison, and [`FlowError::UnexpectedInput`] outside the
    /// comparison phase.
    pub fn submit_comparison_choice(
        &mut self,
        handle: SessionHandle,
        chosen: &CourseId,
    ) -> Result<NextStep, FlowError> {
        let transition = match self.state(handle)? {
            FlowState::Comparison(stage) => stage.choose(chosen).inspect_err(log_rejection)?,
            other => return Err(unexpected(other, "comparison choice")),
        };
        Ok(self.advance(handle, transition))
    }

    /// Place the candidate at `rank_position` and compute its score.
    ///
    /// # Errors
    /// Returns [`FlowError::Score`] when the position lies past the end of
    /// the ranked list, and [`FlowError::UnexpectedInput`] outside the
    /// ranking phase.
    pub fn submit_rank_position(
        &mut self,
        handle: SessionHandle,
        rank_position: u32,
    ) -> Result<ScoredPlacement, FlowError> {
        let transition = match self.state(handle)? {
            FlowState::DragRank(stage) => stage
                .place(rank_position, &self.synthesizer)
                .inspect_err(log_rejection)?,
            other => return Err(unexpected(other, "rank position")),
        };
        Ok(self.advance(handle, transition))
    }

    /// Commit the assembled rating and end the session.
    ///
    /// # Errors
    /// Returns [`FlowError::Commit`] when the store rejects the write. The
    /// session then stays in confirmation so the commit can be retried.
    pub fn confirm(&mut self, handle: SessionHandle) -> Result<CourseRating, FlowError> {
        let rating = match self.state(handle)? {
            FlowState::Confirmation(stage) => stage.rating().clone(),
            other => return Err(unexpected(other, "confirmation")),
        };
        if let Err(source) = self.store.upsert(&rating) {
            log::warn!(
                "session {handle} failed to commit {}: {source}",
                rating.course_id
            );
            return Err(FlowError::Commit {
                course_id: rating.course_id,
                source,
            });
        }
        self.session = None;
        log::info!(
            "rated {} at {} (position {} of {})",
            rating.course_id,
            rating.final_score,
            rating.rank_position,
            rating.total_courses
        );
        Ok(rating)
    }

    /// Discard the session without writing anything.
    ///
    /// Unknown or stale handles are ignored.
    pub fn cancel(&mut self, handle: SessionHandle) {
        if self.active_session() == Some(handle) {
            self.session = None;
            log::debug!("session {handle} cancelled");
        }
    }

    fn state(&self, handle: SessionHandle) -> Result<&FlowState, FlowError> {
        self.session
            .as_ref()
            .filter(|live| live.handle == handle)
            .map(|live| &live.state)
            .ok_or(FlowError::UnknownSession(handle))
    }

    fn advance<O>(&mut self, handle: SessionHandle, transition: Transition<O>) -> O {
        let Transition { next, output } = transition;
        if let Some(live) = self.session.as_mut().filter(|live| live.handle == handle) {
            log::debug!("session {handle} now awaiting {}", next.phase());
            live.state = next;
        }
        output
    }

    fn play_count(&self, course_id: &CourseId) -> u32 {
        self.rounds
            .count_plays(&self.user_id, course_id)
            .unwrap_or_else(|err| {
                log::warn!("play count for {course_id} unavailable: {err}");
                0
            })
    }
}

fn unexpected(state: &FlowState, received: &'static str) -> FlowError {
    let err = FlowError::UnexpectedInput {
        expected: state.phase(),
        received,
    };
    log_rejection(&err);
    err
}

fn log_rejection(err: &FlowError) {
    log::warn!("rejected input: {err}");
}
