//! Per-phase session records and the pure transitions between them.
//!
//! Each phase owns exactly the data collected so far. A transition borrows
//! the current record and returns the next one together with whatever the
//! caller should see, so a rejected input leaves the current record intact.

use std::sync::Arc;

use fairway_core::{CourseId, CourseRating, PlayAgainResponse, RankedEntry, RankedList, UserId};
use fairway_scorer::{ComparisonTally, ScoreInputs, ScoreSynthesizer};

use crate::{
    CandidateCourse, ComparisonPrompt, FlowError, FlowPhase, NextStep, RankPrompt,
    ScoredPlacement,
};

/// Facts fixed when the session starts.
#[derive(Debug)]
pub(crate) struct SessionContext {
    pub(crate) user_id: UserId,
    pub(crate) candidate: CandidateCourse,
    /// Ranked list without the candidate.
    pub(crate) snapshot: RankedList,
    /// Length of `snapshot`, the list size recorded on the rating.
    pub(crate) total_courses: u32,
    /// Comparison opponents in prompt order.
    pub(crate) targets: Vec<RankedEntry>,
    pub(crate) play_count: u32,
}

impl SessionContext {
    fn comparison_prompt(&self, index: usize) -> Option<NextStep> {
        self.targets.get(index).map(|opponent| {
            NextStep::Compare(ComparisonPrompt {
                index,
                of: self.targets.len(),
                candidate: self.candidate.clone(),
                opponent: opponent.clone(),
            })
        })
    }

    fn rank_prompt(&self) -> NextStep {
        NextStep::Rank(RankPrompt {
            candidate: self.candidate.clone(),
            ranked: self.snapshot.entries().to_vec(),
        })
    }
}

/// Convert a ranked list length into the `u32` stored on a rating.
///
/// # Errors
/// Returns [`FlowError::ListTooLarge`] when the length does not fit.
pub(crate) fn course_count(len: usize) -> Result<u32, FlowError> {
    u32::try_from(len).map_err(|_| FlowError::ListTooLarge { courses: len })
}

/// Next record plus the caller-visible output of a transition.
#[derive(Debug)]
pub(crate) struct Transition<O> {
    pub(crate) next: FlowState,
    pub(crate) output: O,
}

/// A live session, tagged by phase.
#[derive(Debug)]
pub(crate) enum FlowState {
    PlayAgain(PlayAgainStage),
    Comparison(ComparisonStage),
    DragRank(DragRankStage),
    Confirmation(ConfirmationStage),
}

impl FlowState {
    pub(crate) fn start(context: SessionContext) -> Self {
        Self::PlayAgain(PlayAgainStage {
            context: Arc::new(context),
        })
    }

    pub(crate) fn phase(&self) -> FlowPhase {
        match self {
            Self::PlayAgain(_) => FlowPhase::PlayAgain,
            Self::Comparison(stage) => FlowPhase::Comparison {
                index: stage.compared.len(),
                of: stage.context.targets.len(),
            },
            Self::DragRank(_) => FlowPhase::DragRank,
            Self::Confirmation(_) => FlowPhase::Confirmation,
        }
    }
}

#[derive(Debug)]
pub(crate) struct PlayAgainStage {
    context: Arc<SessionContext>,
}

impl PlayAgainStage {
    /// Record the reaction; skip straight to ranking when nothing can be
    /// compared.
    pub(crate) fn answer(&self, play_again: PlayAgainResponse) -> Transition<NextStep> {
        let context = Arc::clone(&self.context);
        match context.comparison_prompt(0) {
            Some(prompt) => Transition {
                next: FlowState::Comparison(ComparisonStage {
                    context,
                    play_again,
                    tally: ComparisonTally::default(),
                    compared: Vec::new(),
                }),
                output: prompt,
            },
            None => Transition {
                output: context.rank_prompt(),
                next: FlowState::DragRank(DragRankStage {
                    context,
                    play_again,
                    tally: ComparisonTally::default(),
                    compared: Vec::new(),
                }),
            },
        }
    }
}

#[derive(Debug)]
pub(crate) struct ComparisonStage {
    context: Arc<SessionContext>,
    play_again: PlayAgainResponse,
    tally: ComparisonTally,
    compared: Vec<CourseId>,
}

impl ComparisonStage {
    /// Record which course the user preferred in the current comparison.
    pub(crate) fn choose(&self, chosen: &CourseId) -> Result<Transition<NextStep>, FlowError> {
        let invalid = || FlowError::InvalidChoice {
            chosen: chosen.clone(),
        };
        let opponent = self.context.targets.get(self.compared.len()).ok_or_else(invalid)?;
        let tally = if *chosen == self.context.candidate.course_id {
            self.tally.with_win()
        } else if *chosen == opponent.course_id {
            self.tally.with_loss()
        } else {
            return Err(invalid());
        };

        let mut compared = self.compared.clone();
        compared.push(opponent.course_id.clone());
        let context = Arc::clone(&self.context);

        Ok(match context.comparison_prompt(compared.len()) {
            Some(prompt) => Transition {
                next: FlowState::Comparison(Self {
                    context,
                    play_again: self.play_again,
                    tally,
                    compared,
                }),
                output: prompt,
            },
            None => Transition {
                output: context.rank_prompt(),
                next: FlowState::DragRank(DragRankStage {
                    context,
                    play_again: self.play_again,
                    tally,
                    compared,
                }),
            },
        })
    }
}

#[derive(Debug)]
pub(crate) struct DragRankStage {
    context: Arc<SessionContext>,
    play_again: PlayAgainResponse,
    tally: ComparisonTally,
    compared: Vec<CourseId>,
}

impl DragRankStage {
    /// Score the candidate at `rank_position` and assemble its rating.
    pub(crate) fn place(
        &self,
        rank_position: u32,
        synthesizer: &ScoreSynthesizer,
    ) -> Result<Transition<ScoredPlacement>, FlowError> {
        let context = &self.context;
        let total_courses = context.total_courses;
        let neighbors = usize::try_from(rank_position)
            .map(|position| context.snapshot.neighbors_at(position))
            .unwrap_or_default();
        let breakdown = synthesizer.breakdown(&ScoreInputs {
            play_again: self.play_again,
            tally: self.tally,
            rank_position,
            total_courses,
            neighbors,
        })?;

        let rating = CourseRating {
            user_id: context.user_id.clone(),
            course_id: context.candidate.course_id.clone(),
            course_name: context.candidate.course_name.clone(),
            course_location: context.candidate.course_location.clone(),
            play_again: self.play_again,
            comparison_wins: self.tally.wins,
            comparison_losses: self.tally.losses,
            compared_course_ids: self.compared.clone(),
            rank_position,
            total_courses,
            final_score: breakdown.final_score,
            play_count: context.play_count,
        };
        rating.validate()?;

        Ok(Transition {
            next: FlowState::Confirmation(ConfirmationStage { rating }),
            output: ScoredPlacement {
                final_score: breakdown.final_score,
                rank_position,
                total_courses,
                breakdown,
            },
        })
    }
}

/// Fully assembled rating awaiting its single commit.
#[derive(Debug)]
pub(crate) struct ConfirmationStage {
    rating: CourseRating,
}

impl ConfirmationStage {
    pub(crate) const fn rating(&self) -> &CourseRating {
        &self.rating
    }
}
