//! `rate` command: drive a complete rating session from a scripted answer
//! file and commit the result to the SQLite store.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use fairway_core::{CourseId, CourseRating, PlayAgainResponse, RatingStore, RoundLog};
use fairway_flow::{
    CandidateCourse, DEFAULT_COMPARISON_COUNT, FlowConfig, NextStep, RatingFlow, SessionHandle,
};
use fairway_scorer::ScoreBreakdown;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::fs::{file_is_file, open_utf8_file};
use crate::store::StoreTarget;
use crate::{
    ARG_ANSWERS, ARG_COMPARISONS, ARG_DATABASE, ARG_SEED, ARG_USER, CliError, ENV_RATE_ANSWERS,
    ENV_RATE_USER,
};

/// CLI arguments for the `rate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "rate",
    long_about = "Rate a course by replaying a JSON answer script through the \
                 rating flow: the play-again response, one verdict per \
                 comparison the flow asks for, and the insertion position. \
                 The committed rating is printed as JSON.",
    about = "Rate a course from a scripted answer file"
)]
#[ortho_config(prefix = "FAIRWAY")]
pub(crate) struct RateArgs {
    /// Path to a JSON answer script.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) answers: Option<Utf8PathBuf>,
    /// SQLite database holding ratings and rounds.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// User whose ranked list is updated.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// Seed for the random comparison filler; random when omitted.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Maximum number of comparisons to ask.
    #[arg(long = ARG_COMPARISONS, value_name = "count")]
    #[serde(default)]
    pub(crate) comparisons: Option<usize>,
}

impl RateArgs {
    pub(crate) fn into_config(self) -> Result<RateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RateConfig::try_from(merged)
    }
}

/// Resolved `rate` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RateConfig {
    pub(crate) answers: Utf8PathBuf,
    pub(crate) target: StoreTarget,
    pub(crate) seed: Option<u64>,
    pub(crate) comparisons: usize,
}

impl RateConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        let path = &self.answers;
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field: ARG_ANSWERS,
                path: path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field: ARG_ANSWERS,
                    path: path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_ANSWERS,
                path: path.clone(),
                source,
            }),
        }
    }

    pub(crate) const fn flow_config(&self) -> FlowConfig {
        FlowConfig {
            comparison_count: self.comparisons,
            policy: fairway_scorer::ScorePolicy::V1,
        }
    }
}

impl TryFrom<RateArgs> for RateConfig {
    type Error = CliError;

    fn try_from(args: RateArgs) -> Result<Self, Self::Error> {
        let answers = args.answers.ok_or(CliError::MissingArgument {
            field: ARG_ANSWERS,
            env: ENV_RATE_ANSWERS,
        })?;
        let target = StoreTarget::resolve(args.database, args.user, ENV_RATE_USER)?;
        Ok(Self {
            answers,
            target,
            seed: args.seed,
            comparisons: args.comparisons.unwrap_or(DEFAULT_COMPARISON_COUNT),
        })
    }
}

/// Course described by an answer script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptedCourse {
    pub(crate) id: CourseId,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) location: String,
}

/// Which course won a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Verdict {
    /// The course being rated.
    PreferCandidate,
    /// The previously rated course.
    PreferExisting,
}

/// Answers replayed through a rating session, in the order they are asked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AnswerScript {
    pub(crate) course: ScriptedCourse,
    pub(crate) play_again: PlayAgainResponse,
    #[serde(default)]
    pub(crate) comparisons: Vec<Verdict>,
    pub(crate) rank_position: u32,
}

/// What `rate` prints once the rating is committed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RateOutcome {
    pub(crate) rating: CourseRating,
    pub(crate) breakdown: ScoreBreakdown,
}

/// Loads a JSON-encoded [`AnswerScript`] from disk.
pub(crate) fn load_answer_script(path: &Utf8Path) -> Result<AnswerScript, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenAnswers {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseAnswers {
        path: path.to_path_buf(),
        source,
    })
}

/// Replay `script` through a fresh session, cancelling it if any answer is
/// rejected.
pub(crate) fn replay<S, L, R>(
    flow: &mut RatingFlow<S, L, R>,
    script: &AnswerScript,
) -> Result<RateOutcome, CliError>
where
    S: RatingStore,
    L: RoundLog,
    R: Rng,
{
    let handle = flow.start_flow(CandidateCourse::new(
        script.course.id.clone(),
        script.course.name.clone(),
        script.course.location.clone(),
    ))?;
    let outcome = answer(flow, handle, script);
    if outcome.is_err() {
        flow.cancel(handle);
    }
    outcome
}

fn answer<S, L, R>(
    flow: &mut RatingFlow<S, L, R>,
    handle: SessionHandle,
    script: &AnswerScript,
) -> Result<RateOutcome, CliError>
where
    S: RatingStore,
    L: RoundLog,
    R: Rng,
{
    let mut verdicts = script.comparisons.iter();
    let mut next = flow.submit_play_again(handle, script.play_again)?;
    while let NextStep::Compare(prompt) = next {
        let verdict = verdicts
            .next()
            .ok_or_else(|| CliError::UnansweredComparison {
                index: prompt.index,
                opponent: prompt.opponent.course_id.clone(),
            })?;
        let chosen = match verdict {
            Verdict::PreferCandidate => &prompt.candidate.course_id,
            Verdict::PreferExisting => &prompt.opponent.course_id,
        };
        next = flow.submit_comparison_choice(handle, chosen)?;
    }
    let unused = verdicts.count();
    if unused > 0 {
        tracing::warn!(unused, "ignoring verdicts beyond the comparisons asked");
    }

    let placement = flow.submit_rank_position(handle, script.rank_position)?;
    let rating = flow.confirm(handle)?;
    Ok(RateOutcome {
        rating,
        breakdown: placement.breakdown,
    })
}

#[cfg(feature = "store-sqlite")]
pub(crate) fn run_rate(args: RateArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    let config = args.into_config()?;
    config.validate_sources()?;
    let script = load_answer_script(&config.answers)?;

    let ratings = crate::store::open_store(&config.target.database)?;
    let rounds = crate::store::open_store(&config.target.database)?;
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut flow = RatingFlow::with_config(
        config.target.user.clone(),
        ratings,
        rounds,
        ChaCha8Rng::seed_from_u64(seed),
        config.flow_config(),
    );

    let outcome = replay(&mut flow, &script)?;
    tracing::info!(
        course = %outcome.rating.course_id,
        score = outcome.rating.final_score,
        "rating committed"
    );
    crate::output::write_json(writer, &outcome)
}

#[cfg(not(feature = "store-sqlite"))]
pub(crate) fn run_rate(args: RateArgs, _writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "rating a course",
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RateConfig, CliError> {
    let merged = RateArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RateConfig::try_from(merged)
}
