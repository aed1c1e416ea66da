//! `log-round` command: append a played round to the round log.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use fairway_core::{CourseId, RoundRecord};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::store::StoreTarget;
use crate::{
    ARG_COURSE, ARG_DATABASE, ARG_PLAYED_ON, ARG_USER, CliError, ENV_LOG_ROUND_COURSE,
    ENV_LOG_ROUND_PLAYED_ON, ENV_LOG_ROUND_USER,
};

/// CLI arguments for the `log-round` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "log-round",
    long_about = "Record a round played on a course. Logged rounds are counted \
                 into the play count shown alongside later ratings; they never \
                 affect scores.",
    about = "Record a played round"
)]
#[ortho_config(prefix = "FAIRWAY")]
pub(crate) struct LogRoundArgs {
    /// Course that was played.
    #[arg(value_name = "course")]
    #[serde(default)]
    pub(crate) course: Option<String>,
    /// Date label for the round, e.g. 2024-06-01.
    #[arg(long = ARG_PLAYED_ON, value_name = "date")]
    #[serde(default)]
    pub(crate) played_on: Option<String>,
    /// SQLite database holding ratings and rounds.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Golfer who played the round.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
}

impl LogRoundArgs {
    pub(crate) fn into_config(self) -> Result<LogRoundConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        LogRoundConfig::try_from(merged)
    }
}

/// Resolved `log-round` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogRoundConfig {
    pub(crate) target: StoreTarget,
    pub(crate) course: CourseId,
    pub(crate) played_on: String,
}

impl LogRoundConfig {
    pub(crate) fn record(&self) -> RoundRecord {
        RoundRecord {
            user_id: self.target.user.clone(),
            course_id: self.course.clone(),
            played_on: self.played_on.clone(),
        }
    }
}

impl TryFrom<LogRoundArgs> for LogRoundConfig {
    type Error = CliError;

    fn try_from(args: LogRoundArgs) -> Result<Self, Self::Error> {
        let course = args
            .course
            .filter(|raw| !raw.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_COURSE,
                env: ENV_LOG_ROUND_COURSE,
            })?;
        let played_on = args.played_on.ok_or(CliError::MissingArgument {
            field: ARG_PLAYED_ON,
            env: ENV_LOG_ROUND_PLAYED_ON,
        })?;
        let target = StoreTarget::resolve(args.database, args.user, ENV_LOG_ROUND_USER)?;
        Ok(Self {
            target,
            course: CourseId::new(course),
            played_on,
        })
    }
}

/// What `log-round` prints after the round is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct LoggedRound {
    pub(crate) course_id: CourseId,
    pub(crate) played_on: String,
    pub(crate) play_count: u32,
}

#[cfg(feature = "store-sqlite")]
pub(crate) fn run_log_round(args: LogRoundArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    use fairway_core::RoundLog;

    let config = args.into_config()?;
    let mut rounds = crate::store::open_store(&config.target.database)?;
    rounds.append(&config.record())?;
    let play_count = rounds.count_plays(&config.target.user, &config.course)?;
    tracing::info!(course = %config.course, play_count, "round logged");
    crate::output::write_json(
        writer,
        &LoggedRound {
            course_id: config.course,
            played_on: config.played_on,
            play_count,
        },
    )
}

#[cfg(not(feature = "store-sqlite"))]
pub(crate) fn run_log_round(args: LogRoundArgs, _writer: &mut dyn Write) -> Result<(), CliError> {
    args.into_config()?;
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "logging a round",
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<LogRoundConfig, CliError> {
    let merged = LogRoundArgs::merge_from_layers(layers).map_err(CliError::from)?;
    LogRoundConfig::try_from(merged)
}
