//! `score` command: one-shot score calculation from explicit inputs.

use std::io::Write;

use clap::Parser;
use fairway_core::{NeighborScores, PlayAgainResponse};
use fairway_scorer::{ComparisonTally, ScoreInputs, ScoreSynthesizer};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::output::write_json;
use crate::{
    ARG_ABOVE, ARG_BELOW, ARG_LOSSES, ARG_PLAY_AGAIN, ARG_RANK_POSITION, ARG_TOTAL_COURSES,
    ARG_WINS, CliError, ENV_SCORE_PLAY_AGAIN, ENV_SCORE_RANK_POSITION, ENV_SCORE_TOTAL_COURSES,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "score",
    long_about = "Compute a final score and its components from a play-again \
                 response, a comparison record and a list position. Nothing \
                 is read from or written to the rating store.",
    about = "Compute a score from explicit inputs"
)]
#[ortho_config(prefix = "FAIRWAY")]
pub(crate) struct ScoreArgs {
    /// Would the golfer play the course again: definitely, maybe or no.
    #[arg(long = ARG_PLAY_AGAIN, value_name = "response")]
    #[serde(default)]
    pub(crate) play_again: Option<PlayAgainResponse>,
    /// Comparisons the course won.
    #[arg(long = ARG_WINS, value_name = "count")]
    #[serde(default)]
    pub(crate) wins: Option<u32>,
    /// Comparisons the course lost.
    #[arg(long = ARG_LOSSES, value_name = "count")]
    #[serde(default)]
    pub(crate) losses: Option<u32>,
    /// Zero-based insertion index, 0 being best.
    #[arg(long = ARG_RANK_POSITION, value_name = "index")]
    #[serde(default)]
    pub(crate) rank_position: Option<u32>,
    /// Size of the ranked list before insertion.
    #[arg(long = ARG_TOTAL_COURSES, value_name = "count")]
    #[serde(default)]
    pub(crate) total_courses: Option<u32>,
    /// Score of the course directly above the insertion point.
    #[arg(long = ARG_ABOVE, value_name = "score")]
    #[serde(default)]
    pub(crate) above: Option<f64>,
    /// Score of the course directly below the insertion point.
    #[arg(long = ARG_BELOW, value_name = "score")]
    #[serde(default)]
    pub(crate) below: Option<f64>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScoreConfig {
    pub(crate) inputs: ScoreInputs,
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let play_again = args.play_again.ok_or(CliError::MissingArgument {
            field: ARG_PLAY_AGAIN,
            env: ENV_SCORE_PLAY_AGAIN,
        })?;
        let rank_position = args.rank_position.ok_or(CliError::MissingArgument {
            field: ARG_RANK_POSITION,
            env: ENV_SCORE_RANK_POSITION,
        })?;
        let total_courses = args.total_courses.ok_or(CliError::MissingArgument {
            field: ARG_TOTAL_COURSES,
            env: ENV_SCORE_TOTAL_COURSES,
        })?;
        Ok(Self {
            inputs: ScoreInputs {
                play_again,
                tally: ComparisonTally::new(args.wins.unwrap_or(0), args.losses.unwrap_or(0)),
                rank_position,
                total_courses,
                neighbors: NeighborScores {
                    above: args.above,
                    below: args.below,
                },
            },
        })
    }
}

pub(crate) fn run_score(args: ScoreArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_score(&config, writer)
}

pub(crate) fn execute_score(config: &ScoreConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let breakdown = ScoreSynthesizer::default().breakdown(&config.inputs)?;
    write_json(writer, &breakdown)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScoreConfig, CliError> {
    let merged = ScoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScoreConfig::try_from(merged)
}
