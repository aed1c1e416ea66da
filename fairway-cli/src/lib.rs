//! Command-line interface for rating golf courses with the Fairway engine.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod list;
mod log_round;
mod output;
mod rate;
mod score;
mod store;

pub use error::CliError;

pub(crate) const ARG_ANSWERS: &str = "answers";
pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_USER: &str = "user";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_COMPARISONS: &str = "comparisons";
pub(crate) const ARG_COURSE: &str = "course";
pub(crate) const ARG_PLAYED_ON: &str = "played-on";
pub(crate) const ARG_PLAY_AGAIN: &str = "play-again";
pub(crate) const ARG_WINS: &str = "wins";
pub(crate) const ARG_LOSSES: &str = "losses";
pub(crate) const ARG_RANK_POSITION: &str = "rank-position";
pub(crate) const ARG_TOTAL_COURSES: &str = "total-courses";
pub(crate) const ARG_ABOVE: &str = "above";
pub(crate) const ARG_BELOW: &str = "below";

pub(crate) const ENV_RATE_ANSWERS: &str = "FAIRWAY_CMDS_RATE_ANSWERS";
pub(crate) const ENV_RATE_USER: &str = "FAIRWAY_CMDS_RATE_USER";
pub(crate) const ENV_LIST_USER: &str = "FAIRWAY_CMDS_LIST_USER";
pub(crate) const ENV_LOG_ROUND_USER: &str = "FAIRWAY_CMDS_LOG_ROUND_USER";
pub(crate) const ENV_LOG_ROUND_COURSE: &str = "FAIRWAY_CMDS_LOG_ROUND_COURSE";
pub(crate) const ENV_LOG_ROUND_PLAYED_ON: &str = "FAIRWAY_CMDS_LOG_ROUND_PLAYED_ON";
pub(crate) const ENV_SCORE_PLAY_AGAIN: &str = "FAIRWAY_CMDS_SCORE_PLAY_AGAIN";
pub(crate) const ENV_SCORE_RANK_POSITION: &str = "FAIRWAY_CMDS_SCORE_RANK_POSITION";
pub(crate) const ENV_SCORE_TOTAL_COURSES: &str = "FAIRWAY_CMDS_SCORE_TOTAL_COURSES";

/// SQLite database used when `--database` is not given.
pub(crate) const DEFAULT_DATABASE: &str = "fairway.db";

/// Run the Fairway CLI with the current process arguments and environment.
///
/// Command output is written to standard output as JSON.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration, the store or
/// the rating flow fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout)
}

fn dispatch(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Score(args) => score::run_score(args, writer),
        Command::Rate(args) => rate::run_rate(args, writer),
        Command::List(args) => list::run_list(args, writer),
        Command::LogRound(args) => log_round::run_log_round(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "fairway",
    about = "Rate golf courses and maintain a personal ranked list",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rate a course from a scripted answer file and commit the result.
    Rate(rate::RateArgs),
    /// Print the ranked list of rated courses.
    List(list::ListArgs),
    /// Compute a score from explicit inputs without touching the store.
    Score(score::ScoreArgs),
    /// Record a played round.
    LogRound(log_round::LogRoundArgs),
}

#[cfg(test)]
mod tests;
