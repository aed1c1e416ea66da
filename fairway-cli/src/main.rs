//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use fairway_cli::CliError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "warn,fairway_flow=info,fairway_cli=info";

fn main() -> eyre::Result<()> {
    init_tracing();
    match fairway_cli::run() {
        Ok(()) => Ok(()),
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => Err(err.into()),
    }
}

/// Send diagnostics to stderr so stdout carries only command output.
///
/// `RUST_LOG` overrides the default filter. Records emitted through the `log`
/// facade by the library crates are captured as well.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
