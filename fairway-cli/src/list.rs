//! `list` command: print a user's ranked list, best first.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::store::StoreTarget;
use crate::{ARG_DATABASE, ARG_USER, CliError, ENV_LIST_USER};

/// CLI arguments for the `list` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "list",
    about = "Print the ranked list of rated courses as JSON"
)]
#[ortho_config(prefix = "FAIRWAY")]
pub(crate) struct ListArgs {
    /// SQLite database holding ratings and rounds.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// User whose ranked list is printed.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
}

impl ListArgs {
    pub(crate) fn into_config(self) -> Result<StoreTarget, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        StoreTarget::try_from(merged)
    }
}

impl TryFrom<ListArgs> for StoreTarget {
    type Error = CliError;

    fn try_from(args: ListArgs) -> Result<Self, Self::Error> {
        Self::resolve(args.database, args.user, ENV_LIST_USER)
    }
}

#[cfg(feature = "store-sqlite")]
pub(crate) fn run_list(args: ListArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    use fairway_core::{RankedList, RatingStore};

    let target = args.into_config()?;
    let store = crate::store::open_store(&target.database)?;
    let ratings = store.get_all_ratings(&target.user)?;
    let ranked = RankedList::from_ratings(&ratings);
    tracing::debug!(user = %target.user, courses = ranked.len(), "loaded ranked list");
    crate::output::write_json(writer, &ranked)
}

#[cfg(not(feature = "store-sqlite"))]
pub(crate) fn run_list(args: ListArgs, _writer: &mut dyn Write) -> Result<(), CliError> {
    args.into_config()?;
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "listing ratings",
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<StoreTarget, CliError> {
    let merged = ListArgs::merge_from_layers(layers).map_err(CliError::from)?;
    StoreTarget::try_from(merged)
}
