//! Resolve and open the SQLite database shared by the store-backed commands.

use camino::Utf8PathBuf;
use fairway_core::UserId;

use crate::{ARG_USER, CliError, DEFAULT_DATABASE};

/// Database and user a store-backed command operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoreTarget {
    /// SQLite database path.
    pub(crate) database: Utf8PathBuf,
    /// Owner of the ratings read or written.
    pub(crate) user: UserId,
}

impl StoreTarget {
    /// Apply defaults and require a user.
    ///
    /// `user_env` names the environment variable reported when the user is
    /// missing.
    pub(crate) fn resolve(
        database: Option<Utf8PathBuf>,
        user: Option<String>,
        user_env: &'static str,
    ) -> Result<Self, CliError> {
        let user = user
            .filter(|raw| !raw.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_USER,
                env: user_env,
            })?;
        Ok(Self {
            database: database.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            user: UserId::new(user),
        })
    }
}

/// Open the SQLite store at `path`, creating its directory and schema.
#[cfg(feature = "store-sqlite")]
pub(crate) fn open_store(
    path: &camino::Utf8Path,
) -> Result<fairway_core::SqliteRatingStore, CliError> {
    crate::fs::ensure_parent_dir(path).map_err(|source| CliError::PrepareDatabase {
        path: path.to_path_buf(),
        source,
    })?;
    let store = fairway_core::SqliteRatingStore::open(path.as_std_path())?;
    tracing::debug!(database = %path, "opened rating store");
    Ok(store)
}
