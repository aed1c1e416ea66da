//! SQLite-backed rating store and round log.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use rusqlite::{Connection, params};
use thiserror::Error;

use crate::{CourseId, CourseRating, PlayAgainResponse, UserId};

use super::{RatingStore, RoundLog, RoundRecord, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS course_ratings (
    user_id TEXT NOT NULL,
    course_id TEXT NOT NULL,
    course_name TEXT NOT NULL,
    course_location TEXT NOT NULL,
    play_again TEXT NOT NULL,
    comparison_wins INTEGER NOT NULL,
    comparison_losses INTEGER NOT NULL,
    compared_course_ids TEXT NOT NULL,
    rank_position INTEGER NOT NULL,
    total_courses INTEGER NOT NULL,
    final_score REAL NOT NULL,
    play_count INTEGER NOT NULL,
    PRIMARY KEY (user_id, course_id)
);
CREATE TABLE IF NOT EXISTS rounds (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    course_id TEXT NOT NULL,
    played_on TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS rounds_by_course ON rounds (user_id, course_id);
";

const UPSERT_SQL: &str = "
INSERT INTO course_ratings (
    user_id, course_id, course_name, course_location, play_again,
    comparison_wins, comparison_losses, compared_course_ids,
    rank_position, total_courses, final_score, play_count
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
ON CONFLICT (user_id, course_id) DO UPDATE SET
    course_name = excluded.course_name,
    course_location = excluded.course_location,
    play_again = excluded.play_again,
    comparison_wins = excluded.comparison_wins,
    comparison_losses = excluded.comparison_losses,
    compared_course_ids = excluded.compared_course_ids,
    rank_position = excluded.rank_position,
    total_courses = excluded.total_courses,
    final_score = excluded.final_score,
    play_count = excluded.play_count";

const SELECT_SQL: &str = "
SELECT course_id, course_name, course_location, play_again,
       comparison_wins, comparison_losses, compared_course_ids,
       rank_position, total_courses, final_score, play_count
FROM course_ratings
WHERE user_id = ?1";

/// Error raised while opening or migrating the SQLite database.
#[derive(Debug, Error)]
pub enum SqliteRatingStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the rating and round tables failed.
    #[error("failed to create rating schema: {0}")]
    Schema(#[source] rusqlite::Error),
}

/// Rating store and round log persisted in a single SQLite database.
pub struct SqliteRatingStore {
    connection: Connection,
}

impl fmt::Debug for SqliteRatingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteRatingStore")
            .field("path", &self.connection.path())
            .finish_non_exhaustive()
    }
}

impl SqliteRatingStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open<P>(path: P) -> Result<Self, SqliteRatingStoreError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let connection =
            Connection::open(path).map_err(|source| SqliteRatingStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Self::with_connection(connection)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, SqliteRatingStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqliteRatingStoreError::OpenDatabase {
                path: PathBuf::from(":memory:"),
                source,
            })?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self, SqliteRatingStoreError> {
        connection
            .execute_batch(SCHEMA)
            .map_err(SqliteRatingStoreError::Schema)?;
        log::debug!("rating schema ready");
        Ok(Self { connection })
    }
}

impl RatingStore for SqliteRatingStore {
    fn get_all_ratings(&self, user_id: &UserId) -> Result<Vec<CourseRating>, StoreError> {
        let mut statement = self
            .connection
            .prepare_cached(SELECT_SQL)
            .map_err(|source| StoreError::backend("prepare rating query", source))?;
        let rows = statement
            .query_map([user_id.as_str()], |row| {
                Ok(RatingRow {
                    course_id: row.get(0)?,
                    course_name: row.get(1)?,
                    course_location: row.get(2)?,
                    play_again: row.get(3)?,
                    comparison_wins: row.get(4)?,
                    comparison_losses: row.get(5)?,
                    compared_course_ids: row.get(6)?,
                    rank_position: row.get(7)?,
                    total_courses: row.get(8)?,
                    final_score: row.get(9)?,
                    play_count: row.get(10)?,
                })
            })
            .map_err(|source| StoreError::backend("query ratings", source))?;

        let mut ratings = Vec::new();
        for row in rows {
            let raw = row.map_err(|source| StoreError::backend("read rating row", source))?;
            ratings.push(raw.into_rating(user_id)?);
        }
        Ok(ratings)
    }

    fn upsert(&mut self, rating: &CourseRating) -> Result<(), StoreError> {
        let compared = serde_json::to_string(&rating.compared_course_ids)
            .map_err(|source| StoreError::backend("encode compared courses", source))?;
        self.connection
            .execute(
                UPSERT_SQL,
                params![
                    rating.user_id.as_str(),
                    rating.course_id.as_str(),
                    rating.course_name,
                    rating.course_location,
                    rating.play_again.as_str(),
                    rating.comparison_wins,
                    rating.comparison_losses,
                    compared,
                    rating.rank_position,
                    rating.total_courses,
                    rating.final_score,
                    rating.play_count,
                ],
            )
            .map_err(|source| StoreError::backend("upsert rating", source))?;
        Ok(())
    }
}

impl RoundLog for SqliteRatingStore {
    fn append(&mut self, round: &RoundRecord) -> Result<(), StoreError> {
        self.connection
            .execute(
                "INSERT INTO rounds (user_id, course_id, played_on) VALUES (?1, ?2, ?3)",
                params![
                    round.user_id.as_str(),
                    round.course_id.as_str(),
                    round.played_on
                ],
            )
            .map_err(|source| StoreError::backend("append round", source))?;
        Ok(())
    }

    fn count_plays(&self, user_id: &UserId, course_id: &CourseId) -> Result<u32, StoreError> {
        let count: i64 = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM rounds WHERE user_id = ?1 AND course_id = ?2",
                [user_id.as_str(), course_id.as_str()],
                |row| row.get(0),
            )
            .map_err(|source| StoreError::backend("count rounds", source))?;
        u32::try_from(count).map_err(|source| StoreError::backend("count rounds", source))
    }
}

/// Raw column values for one `course_ratings` row.
struct RatingRow {
    course_id: String,
    course_name: String,
    course_location: String,
    play_again: String,
    comparison_wins: u32,
    comparison_losses: u32,
    compared_course_ids: String,
    rank_position: u32,
    total_courses: u32,
    final_score: f64,
    play_count: u32,
}

impl RatingRow {
    fn into_rating(self, user_id: &UserId) -> Result<CourseRating, StoreError> {
        let course_id = CourseId::new(self.course_id);
        let play_again = self
            .play_again
            .parse::<PlayAgainResponse>()
            .map_err(|err| StoreError::CorruptRecord {
                course_id: course_id.clone(),
                reason: err.to_string(),
            })?;
        let compared_course_ids: Vec<CourseId> =
            serde_json::from_str(&self.compared_course_ids).map_err(|err| {
                StoreError::CorruptRecord {
                    course_id: course_id.clone(),
                    reason: format!("compared courses are not a JSON list: {err}"),
                }
            })?;
        Ok(CourseRating {
            user_id: user_id.clone(),
            course_id,
            course_name: self.course_name,
            course_location: self.course_location,
            play_again,
            comparison_wins: self.comparison_wins,
            comparison_losses: self.comparison_losses,
            compared_course_ids,
            rank_position: self.rank_position,
            total_courses: self.total_courses,
            final_score: self.final_score,
            play_count: self.play_count,
        })
    }
}
