//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools. Timestamps are stored as RFC 3339 text and
//! ids as UUID text.

pub mod api_key;
pub mod kudos;
pub mod pool;
pub mod proof;
pub mod skill;
pub mod sponsor;
pub mod submission;
pub mod talent;
pub mod vacancy;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use proofwork_types::error::RepositoryError;

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn parse_optional_datetime(
    s: Option<String>,
) -> Result<Option<DateTime<Utc>>, RepositoryError> {
    s.as_deref().map(parse_datetime).transpose()
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Parse a stored id column into its typed id.
pub(crate) fn parse_id<T>(s: &str, entity: &str) -> Result<T, RepositoryError>
where
    T: FromStr<Err = uuid::Error>,
{
    s.parse::<T>()
        .map_err(|e| RepositoryError::Query(format!("invalid {entity} id: {e}")))
}

pub(crate) fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> pool::DatabasePool {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    std::mem::forget(dir);
    pool::DatabasePool::new(&url).await.unwrap()
}
