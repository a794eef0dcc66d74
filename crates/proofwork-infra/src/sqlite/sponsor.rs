//! SQLite sponsor repository.

use proofwork_core::repository::sponsor::SponsorRepository;
use proofwork_types::error::RepositoryError;
use proofwork_types::sponsor::{Sponsor, SponsorId};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_id, query_err};

/// SQLite-backed implementation of `SponsorRepository`.
pub struct SqliteSponsorRepository {
    pool: DatabasePool,
}

impl SqliteSponsorRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_sponsor(row: &sqlx::sqlite::SqliteRow) -> Result<Sponsor, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_err)?;
    let created_at: String = row.try_get("created_at").map_err(query_err)?;
    Ok(Sponsor {
        id: parse_id(&id, "sponsor")?,
        fullname: row.try_get("fullname").map_err(query_err)?,
        avatar: row.try_get("avatar").map_err(query_err)?,
        kudos: row.try_get("kudos").map_err(query_err)?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl SponsorRepository for SqliteSponsorRepository {
    async fn create(&self, sponsor: &Sponsor) -> Result<Sponsor, RepositoryError> {
        sqlx::query(
            "INSERT INTO sponsors (id, fullname, avatar, kudos, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(sponsor.id.to_string())
        .bind(&sponsor.fullname)
        .bind(&sponsor.avatar)
        .bind(sponsor.kudos)
        .bind(format_datetime(&sponsor.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        Ok(sponsor.clone())
    }

    async fn get_by_id(&self, id: &SponsorId) -> Result<Option<Sponsor>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM sponsors WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        row.as_ref().map(row_to_sponsor).transpose()
    }

    async fn increase_kudos(&self, id: &SponsorId, amount: i64) -> Result<i64, RepositoryError> {
        let row = sqlx::query("UPDATE sponsors SET kudos = kudos + ? WHERE id = ? RETURNING kudos")
            .bind(amount)
            .bind(id.to_string())
            .fetch_optional(&self.pool.writer)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => row.try_get("kudos").map_err(query_err),
            None => Err(RepositoryError::NotFound),
        }
    }
}
