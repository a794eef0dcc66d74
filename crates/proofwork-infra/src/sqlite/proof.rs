//! SQLite proof repository.

use proofwork_core::repository::proof::ProofRepository;
use proofwork_types::error::RepositoryError;
use proofwork_types::proof::{Proof, ProofId, ProofStatus};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_id, parse_optional_datetime, query_err};

/// SQLite-backed implementation of `ProofRepository`.
pub struct SqliteProofRepository {
    pool: DatabasePool,
}

impl SqliteProofRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_proof(row: &sqlx::sqlite::SqliteRow) -> Result<Proof, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_err)?;
    let talent_id: String = row.try_get("talent_id").map_err(query_err)?;
    let status: String = row.try_get("status").map_err(query_err)?;
    let created_at: String = row.try_get("created_at").map_err(query_err)?;
    let updated_at: String = row.try_get("updated_at").map_err(query_err)?;

    Ok(Proof {
        id: parse_id(&id, "proof")?,
        talent_id: parse_id(&talent_id, "talent")?,
        title: row.try_get("title").map_err(query_err)?,
        summary: row.try_get("summary").map_err(query_err)?,
        content: row.try_get("content").map_err(query_err)?,
        icon: row.try_get("icon").map_err(query_err)?,
        status: status
            .parse::<ProofStatus>()
            .map_err(RepositoryError::Query)?,
        published_at: parse_optional_datetime(row.try_get("published_at").map_err(query_err)?)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

impl ProofRepository for SqliteProofRepository {
    async fn create(&self, proof: &Proof) -> Result<Proof, RepositoryError> {
        sqlx::query(
            "INSERT INTO proofs (id, talent_id, title, summary, content, icon, status, published_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(proof.id.to_string())
        .bind(proof.talent_id.to_string())
        .bind(&proof.title)
        .bind(&proof.summary)
        .bind(&proof.content)
        .bind(&proof.icon)
        .bind(proof.status.to_string())
        .bind(proof.published_at.as_ref().map(format_datetime))
        .bind(format_datetime(&proof.created_at))
        .bind(format_datetime(&proof.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        Ok(proof.clone())
    }

    async fn get_by_id(&self, id: &ProofId) -> Result<Option<Proof>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM proofs WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        row.as_ref().map(row_to_proof).transpose()
    }

    async fn update(&self, proof: &Proof) -> Result<Proof, RepositoryError> {
        let result = sqlx::query(
            "UPDATE proofs SET title = ?, summary = ?, content = ?, icon = ?, status = ?, published_at = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&proof.title)
        .bind(&proof.summary)
        .bind(&proof.content)
        .bind(&proof.icon)
        .bind(proof.status.to_string())
        .bind(proof.published_at.as_ref().map(format_datetime))
        .bind(format_datetime(&proof.updated_at))
        .bind(proof.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(proof.clone())
    }
}
