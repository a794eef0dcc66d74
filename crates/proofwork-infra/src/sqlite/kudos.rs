//! SQLite kudos ledger repository.
//!
//! A posting is one write transaction on the single writer connection:
//! conditional balance decrement, history row, per-skill history rows, and
//! SkillKudos cache upserts. The decrement carries its own `kudos >= total`
//! guard, so a balance that moved since the service's pre-check is caught
//! inside the transaction and nothing is written.
//!
//! Aggregations run on the reader pool and only see committed transactions.

use proofwork_core::repository::kudos::{KudosPosting, KudosRepository, PostOutcome};
use proofwork_types::error::RepositoryError;
use proofwork_types::kudos::{
    KudosHistoryEntry, KudosHistoryId, KudosHistoryItem, KudosReceipt, KudosedProof,
    KudosedProofOrder, SkillKudosHistoryEntry, SkillKudosTotal,
};
use proofwork_types::page::{Page, PageRequest};
use proofwork_types::proof::ProofId;
use proofwork_types::sponsor::SponsorId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_id, query_err};

/// SQLite-backed implementation of `KudosRepository`.
pub struct SqliteKudosRepository {
    pool: DatabasePool,
}

impl SqliteKudosRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_skill_total(row: &sqlx::sqlite::SqliteRow) -> Result<SkillKudosTotal, RepositoryError> {
    let skill_id: String = row.try_get("skill_id").map_err(query_err)?;
    Ok(SkillKudosTotal {
        skill_id: parse_id(&skill_id, "skill")?,
        skill_name: row.try_get("skill_name").map_err(query_err)?,
        kudos: row.try_get("kudos").map_err(query_err)?,
    })
}

fn order_clause(order: KudosedProofOrder) -> &'static str {
    match order {
        KudosedProofOrder::Newest => "last_sent_at DESC, h.proof_id DESC",
        KudosedProofOrder::TotalKudos => "total DESC, last_sent_at DESC",
    }
}

impl KudosRepository for SqliteKudosRepository {
    async fn post(&self, posting: &KudosPosting) -> Result<PostOutcome, RepositoryError> {
        let sponsor_id = posting.sponsor_id.to_string();
        let proof_id = posting.proof_id.to_string();
        let history_id = posting.history_id.to_string();

        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let decremented = sqlx::query(
            "UPDATE sponsors SET kudos = kudos - ? WHERE id = ? AND kudos >= ? RETURNING kudos",
        )
        .bind(posting.total)
        .bind(&sponsor_id)
        .bind(posting.total)
        .fetch_optional(&mut *tx)
        .await
        .map_err(query_err)?;

        let balance: i64 = match decremented {
            Some(row) => row.try_get("kudos").map_err(query_err)?,
            None => {
                // Either the sponsor is gone or the balance is short.
                let current = sqlx::query("SELECT kudos FROM sponsors WHERE id = ?")
                    .bind(&sponsor_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(query_err)?;
                return match current {
                    Some(row) => Ok(PostOutcome::InsufficientBalance {
                        balance: row.try_get("kudos").map_err(query_err)?,
                    }),
                    None => Err(RepositoryError::NotFound),
                };
            }
        };

        sqlx::query(
            "INSERT INTO kudos_history (id, sponsor_id, proof_id, kudos, sent_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&history_id)
        .bind(&sponsor_id)
        .bind(&proof_id)
        .bind(posting.total)
        .bind(format_datetime(&posting.sent_at))
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        for line in &posting.lines {
            let skill_id = line.skill_id.to_string();

            sqlx::query(
                "INSERT INTO skill_kudos_history (history_id, skill_id, kudos) VALUES (?, ?, ?)",
            )
            .bind(&history_id)
            .bind(&skill_id)
            .bind(line.amount)
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;

            sqlx::query(
                "INSERT INTO skill_kudos (proof_id, skill_id, kudos) VALUES (?, ?, ?)
                 ON CONFLICT(proof_id, skill_id) DO UPDATE SET kudos = kudos + excluded.kudos",
            )
            .bind(&proof_id)
            .bind(&skill_id)
            .bind(line.amount)
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;
        }

        let count_row =
            sqlx::query("SELECT COALESCE(SUM(kudos), 0) AS total FROM skill_kudos WHERE proof_id = ?")
                .bind(&proof_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(query_err)?;
        let sponsor_row = sqlx::query(
            "SELECT COALESCE(SUM(kudos), 0) AS total FROM kudos_history WHERE sponsor_id = ? AND proof_id = ?",
        )
        .bind(&sponsor_id)
        .bind(&proof_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(query_err)?;

        let receipt = KudosReceipt {
            current_count_kudos: count_row.try_get("total").map_err(query_err)?,
            current_sum_kudos_by_sponsor: sponsor_row.try_get("total").map_err(query_err)?,
            current_sponsor_balance: balance,
        };

        tx.commit().await.map_err(query_err)?;

        tracing::debug!(
            history_id = %posting.history_id,
            lines = posting.lines.len(),
            "kudos posting committed"
        );
        Ok(PostOutcome::Accepted(receipt))
    }

    async fn has_endorsed(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> Result<bool, RepositoryError> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM kudos_history WHERE sponsor_id = ? AND proof_id = ?) AS endorsed",
        )
        .bind(sponsor_id.to_string())
        .bind(proof_id.to_string())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let endorsed: i64 = row.try_get("endorsed").map_err(query_err)?;
        Ok(endorsed != 0)
    }

    async fn cached_total(&self, proof_id: &ProofId) -> Result<i64, RepositoryError> {
        let row =
            sqlx::query("SELECT COALESCE(SUM(kudos), 0) AS total FROM skill_kudos WHERE proof_id = ?")
                .bind(proof_id.to_string())
                .fetch_one(&self.pool.reader)
                .await
                .map_err(query_err)?;
        row.try_get("total").map_err(query_err)
    }

    async fn ledger_total(&self, proof_id: &ProofId) -> Result<i64, RepositoryError> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(s.kudos), 0) AS total
             FROM skill_kudos_history s
             JOIN kudos_history h ON h.id = s.history_id
             WHERE h.proof_id = ?",
        )
        .bind(proof_id.to_string())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_err)?;
        row.try_get("total").map_err(query_err)
    }

    async fn skill_totals(&self, proof_id: &ProofId) -> Result<Vec<SkillKudosTotal>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT sk.skill_id AS skill_id, s.name AS skill_name, sk.kudos AS kudos
             FROM skill_kudos sk
             JOIN skills s ON s.id = sk.skill_id
             WHERE sk.proof_id = ?
             ORDER BY sk.kudos DESC, s.name",
        )
        .bind(proof_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        rows.iter().map(row_to_skill_total).collect()
    }

    async fn sponsor_skill_breakdown(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> Result<Vec<SkillKudosTotal>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT s.skill_id AS skill_id, sk.name AS skill_name, SUM(s.kudos) AS kudos
             FROM skill_kudos_history s
             JOIN kudos_history h ON h.id = s.history_id
             JOIN skills sk ON sk.id = s.skill_id
             WHERE h.sponsor_id = ? AND h.proof_id = ?
             GROUP BY s.skill_id, sk.name
             ORDER BY kudos DESC, sk.name",
        )
        .bind(sponsor_id.to_string())
        .bind(proof_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        rows.iter().map(row_to_skill_total).collect()
    }

    async fn sponsor_total(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> Result<i64, RepositoryError> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(kudos), 0) AS total FROM kudos_history WHERE sponsor_id = ? AND proof_id = ?",
        )
        .bind(sponsor_id.to_string())
        .bind(proof_id.to_string())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_err)?;
        row.try_get("total").map_err(query_err)
    }

    async fn history(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
        page: PageRequest,
    ) -> Result<Page<KudosHistoryItem>, RepositoryError> {
        let total = self.count_entries(sponsor_id, proof_id).await?;

        let rows = sqlx::query(
            "SELECT sent_at, kudos FROM kudos_history
             WHERE sponsor_id = ? AND proof_id = ?
             ORDER BY sent_at DESC, id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(sponsor_id.to_string())
        .bind(proof_id.to_string())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let sent_at: String = row.try_get("sent_at").map_err(query_err)?;
            items.push(KudosHistoryItem {
                sent_at: parse_datetime(&sent_at)?,
                kudos: row.try_get("kudos").map_err(query_err)?,
            });
        }
        Ok(Page::new(items, page, total))
    }

    async fn kudosed_proofs(
        &self,
        sponsor_id: &SponsorId,
        order: KudosedProofOrder,
        page: PageRequest,
    ) -> Result<Page<KudosedProof>, RepositoryError> {
        let count_row = sqlx::query(
            "SELECT COUNT(DISTINCT proof_id) AS total FROM kudos_history WHERE sponsor_id = ?",
        )
        .bind(sponsor_id.to_string())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_err)?;
        let total: i64 = count_row.try_get("total").map_err(query_err)?;

        let sql = format!(
            "SELECT h.proof_id AS proof_id, p.icon AS icon, p.title AS title,
                    MAX(h.sent_at) AS last_sent_at, SUM(h.kudos) AS total
             FROM kudos_history h
             JOIN proofs p ON p.id = h.proof_id
             WHERE h.sponsor_id = ?
             GROUP BY h.proof_id, p.icon, p.title
             ORDER BY {}
             LIMIT ? OFFSET ?",
            order_clause(order)
        );
        let rows = sqlx::query(&sql)
            .bind(sponsor_id.to_string())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let proof_id: String = row.try_get("proof_id").map_err(query_err)?;
            let sent_at: String = row.try_get("last_sent_at").map_err(query_err)?;
            items.push(KudosedProof {
                proof_id: parse_id(&proof_id, "proof")?,
                icon: row.try_get("icon").map_err(query_err)?,
                title: row.try_get("title").map_err(query_err)?,
                sent_at: parse_datetime(&sent_at)?,
                total_kudos_from_sponsor: row.try_get("total").map_err(query_err)?,
            });
        }
        Ok(Page::new(items, page, total))
    }

    async fn entries(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> Result<Vec<KudosHistoryEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, sponsor_id, proof_id, kudos, sent_at FROM kudos_history
             WHERE sponsor_id = ? AND proof_id = ?
             ORDER BY sent_at, id",
        )
        .bind(sponsor_id.to_string())
        .bind(proof_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.try_get("id").map_err(query_err)?;
            let sponsor: String = row.try_get("sponsor_id").map_err(query_err)?;
            let proof: String = row.try_get("proof_id").map_err(query_err)?;
            let sent_at: String = row.try_get("sent_at").map_err(query_err)?;
            entries.push(KudosHistoryEntry {
                id: parse_id(&id, "kudos history")?,
                sponsor_id: parse_id(&sponsor, "sponsor")?,
                proof_id: parse_id(&proof, "proof")?,
                kudos: row.try_get("kudos").map_err(query_err)?,
                sent_at: parse_datetime(&sent_at)?,
            });
        }
        Ok(entries)
    }

    async fn skill_entries(
        &self,
        history_id: &KudosHistoryId,
    ) -> Result<Vec<SkillKudosHistoryEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT skill_id, kudos FROM skill_kudos_history WHERE history_id = ? ORDER BY rowid",
        )
        .bind(history_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        rows.iter()
            .map(|row| {
                let skill_id: String = row.try_get("skill_id").map_err(query_err)?;
                Ok(SkillKudosHistoryEntry {
                    history_id: *history_id,
                    skill_id: parse_id(&skill_id, "skill")?,
                    kudos: row.try_get("kudos").map_err(query_err)?,
                })
            })
            .collect()
    }
}

impl SqliteKudosRepository {
    async fn count_entries(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> Result<i64, RepositoryError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total FROM kudos_history WHERE sponsor_id = ? AND proof_id = ?",
        )
        .bind(sponsor_id.to_string())
        .bind(proof_id.to_string())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_err)?;
        row.try_get("total").map_err(query_err)
    }
}
