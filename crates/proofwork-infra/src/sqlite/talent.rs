//! SQLite talent repository.

use proofwork_core::repository::talent::TalentRepository;
use proofwork_types::error::RepositoryError;
use proofwork_types::skill::SkillId;
use proofwork_types::talent::{Talent, TalentId};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_id, query_err};

/// SQLite-backed implementation of `TalentRepository`.
pub struct SqliteTalentRepository {
    pool: DatabasePool,
}

impl SqliteTalentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl TalentRepository for SqliteTalentRepository {
    async fn create(&self, talent: &Talent) -> Result<Talent, RepositoryError> {
        sqlx::query("INSERT INTO talents (id, fullname, avatar, created_at) VALUES (?, ?, ?, ?)")
            .bind(talent.id.to_string())
            .bind(&talent.fullname)
            .bind(&talent.avatar)
            .bind(format_datetime(&talent.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        Ok(talent.clone())
    }

    async fn get_by_id(&self, id: &TalentId) -> Result<Option<Talent>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM talents WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let id: String = row.try_get("id").map_err(query_err)?;
        let created_at: String = row.try_get("created_at").map_err(query_err)?;
        Ok(Some(Talent {
            id: parse_id(&id, "talent")?,
            fullname: row.try_get("fullname").map_err(query_err)?,
            avatar: row.try_get("avatar").map_err(query_err)?,
            created_at: parse_datetime(&created_at)?,
        }))
    }

    async fn set_skills(&self, id: &TalentId, skill_ids: &[SkillId]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        sqlx::query("DELETE FROM talent_skills WHERE talent_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;

        for skill_id in skill_ids {
            sqlx::query("INSERT INTO talent_skills (talent_id, skill_id) VALUES (?, ?)")
                .bind(id.to_string())
                .bind(skill_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(query_err)?;
        }

        tx.commit().await.map_err(query_err)?;
        Ok(())
    }

    async fn skill_ids(&self, id: &TalentId) -> Result<Vec<SkillId>, RepositoryError> {
        let rows = sqlx::query("SELECT skill_id FROM talent_skills WHERE talent_id = ?")
            .bind(id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;

        rows.iter()
            .map(|row| {
                let raw: String = row.try_get("skill_id").map_err(query_err)?;
                parse_id(&raw, "skill")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::{fixtures, test_pool};

    #[tokio::test]
    async fn test_set_skills_replaces_previous_set() {
        let pool = test_pool().await;
        let rust = fixtures::skill(&pool, "Rust").await;
        let sql = fixtures::skill(&pool, "SQL").await;
        let talent = fixtures::talent(&pool).await;
        let repo = SqliteTalentRepository::new(pool);

        repo.set_skills(&talent.id, &[rust.id, sql.id]).await.unwrap();
        repo.set_skills(&talent.id, &[sql.id]).await.unwrap();

        assert_eq!(repo.skill_ids(&talent.id).await.unwrap(), vec![sql.id]);
    }

    #[tokio::test]
    async fn test_unknown_skill_violates_foreign_key() {
        let pool = test_pool().await;
        let talent = fixtures::talent(&pool).await;
        let repo = SqliteTalentRepository::new(pool);

        assert!(repo.set_skills(&talent.id, &[SkillId::new()]).await.is_err());
        assert!(repo.skill_ids(&talent.id).await.unwrap().is_empty());
    }
}
