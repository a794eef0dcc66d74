//! SQLite skill catalog repository.

use proofwork_core::repository::skill::SkillRepository;
use proofwork_types::error::RepositoryError;
use proofwork_types::skill::{Skill, SkillId};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_id, query_err};

/// SQLite-backed implementation of `SkillRepository`.
pub struct SqliteSkillRepository {
    pool: DatabasePool,
}

impl SqliteSkillRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_skill(row: &sqlx::sqlite::SqliteRow) -> Result<Skill, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_err)?;
    Ok(Skill {
        id: parse_id(&id, "skill")?,
        name: row.try_get("name").map_err(query_err)?,
    })
}

impl SkillRepository for SqliteSkillRepository {
    async fn create(&self, skill: &Skill) -> Result<Skill, RepositoryError> {
        let result = sqlx::query("INSERT INTO skills (id, name, created_at) VALUES (?, ?, ?)")
            .bind(skill.id.to_string())
            .bind(&skill.name)
            .bind(format_datetime(&chrono::Utc::now()))
            .execute(&self.pool.writer)
            .await;

        match result {
            Ok(_) => Ok(skill.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("skill '{}' already exists", skill.name)),
            ),
            Err(e) => Err(query_err(e)),
        }
    }

    async fn get_by_id(&self, id: &SkillId) -> Result<Option<Skill>, RepositoryError> {
        let row = sqlx::query("SELECT id, name FROM skills WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        row.as_ref().map(row_to_skill).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Skill>, RepositoryError> {
        // `name` is declared COLLATE NOCASE.
        let row = sqlx::query("SELECT id, name FROM skills WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        row.as_ref().map(row_to_skill).transpose()
    }

    async fn find_by_ids(&self, ids: &[SkillId]) -> Result<Vec<Skill>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT id, name FROM skills WHERE id IN ({placeholders})");
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.to_string());
        }

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(row_to_skill).collect()
    }

    async fn list(&self) -> Result<Vec<Skill>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name FROM skills ORDER BY name COLLATE NOCASE")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(row_to_skill).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_pool;

    fn skill(name: &str) -> Skill {
        Skill {
            id: SkillId::new(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = SqliteSkillRepository::new(test_pool().await);
        let rust = repo.create(&skill("Rust")).await.unwrap();

        assert_eq!(repo.get_by_id(&rust.id).await.unwrap(), Some(rust.clone()));
        assert_eq!(repo.get_by_name("rUST").await.unwrap(), Some(rust));
        assert!(repo.get_by_id(&SkillId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_ignoring_case_conflicts() {
        let repo = SqliteSkillRepository::new(test_pool().await);
        repo.create(&skill("Rust")).await.unwrap();
        let err = repo.create(&skill("RUST")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_by_ids_skips_unknown() {
        let repo = SqliteSkillRepository::new(test_pool().await);
        let rust = repo.create(&skill("Rust")).await.unwrap();
        let sql = repo.create(&skill("SQL")).await.unwrap();
        repo.create(&skill("Go")).await.unwrap();

        let found = repo
            .find_by_ids(&[sql.id, SkillId::new(), rust.id])
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.contains(&rust));
        assert!(found.contains(&sql));

        assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let repo = SqliteSkillRepository::new(test_pool().await);
        repo.create(&skill("sql")).await.unwrap();
        repo.create(&skill("Axum")).await.unwrap();
        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Axum", "sql"]);
    }
}
