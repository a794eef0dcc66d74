//! SQLite vacancy repository.
//!
//! Writes are guarded by the `revision` column: an update only lands when the
//! stored revision still equals the one the caller read.

use proofwork_core::repository::vacancy::VacancyRepository;
use proofwork_types::error::RepositoryError;
use proofwork_types::page::{Page, PageRequest};
use proofwork_types::skill::SkillId;
use proofwork_types::sponsor::SponsorId;
use proofwork_types::vacancy::{Vacancy, VacancyId, VacancyStatus};
use sqlx::{Row, Sqlite, Transaction};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_id, parse_optional_datetime, query_err};

/// SQLite-backed implementation of `VacancyRepository`.
pub struct SqliteVacancyRepository {
    pool: DatabasePool,
}

impl SqliteVacancyRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn load_skills(&self, id: &str) -> Result<Vec<SkillId>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT skill_id FROM vacancy_skills WHERE vacancy_id = ? ORDER BY position",
        )
        .bind(id)
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

    async fn hydrate(
        &self,
        rows: Vec<sqlx::sqlite::SqliteRow>,
    ) -> Result<Vec<Vacancy>, RepositoryError> {
        let mut vacancies = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.try_get("id").map_err(query_err)?;
            let skills = self.load_skills(&id).await?;
            vacancies.push(row_to_vacancy(row, skills)?);
        }
        Ok(vacancies)
    }
}

fn row_to_vacancy(
    row: &sqlx::sqlite::SqliteRow,
    skill_ids: Vec<SkillId>,
) -> Result<Vacancy, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_err)?;
    let sponsor_id: String = row.try_get("sponsor_id").map_err(query_err)?;
    let status: String = row.try_get("status").map_err(query_err)?;
    let percent: i64 = row.try_get("skills_matched_percent").map_err(query_err)?;
    let created_at: String = row.try_get("created_at").map_err(query_err)?;
    let updated_at: String = row.try_get("updated_at").map_err(query_err)?;

    Ok(Vacancy {
        id: parse_id(&id, "vacancy")?,
        sponsor_id: parse_id(&sponsor_id, "sponsor")?,
        title: row.try_get("title").map_err(query_err)?,
        content: row.try_get("content").map_err(query_err)?,
        status: status
            .parse::<VacancyStatus>()
            .map_err(RepositoryError::Query)?,
        published_at: parse_optional_datetime(row.try_get("published_at").map_err(query_err)?)?,
        skills_matched_percent: u8::try_from(percent)
            .map_err(|_| RepositoryError::Query(format!("invalid skills percent: {percent}")))?,
        skill_ids,
        revision: row.try_get("revision").map_err(query_err)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

async fn insert_skills(
    tx: &mut Transaction<'_, Sqlite>,
    vacancy_id: &str,
    skill_ids: &[SkillId],
) -> Result<(), RepositoryError> {
    for (position, skill_id) in skill_ids.iter().enumerate() {
        sqlx::query("INSERT INTO vacancy_skills (vacancy_id, skill_id, position) VALUES (?, ?, ?)")
            .bind(vacancy_id)
            .bind(skill_id.to_string())
            .bind(position as i64)
            .execute(&mut **tx)
            .await
            .map_err(query_err)?;
    }
    Ok(())
}

impl VacancyRepository for SqliteVacancyRepository {
    async fn create(&self, vacancy: &Vacancy) -> Result<Vacancy, RepositoryError> {
        let id = vacancy.id.to_string();
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        sqlx::query(
            "INSERT INTO vacancies (id, sponsor_id, title, content, status, published_at,
                                    skills_matched_percent, revision, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(vacancy.sponsor_id.to_string())
        .bind(&vacancy.title)
        .bind(&vacancy.content)
        .bind(vacancy.status.to_string())
        .bind(vacancy.published_at.as_ref().map(format_datetime))
        .bind(i64::from(vacancy.skills_matched_percent))
        .bind(vacancy.revision)
        .bind(format_datetime(&vacancy.created_at))
        .bind(format_datetime(&vacancy.updated_at))
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        insert_skills(&mut tx, &id, &vacancy.skill_ids).await?;

        tx.commit().await.map_err(query_err)?;
        Ok(vacancy.clone())
    }

    async fn get_by_id(&self, id: &VacancyId) -> Result<Option<Vacancy>, RepositoryError> {
        let id = id.to_string();
        let row = sqlx::query("SELECT * FROM vacancies WHERE id = ?")
            .bind(&id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let skills = self.load_skills(&id).await?;
        row_to_vacancy(&row, skills).map(Some)
    }

    async fn update(
        &self,
        vacancy: &Vacancy,
        expected_revision: i64,
        replace_skills: bool,
    ) -> Result<Vacancy, RepositoryError> {
        let id = vacancy.id.to_string();
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let result = sqlx::query(
            "UPDATE vacancies
             SET title = ?, content = ?, status = ?, published_at = ?,
                 skills_matched_percent = ?, revision = ?, updated_at = ?
             WHERE id = ? AND revision = ?",
        )
        .bind(&vacancy.title)
        .bind(&vacancy.content)
        .bind(vacancy.status.to_string())
        .bind(vacancy.published_at.as_ref().map(format_datetime))
        .bind(i64::from(vacancy.skills_matched_percent))
        .bind(vacancy.revision)
        .bind(format_datetime(&vacancy.updated_at))
        .bind(&id)
        .bind(expected_revision)
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        if result.rows_affected() == 0 {
            let exists = sqlx::query("SELECT revision FROM vacancies WHERE id = ?")
                .bind(&id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_err)?;
            return match exists {
                Some(row) => {
                    let stored: i64 = row.try_get("revision").map_err(query_err)?;
                    Err(RepositoryError::Conflict(format!(
                        "vacancy {id} is at revision {stored}, expected {expected_revision}"
                    )))
                }
                None => Err(RepositoryError::NotFound),
            };
        }

        if replace_skills {
            sqlx::query("DELETE FROM vacancy_skills WHERE vacancy_id = ?")
                .bind(&id)
                .execute(&mut *tx)
                .await
                .map_err(query_err)?;
            insert_skills(&mut tx, &id, &vacancy.skill_ids).await?;
        }

        tx.commit().await.map_err(query_err)?;
        Ok(vacancy.clone())
    }

    async fn list_by_sponsor(
        &self,
        sponsor_id: &SponsorId,
        page: PageRequest,
    ) -> Result<Page<Vacancy>, RepositoryError> {
        let count = sqlx::query("SELECT COUNT(*) AS total FROM vacancies WHERE sponsor_id = ?")
            .bind(sponsor_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_err)?;
        let total: i64 = count.try_get("total").map_err(query_err)?;

        let rows = sqlx::query(
            "SELECT * FROM vacancies WHERE sponsor_id = ?
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(sponsor_id.to_string())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        Ok(Page::new(self.hydrate(rows).await?, page, total))
    }

    async fn list_by_status(
        &self,
        status: VacancyStatus,
        page: PageRequest,
    ) -> Result<Page<Vacancy>, RepositoryError> {
        let count = sqlx::query("SELECT COUNT(*) AS total FROM vacancies WHERE status = ?")
            .bind(status.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_err)?;
        let total: i64 = count.try_get("total").map_err(query_err)?;

        let rows = sqlx::query(
            "SELECT * FROM vacancies WHERE status = ?
             ORDER BY published_at DESC, created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(status.to_string())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        Ok(Page::new(self.hydrate(rows).await?, page, total))
    }
}
