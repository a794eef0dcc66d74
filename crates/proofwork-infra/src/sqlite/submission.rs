//! SQLite submission repository.

use proofwork_core::repository::submission::SubmissionRepository;
use proofwork_types::error::RepositoryError;
use proofwork_types::page::{Page, PageRequest};
use proofwork_types::submission::{Submission, SubmissionId, SubmissionStatus};
use proofwork_types::talent::TalentId;
use proofwork_types::vacancy::VacancyId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_id, query_err};

/// SQLite-backed implementation of `SubmissionRepository`.
pub struct SqliteSubmissionRepository {
    pool: DatabasePool,
}

impl SqliteSubmissionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Page over submissions filtered on one column.
    async fn list_where(
        &self,
        column: &'static str,
        value: String,
        page: PageRequest,
    ) -> Result<Page<Submission>, RepositoryError> {
        let count = sqlx::query(&format!(
            "SELECT COUNT(*) AS total FROM submissions WHERE {column} = ?"
        ))
        .bind(&value)
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_err)?;
        let total: i64 = count.try_get("total").map_err(query_err)?;

        let rows = sqlx::query(&format!(
            "SELECT * FROM submissions WHERE {column} = ?
             ORDER BY sent_at DESC, id DESC LIMIT ? OFFSET ?"
        ))
        .bind(&value)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let items = rows
            .iter()
            .map(row_to_submission)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, page, total))
    }
}

fn row_to_submission(row: &sqlx::sqlite::SqliteRow) -> Result<Submission, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_err)?;
    let vacancy_id: String = row.try_get("vacancy_id").map_err(query_err)?;
    let talent_id: String = row.try_get("talent_id").map_err(query_err)?;
    let status: String = row.try_get("status").map_err(query_err)?;
    let sent_at: String = row.try_get("sent_at").map_err(query_err)?;
    let answer_id: Option<String> = row.try_get("answer_id").map_err(query_err)?;

    Ok(Submission {
        id: parse_id(&id, "submission")?,
        vacancy_id: parse_id(&vacancy_id, "vacancy")?,
        talent_id: parse_id(&talent_id, "talent")?,
        contact: row.try_get("contact").map_err(query_err)?,
        message: row.try_get("message").map_err(query_err)?,
        status: status
            .parse::<SubmissionStatus>()
            .map_err(RepositoryError::Query)?,
        sent_at: parse_datetime(&sent_at)?,
        answer_id: answer_id
            .as_deref()
            .map(|raw| parse_id(raw, "answer"))
            .transpose()?,
    })
}

impl SubmissionRepository for SqliteSubmissionRepository {
    async fn create(&self, submission: &Submission) -> Result<Submission, RepositoryError> {
        sqlx::query(
            "INSERT INTO submissions (id, vacancy_id, talent_id, contact, message, status, sent_at, answer_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(submission.id.to_string())
        .bind(submission.vacancy_id.to_string())
        .bind(submission.talent_id.to_string())
        .bind(&submission.contact)
        .bind(&submission.message)
        .bind(submission.status.to_string())
        .bind(format_datetime(&submission.sent_at))
        .bind(submission.answer_id.map(|a| a.to_string()))
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        Ok(submission.clone())
    }

    async fn get_by_id(&self, id: &SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM submissions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        row.as_ref().map(row_to_submission).transpose()
    }

    async fn list_for_vacancy(
        &self,
        vacancy_id: &VacancyId,
        page: PageRequest,
    ) -> Result<Page<Submission>, RepositoryError> {
        self.list_where("vacancy_id", vacancy_id.to_string(), page)
            .await
    }

    async fn list_for_talent(
        &self,
        talent_id: &TalentId,
        page: PageRequest,
    ) -> Result<Page<Submission>, RepositoryError> {
        self.list_where("talent_id", talent_id.to_string(), page)
            .await
    }
}
