//! Vacancy repository trait definition.

use proofwork_types::error::RepositoryError;
use proofwork_types::page::{Page, PageRequest};
use proofwork_types::sponsor::SponsorId;
use proofwork_types::vacancy::{Vacancy, VacancyId, VacancyStatus};

/// Repository trait for vacancy persistence including the skill binding.
pub trait VacancyRepository: Send + Sync {
    /// Insert the vacancy row and its skill bindings in one transaction.
    fn create(
        &self,
        vacancy: &Vacancy,
    ) -> impl std::future::Future<Output = Result<Vacancy, RepositoryError>> + Send;

    /// Load a vacancy with its bound skill ids.
    fn get_by_id(
        &self,
        id: &VacancyId,
    ) -> impl std::future::Future<Output = Result<Option<Vacancy>, RepositoryError>> + Send;

    /// Write `vacancy` if the stored revision still equals `expected_revision`.
    ///
    /// When `replace_skills` is true the old bindings are deleted before the
    /// new ones are inserted, in the same transaction as the row update.
    /// Returns `Conflict` on a revision mismatch and `NotFound` when the
    /// vacancy does not exist.
    fn update(
        &self,
        vacancy: &Vacancy,
        expected_revision: i64,
        replace_skills: bool,
    ) -> impl std::future::Future<Output = Result<Vacancy, RepositoryError>> + Send;

    /// A sponsor's vacancies, newest first.
    fn list_by_sponsor(
        &self,
        sponsor_id: &SponsorId,
        page: PageRequest,
    ) -> impl std::future::Future<Output = Result<Page<Vacancy>, RepositoryError>> + Send;

    /// Vacancies in one status, most recently published first.
    fn list_by_status(
        &self,
        status: VacancyStatus,
        page: PageRequest,
    ) -> impl std::future::Future<Output = Result<Page<Vacancy>, RepositoryError>> + Send;
}
