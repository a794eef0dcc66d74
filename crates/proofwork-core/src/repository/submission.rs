//! Submission repository trait definition.

use proofwork_types::error::RepositoryError;
use proofwork_types::page::{Page, PageRequest};
use proofwork_types::submission::{Submission, SubmissionId};
use proofwork_types::talent::TalentId;
use proofwork_types::vacancy::VacancyId;

/// Repository trait for vacancy submissions.
pub trait SubmissionRepository: Send + Sync {
    fn create(
        &self,
        submission: &Submission,
    ) -> impl std::future::Future<Output = Result<Submission, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &SubmissionId,
    ) -> impl std::future::Future<Output = Result<Option<Submission>, RepositoryError>> + Send;

    /// Submissions for a vacancy, newest first.
    fn list_for_vacancy(
        &self,
        vacancy_id: &VacancyId,
        page: PageRequest,
    ) -> impl std::future::Future<Output = Result<Page<Submission>, RepositoryError>> + Send;

    /// Submissions sent by a talent, newest first.
    fn list_for_talent(
        &self,
        talent_id: &TalentId,
        page: PageRequest,
    ) -> impl std::future::Future<Output = Result<Page<Submission>, RepositoryError>> + Send;
}
