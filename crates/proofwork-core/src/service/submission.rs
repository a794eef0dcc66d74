//! Talent responses to published vacancies.

use chrono::Utc;
use proofwork_types::error::SubmissionError;
use proofwork_types::page::{Page, PageRequest};
use proofwork_types::principal::{Principal, Role};
use proofwork_types::skill::SkillId;
use proofwork_types::submission::{
    CreateSubmissionRequest, Submission, SubmissionId, SubmissionStatus,
};
use proofwork_types::talent::TalentId;
use proofwork_types::vacancy::{Vacancy, VacancyId, VacancyStatus};

use crate::repository::submission::SubmissionRepository;
use crate::repository::talent::TalentRepository;
use crate::repository::vacancy::VacancyRepository;
use crate::service::vacancy::shared_skills;

/// Service enforcing the submission creation guard and exposing reads.
///
/// Status changes after creation belong to the answer collaborator.
pub struct SubmissionLink<Sub, V, T>
where
    Sub: SubmissionRepository,
    V: VacancyRepository,
    T: TalentRepository,
{
    submission_repo: Sub,
    vacancy_repo: V,
    talent_repo: T,
}

impl<Sub, V, T> SubmissionLink<Sub, V, T>
where
    Sub: SubmissionRepository,
    V: VacancyRepository,
    T: TalentRepository,
{
    pub fn new(submission_repo: Sub, vacancy_repo: V, talent_repo: T) -> Self {
        Self {
            submission_repo,
            vacancy_repo,
            talent_repo,
        }
    }

    pub async fn create_submission(
        &self,
        principal: &Principal,
        vacancy_id: &VacancyId,
        request: CreateSubmissionRequest,
    ) -> Result<Submission, SubmissionError> {
        let talent_id = principal.as_talent().ok_or_else(|| {
            SubmissionError::UnrelatedContent("only talents can respond to vacancies".to_string())
        })?;

        let contact = request.contact.trim();
        let message = request.message.trim();
        if contact.is_empty() || message.is_empty() {
            return Err(SubmissionError::Validation(
                "contact and message are required".to_string(),
            ));
        }

        let vacancy = self.load_vacancy(vacancy_id).await?;
        if vacancy.status != VacancyStatus::Published {
            return Err(SubmissionError::VacancyNotPublished(vacancy.status));
        }

        let talent_skills = self
            .talent_repo
            .skill_ids(&talent_id)
            .await
            .map_err(|e| SubmissionError::StorageError(e.to_string()))?;
        let actual = skill_match_percent(&vacancy.skill_ids, &talent_skills);
        if actual < vacancy.skills_matched_percent {
            tracing::warn!(
                vacancy_id = %vacancy_id,
                talent_id = %talent_id,
                required = vacancy.skills_matched_percent,
                actual,
                "submission rejected: skill match too low"
            );
            return Err(SubmissionError::SkillMatchTooLow {
                required: vacancy.skills_matched_percent,
                actual,
            });
        }

        let submission = Submission {
            id: SubmissionId::new(),
            vacancy_id: *vacancy_id,
            talent_id,
            contact: contact.to_string(),
            message: message.to_string(),
            status: SubmissionStatus::Pending,
            sent_at: Utc::now(),
            answer_id: None,
        };
        let submission = self
            .submission_repo
            .create(&submission)
            .await
            .map_err(|e| SubmissionError::StorageError(e.to_string()))?;

        tracing::info!(
            submission_id = %submission.id,
            vacancy_id = %vacancy_id,
            talent_id = %talent_id,
            match_percent = actual,
            "submission created"
        );
        Ok(submission)
    }

    /// Readable by the submitting talent and the vacancy owner.
    pub async fn get_submission(
        &self,
        principal: &Principal,
        id: &SubmissionId,
    ) -> Result<Submission, SubmissionError> {
        let submission = self
            .submission_repo
            .get_by_id(id)
            .await
            .map_err(|e| SubmissionError::StorageError(e.to_string()))?
            .ok_or_else(|| SubmissionError::NotFound {
                entity: "submission",
                id: id.to_string(),
            })?;

        if principal.role == Role::Admin || principal.as_talent() == Some(submission.talent_id) {
            return Ok(submission);
        }
        let vacancy = self.load_vacancy(&submission.vacancy_id).await?;
        if principal.as_sponsor() == Some(vacancy.sponsor_id) {
            return Ok(submission);
        }
        Err(SubmissionError::UnrelatedContent(format!(
            "submission '{id}' is not visible to this caller"
        )))
    }

    /// Submissions on a vacancy, for its owner.
    pub async fn list_for_vacancy(
        &self,
        principal: &Principal,
        vacancy_id: &VacancyId,
        page: PageRequest,
    ) -> Result<Page<Submission>, SubmissionError> {
        let vacancy = self.load_vacancy(vacancy_id).await?;
        if principal.role != Role::Admin && principal.as_sponsor() != Some(vacancy.sponsor_id) {
            return Err(SubmissionError::UnrelatedContent(format!(
                "vacancy '{vacancy_id}' belongs to another sponsor"
            )));
        }
        self.submission_repo
            .list_for_vacancy(vacancy_id, page)
            .await
            .map_err(|e| SubmissionError::StorageError(e.to_string()))
    }

    /// A talent's own submissions.
    pub async fn list_for_talent(
        &self,
        principal: &Principal,
        talent_id: &TalentId,
        page: PageRequest,
    ) -> Result<Page<Submission>, SubmissionError> {
        if principal.role != Role::Admin && principal.as_talent() != Some(*talent_id) {
            return Err(SubmissionError::UnrelatedContent(
                "submissions are only visible to their author".to_string(),
            ));
        }
        self.submission_repo
            .list_for_talent(talent_id, page)
            .await
            .map_err(|e| SubmissionError::StorageError(e.to_string()))
    }

    async fn load_vacancy(&self, id: &VacancyId) -> Result<Vacancy, SubmissionError> {
        self.vacancy_repo
            .get_by_id(id)
            .await
            .map_err(|e| SubmissionError::StorageError(e.to_string()))?
            .ok_or_else(|| SubmissionError::NotFound {
                entity: "vacancy",
                id: id.to_string(),
            })
    }
}

/// Share of `required` the talent holds, as a floored percentage.
///
/// An empty requirement is fully matched.
pub fn skill_match_percent(required: &[SkillId], held: &[SkillId]) -> u8 {
    if required.is_empty() {
        return 100;
    }
    let shared = shared_skills(required, held).len();
    // shared <= required.len(), so the quotient is at most 100.
    u8::try_from(shared * 100 / required.len()).unwrap_or(100)
}
