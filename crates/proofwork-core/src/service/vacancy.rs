//! Vacancy lifecycle service.
//!
//! Validates requests, runs the transition table from [`crate::lifecycle`],
//! and writes the result with an optimistic revision check so concurrent
//! modifications of one vacancy are linearized.

use chrono::Utc;
use proofwork_types::error::{RepositoryError, VacancyError};
use proofwork_types::page::{Page, PageRequest};
use proofwork_types::principal::{Principal, Role};
use proofwork_types::skill::SkillId;
use proofwork_types::sponsor::{Sponsor, SponsorId, SponsorSummary};
use proofwork_types::vacancy::{
    CreateVacancyRequest, MAX_SKILLS_MATCHED_PERCENT, MAX_VACANCY_TITLE_LEN,
    MIN_SKILLS_MATCHED_PERCENT, ModifyVacancyRequest, Vacancy, VacancyDetail, VacancyId,
    VacancyStatus,
};

use crate::lifecycle::{self, VacancyEdit};
use crate::repository::skill::SkillRepository;
use crate::repository::sponsor::SponsorRepository;
use crate::repository::vacancy::VacancyRepository;
use crate::service::skill::SkillCatalog;

/// Service owning vacancy creation, reads, and transitions.
pub struct VacancyLifecycle<V, C, S>
where
    V: VacancyRepository,
    C: SkillRepository,
    S: SponsorRepository,
{
    vacancy_repo: V,
    skills: SkillCatalog<C>,
    sponsor_repo: S,
    default_match_percent: u8,
}

impl<V, C, S> VacancyLifecycle<V, C, S>
where
    V: VacancyRepository,
    C: SkillRepository,
    S: SponsorRepository,
{
    pub fn new(
        vacancy_repo: V,
        skills: SkillCatalog<C>,
        sponsor_repo: S,
        default_match_percent: u8,
    ) -> Self {
        Self {
            vacancy_repo,
            skills,
            sponsor_repo,
            default_match_percent,
        }
    }

    /// Create a vacancy owned by the calling sponsor.
    pub async fn create_vacancy(
        &self,
        principal: &Principal,
        request: CreateVacancyRequest,
    ) -> Result<VacancyDetail, VacancyError> {
        let sponsor_id = principal.as_sponsor().ok_or_else(|| {
            VacancyError::UnrelatedContent("only sponsors can create vacancies".to_string())
        })?;

        let status = lifecycle::initial_status(request.status)?;
        let (title, content) = validate_fields(&request.title, &request.content)?;
        let match_percent = request
            .skills_matched_percent
            .unwrap_or(self.default_match_percent);
        validate_match_percent(match_percent)?;

        let skills = self.skills.resolve(&request.skill_ids).await?;
        lifecycle::check_publish_guard(status, &request.skill_ids)?;

        let author = self.load_sponsor(&sponsor_id).await?;

        let now = Utc::now();
        let vacancy = Vacancy {
            id: VacancyId::new(),
            sponsor_id,
            title,
            content,
            status,
            published_at: (status == VacancyStatus::Published).then_some(now),
            skills_matched_percent: match_percent,
            skill_ids: request.skill_ids,
            revision: 0,
            created_at: now,
            updated_at: now,
        };

        let vacancy = self
            .vacancy_repo
            .create(&vacancy)
            .await
            .map_err(|e| VacancyError::StorageError(e.to_string()))?;

        tracing::info!(
            vacancy_id = %vacancy.id,
            sponsor_id = %sponsor_id,
            status = %vacancy.status,
            skills = vacancy.skill_ids.len(),
            "vacancy created"
        );
        Ok(VacancyDetail::new(vacancy, skills, SponsorSummary::from(&author)))
    }

    /// Vacancy detail with skills and author.
    ///
    /// Non-owners only see PUBLISHED vacancies; anything else reads as
    /// not found.
    pub async fn get_vacancy(
        &self,
        principal: &Principal,
        id: &VacancyId,
    ) -> Result<VacancyDetail, VacancyError> {
        let vacancy = self.load_vacancy(id).await?;
        if vacancy.status != VacancyStatus::Published && !can_manage(principal, &vacancy) {
            return Err(not_found(id));
        }
        tracing::debug!(vacancy_id = %id, status = %vacancy.status, "vacancy read");
        self.detail(vacancy).await
    }

    /// Apply the transition selected by `request.status`.
    ///
    /// A rejected call leaves the stored vacancy exactly as it was.
    pub async fn modify_vacancy(
        &self,
        principal: &Principal,
        id: &VacancyId,
        request: ModifyVacancyRequest,
    ) -> Result<VacancyDetail, VacancyError> {
        let current = self.load_vacancy(id).await?;
        if principal.as_sponsor() != Some(current.sponsor_id) {
            return Err(VacancyError::UnrelatedContent(format!(
                "vacancy '{id}' belongs to another sponsor"
            )));
        }

        let transition = lifecycle::plan_transition(current.status, request.status)?;

        let edit = if transition.replaces_fields() {
            let (title, content) = validate_fields(&request.title, &request.content)?;
            self.skills.resolve(&request.skill_ids).await?;
            lifecycle::check_publish_guard(transition.target(), &request.skill_ids)?;
            VacancyEdit {
                title,
                content,
                skill_ids: request.skill_ids,
            }
        } else {
            VacancyEdit {
                title: current.title.clone(),
                content: current.content.clone(),
                skill_ids: current.skill_ids.clone(),
            }
        };

        let next = lifecycle::apply_transition(&current, transition, edit, Utc::now());
        let stored = self
            .vacancy_repo
            .update(&next, current.revision, transition.replaces_fields())
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => VacancyError::ConcurrentModification(*id),
                RepositoryError::NotFound => not_found(id),
                other => VacancyError::StorageError(other.to_string()),
            })?;

        tracing::info!(
            vacancy_id = %id,
            from = %current.status,
            to = %stored.status,
            ?transition,
            revision = stored.revision,
            "vacancy transitioned"
        );
        self.detail(stored).await
    }

    /// Vacancies of one sponsor, in every status. Visible to that sponsor
    /// and to admins.
    pub async fn list_sponsor_vacancies(
        &self,
        principal: &Principal,
        sponsor_id: &SponsorId,
        page: PageRequest,
    ) -> Result<Page<Vacancy>, VacancyError> {
        let allowed = principal.role == Role::Admin || principal.as_sponsor() == Some(*sponsor_id);
        if !allowed {
            return Err(VacancyError::UnrelatedContent(format!(
                "vacancies of sponsor '{sponsor_id}' are not visible to this caller"
            )));
        }
        self.vacancy_repo
            .list_by_sponsor(sponsor_id, page)
            .await
            .map_err(|e| VacancyError::StorageError(e.to_string()))
    }

    /// Vacancies currently open for submissions.
    pub async fn list_published(&self, page: PageRequest) -> Result<Page<Vacancy>, VacancyError> {
        self.vacancy_repo
            .list_by_status(VacancyStatus::Published, page)
            .await
            .map_err(|e| VacancyError::StorageError(e.to_string()))
    }

    async fn detail(&self, vacancy: Vacancy) -> Result<VacancyDetail, VacancyError> {
        let skills = self.skills.resolve(&vacancy.skill_ids).await?;
        let author = self.load_sponsor(&vacancy.sponsor_id).await?;
        Ok(VacancyDetail::new(vacancy, skills, SponsorSummary::from(&author)))
    }

    async fn load_vacancy(&self, id: &VacancyId) -> Result<Vacancy, VacancyError> {
        self.vacancy_repo
            .get_by_id(id)
            .await
            .map_err(|e| VacancyError::StorageError(e.to_string()))?
            .ok_or_else(|| not_found(id))
    }

    async fn load_sponsor(&self, id: &SponsorId) -> Result<Sponsor, VacancyError> {
        self.sponsor_repo
            .get_by_id(id)
            .await
            .map_err(|e| VacancyError::StorageError(e.to_string()))?
            .ok_or_else(|| VacancyError::NotFound {
                entity: "sponsor",
                id: id.to_string(),
            })
    }
}

fn can_manage(principal: &Principal, vacancy: &Vacancy) -> bool {
    principal.role == Role::Admin || principal.as_sponsor() == Some(vacancy.sponsor_id)
}

fn not_found(id: &VacancyId) -> VacancyError {
    VacancyError::NotFound {
        entity: "vacancy",
        id: id.to_string(),
    }
}

/// Trim and bound-check title and content.
fn validate_fields(title: &str, content: &str) -> Result<(String, String), VacancyError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > MAX_VACANCY_TITLE_LEN {
        return Err(VacancyError::Validation(format!(
            "title must be 1 to {MAX_VACANCY_TITLE_LEN} characters"
        )));
    }
    let content = content.trim();
    if content.is_empty() {
        return Err(VacancyError::Validation(
            "content cannot be empty".to_string(),
        ));
    }
    Ok((title.to_string(), content.to_string()))
}

fn validate_match_percent(percent: u8) -> Result<(), VacancyError> {
    if !(MIN_SKILLS_MATCHED_PERCENT..=MAX_SKILLS_MATCHED_PERCENT).contains(&percent) {
        return Err(VacancyError::Validation(format!(
            "skills matched percent must be between {MIN_SKILLS_MATCHED_PERCENT} and {MAX_SKILLS_MATCHED_PERCENT}, got {percent}"
        )));
    }
    Ok(())
}

/// Skill ids shared by both sets, in `required` order.
pub fn shared_skills(required: &[SkillId], held: &[SkillId]) -> Vec<SkillId> {
    required
        .iter()
        .filter(|id| held.contains(id))
        .copied()
        .collect()
}
