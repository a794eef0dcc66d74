//! Account and proof registration.
//!
//! Profile management proper lives outside the platform core. This service
//! covers only what the ledger and the submission guard need to exist:
//! sponsor accounts with a balance, talents with a skill set, and proofs
//! with a publication status.

use chrono::Utc;
use proofwork_types::error::{ProfileError, RepositoryError};
use proofwork_types::principal::{Principal, Role};
use proofwork_types::proof::{CreateProofRequest, Proof, ProofId, ProofStatus};
use proofwork_types::sponsor::{CreateSponsorRequest, Sponsor, SponsorId};
use proofwork_types::talent::{CreateTalentRequest, Talent, TalentId};

use crate::repository::proof::ProofRepository;
use crate::repository::skill::SkillRepository;
use crate::repository::sponsor::SponsorRepository;
use crate::repository::talent::TalentRepository;
use crate::service::skill::SkillCatalog;

pub struct ProfileService<S, T, P, C>
where
    S: SponsorRepository,
    T: TalentRepository,
    P: ProofRepository,
    C: SkillRepository,
{
    sponsor_repo: S,
    talent_repo: T,
    proof_repo: P,
    skills: SkillCatalog<C>,
}

impl<S, T, P, C> ProfileService<S, T, P, C>
where
    S: SponsorRepository,
    T: TalentRepository,
    P: ProofRepository,
    C: SkillRepository,
{
    pub fn new(sponsor_repo: S, talent_repo: T, proof_repo: P, skills: SkillCatalog<C>) -> Self {
        Self {
            sponsor_repo,
            talent_repo,
            proof_repo,
            skills,
        }
    }

    pub async fn register_sponsor(
        &self,
        request: CreateSponsorRequest,
    ) -> Result<Sponsor, ProfileError> {
        let fullname = require_text("fullname", &request.fullname)?;
        if request.kudos < 0 {
            return Err(ProfileError::Validation(
                "opening kudos balance cannot be negative".to_string(),
            ));
        }

        let sponsor = Sponsor {
            id: SponsorId::new(),
            fullname,
            avatar: request.avatar,
            kudos: request.kudos,
            created_at: Utc::now(),
        };
        let sponsor = self.sponsor_repo.create(&sponsor).await.map_err(storage)?;

        tracing::info!(sponsor_id = %sponsor.id, kudos = sponsor.kudos, "sponsor registered");
        Ok(sponsor)
    }

    pub async fn get_sponsor(&self, id: &SponsorId) -> Result<Sponsor, ProfileError> {
        self.sponsor_repo
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| ProfileError::NotFound {
                entity: "sponsor",
                id: id.to_string(),
            })
    }

    /// Register a talent and bind the declared skills.
    pub async fn register_talent(
        &self,
        request: CreateTalentRequest,
    ) -> Result<Talent, ProfileError> {
        let fullname = require_text("fullname", &request.fullname)?;
        self.skills.resolve(&request.skill_ids).await?;

        let talent = Talent {
            id: TalentId::new(),
            fullname,
            avatar: request.avatar,
            created_at: Utc::now(),
        };
        let talent = self.talent_repo.create(&talent).await.map_err(storage)?;
        self.talent_repo
            .set_skills(&talent.id, &request.skill_ids)
            .await
            .map_err(storage)?;

        tracing::info!(
            talent_id = %talent.id,
            skills = request.skill_ids.len(),
            "talent registered"
        );
        Ok(talent)
    }

    /// Register a DRAFT proof owned by the calling talent.
    pub async fn create_proof(
        &self,
        principal: &Principal,
        request: CreateProofRequest,
    ) -> Result<Proof, ProfileError> {
        let talent_id = principal.as_talent().ok_or_else(|| {
            ProfileError::UnrelatedContent("only talents can author proofs".to_string())
        })?;
        let exists = self
            .talent_repo
            .get_by_id(&talent_id)
            .await
            .map_err(storage)?
            .is_some();
        if !exists {
            return Err(ProfileError::NotFound {
                entity: "talent",
                id: talent_id.to_string(),
            });
        }

        let now = Utc::now();
        let proof = Proof {
            id: ProofId::new(),
            talent_id,
            title: require_text("title", &request.title)?,
            summary: require_text("summary", &request.summary)?,
            content: require_text("content", &request.content)?,
            icon: request.icon,
            status: ProofStatus::Draft,
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        let proof = self.proof_repo.create(&proof).await.map_err(storage)?;

        tracing::info!(proof_id = %proof.id, talent_id = %talent_id, "proof created");
        Ok(proof)
    }

    /// Publish or withdraw a proof.
    ///
    /// Withdrawing keeps every existing endorsement; new kudos are refused
    /// until the proof is published again.
    pub async fn set_proof_status(
        &self,
        principal: &Principal,
        id: &ProofId,
        status: ProofStatus,
    ) -> Result<Proof, ProfileError> {
        let mut proof = self
            .proof_repo
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| ProfileError::NotFound {
                entity: "proof",
                id: id.to_string(),
            })?;

        if principal.role != Role::Admin && principal.as_talent() != Some(proof.talent_id) {
            return Err(ProfileError::UnrelatedContent(format!(
                "proof '{id}' belongs to another talent"
            )));
        }
        if proof.status == status {
            return Ok(proof);
        }

        let now = Utc::now();
        if status == ProofStatus::Published && proof.published_at.is_none() {
            proof.published_at = Some(now);
        }
        let from = proof.status;
        proof.status = status;
        proof.updated_at = now;

        let proof = self.proof_repo.update(&proof).await.map_err(|e| match e {
            RepositoryError::NotFound => ProfileError::NotFound {
                entity: "proof",
                id: id.to_string(),
            },
            other => storage(other),
        })?;

        tracing::info!(proof_id = %id, %from, to = %status, "proof status changed");
        Ok(proof)
    }
}

fn require_text(field: &str, value: &str) -> Result<String, ProfileError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ProfileError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

fn storage(e: RepositoryError) -> ProfileError {
    ProfileError::StorageError(e.to_string())
}
