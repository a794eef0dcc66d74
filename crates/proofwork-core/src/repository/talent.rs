//! Talent repository trait definition.

use proofwork_types::error::RepositoryError;
use proofwork_types::skill::SkillId;
use proofwork_types::talent::{Talent, TalentId};

/// Repository trait for talent accounts and their declared skill set.
pub trait TalentRepository: Send + Sync {
    fn create(
        &self,
        talent: &Talent,
    ) -> impl std::future::Future<Output = Result<Talent, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &TalentId,
    ) -> impl std::future::Future<Output = Result<Option<Talent>, RepositoryError>> + Send;

    /// Replace the talent's skill set.
    fn set_skills(
        &self,
        id: &TalentId,
        skill_ids: &[SkillId],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn skill_ids(
        &self,
        id: &TalentId,
    ) -> impl std::future::Future<Output = Result<Vec<SkillId>, RepositoryError>> + Send;
}
