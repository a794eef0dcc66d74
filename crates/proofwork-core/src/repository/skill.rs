//! Skill catalog repository trait definition.

use proofwork_types::error::RepositoryError;
use proofwork_types::skill::{Skill, SkillId};

/// Repository trait for the skill catalog.
///
/// Implementations live in proofwork-infra (e.g., SqliteSkillRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait SkillRepository: Send + Sync {
    /// Insert a new skill. Fails with `Conflict` when the name is taken.
    fn create(
        &self,
        skill: &Skill,
    ) -> impl std::future::Future<Output = Result<Skill, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &SkillId,
    ) -> impl std::future::Future<Output = Result<Option<Skill>, RepositoryError>> + Send;

    /// Case-insensitive lookup by name.
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Skill>, RepositoryError>> + Send;

    /// Return the subset of `ids` that exist, in no particular order.
    fn find_by_ids(
        &self,
        ids: &[SkillId],
    ) -> impl std::future::Future<Output = Result<Vec<Skill>, RepositoryError>> + Send;

    /// All skills ordered by name.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Skill>, RepositoryError>> + Send;
}
