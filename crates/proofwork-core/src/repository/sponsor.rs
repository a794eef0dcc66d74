//! Sponsor repository trait definition.

use proofwork_types::error::RepositoryError;
use proofwork_types::sponsor::{Sponsor, SponsorId};

/// Repository trait for sponsor accounts and their kudos balance.
///
/// Balance decrements happen only inside `KudosRepository::post`; this trait
/// exposes the administrative top-up.
pub trait SponsorRepository: Send + Sync {
    fn create(
        &self,
        sponsor: &Sponsor,
    ) -> impl std::future::Future<Output = Result<Sponsor, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &SponsorId,
    ) -> impl std::future::Future<Output = Result<Option<Sponsor>, RepositoryError>> + Send;

    /// Add `amount` to the balance. Returns the new balance.
    fn increase_kudos(
        &self,
        id: &SponsorId,
        amount: i64,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}
