//! Proof repository trait definition.

use proofwork_types::error::RepositoryError;
use proofwork_types::proof::{Proof, ProofId};

/// Repository trait for proof persistence.
///
/// Proof authoring is owned by an external collaborator; the core only reads
/// proofs and records status changes made through the CLI.
pub trait ProofRepository: Send + Sync {
    fn create(
        &self,
        proof: &Proof,
    ) -> impl std::future::Future<Output = Result<Proof, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &ProofId,
    ) -> impl std::future::Future<Output = Result<Option<Proof>, RepositoryError>> + Send;

    /// Update an existing proof. Returns `NotFound` when it does not exist.
    fn update(
        &self,
        proof: &Proof,
    ) -> impl std::future::Future<Output = Result<Proof, RepositoryError>> + Send;
}
