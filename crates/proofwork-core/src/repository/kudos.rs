//! Kudos ledger repository trait definition.

use chrono::{DateTime, Utc};
use proofwork_types::error::RepositoryError;
use proofwork_types::kudos::{
    KudosHistoryEntry, KudosHistoryId, KudosHistoryItem, KudosLine, KudosReceipt, KudosedProof,
    KudosedProofOrder, SkillKudosHistoryEntry, SkillKudosTotal,
};
use proofwork_types::page::{Page, PageRequest};
use proofwork_types::proof::ProofId;
use proofwork_types::sponsor::SponsorId;

/// A validated kudos submission ready to be written.
#[derive(Debug, Clone)]
pub struct KudosPosting {
    pub history_id: KudosHistoryId,
    pub sponsor_id: SponsorId,
    pub proof_id: ProofId,
    pub lines: Vec<KudosLine>,
    /// Sum of `lines[*].amount`.
    pub total: i64,
    pub sent_at: DateTime<Utc>,
}

/// Outcome of an atomic ledger write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// All rows were written and the balance decremented.
    Accepted(KudosReceipt),
    /// The balance check inside the write failed; nothing was written.
    InsufficientBalance { balance: i64 },
}

/// Repository trait for the append-only kudos ledger and its caches.
pub trait KudosRepository: Send + Sync {
    /// Apply a posting as one atomic unit.
    ///
    /// Implementations must perform the balance check and decrement, the
    /// history inserts, and the SkillKudos upserts inside a single
    /// transaction, so that concurrent postings by the same sponsor never
    /// observe the same balance. Returns `NotFound` when the sponsor row is
    /// missing.
    fn post(
        &self,
        posting: &KudosPosting,
    ) -> impl std::future::Future<Output = Result<PostOutcome, RepositoryError>> + Send;

    /// True if at least one history entry exists for the pair.
    fn has_endorsed(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Sum of the SkillKudos cache rows for a proof.
    fn cached_total(
        &self,
        proof_id: &ProofId,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Sum of the skill history rows for a proof (recomputed from the log).
    fn ledger_total(
        &self,
        proof_id: &ProofId,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Per-skill cache rows for a proof, highest first.
    fn skill_totals(
        &self,
        proof_id: &ProofId,
    ) -> impl std::future::Future<Output = Result<Vec<SkillKudosTotal>, RepositoryError>> + Send;

    /// Per-skill sums over one sponsor's history on a proof, highest first.
    fn sponsor_skill_breakdown(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> impl std::future::Future<Output = Result<Vec<SkillKudosTotal>, RepositoryError>> + Send;

    /// Lifetime sum of one sponsor's submissions on a proof.
    fn sponsor_total(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// One sponsor's submissions on a proof, newest first.
    fn history(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
        page: PageRequest,
    ) -> impl std::future::Future<Output = Result<Page<KudosHistoryItem>, RepositoryError>> + Send;

    /// Proofs the sponsor has endorsed, with the sponsor's lifetime sum on each.
    fn kudosed_proofs(
        &self,
        sponsor_id: &SponsorId,
        order: KudosedProofOrder,
        page: PageRequest,
    ) -> impl std::future::Future<Output = Result<Page<KudosedProof>, RepositoryError>> + Send;

    /// Full history entries for a (sponsor, proof) pair, oldest first.
    fn entries(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> impl std::future::Future<Output = Result<Vec<KudosHistoryEntry>, RepositoryError>> + Send;

    /// Skill rows of one history entry.
    fn skill_entries(
        &self,
        history_id: &KudosHistoryId,
    ) -> impl std::future::Future<Output = Result<Vec<SkillKudosHistoryEntry>, RepositoryError>> + Send;
}
