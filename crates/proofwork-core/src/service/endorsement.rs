//! Read-side aggregation over the kudos ledger.
//!
//! Nothing here writes. Totals come from the SkillKudos cache; the ledger
//! (history) path exists so the cache can be checked against its source.

use proofwork_types::error::KudosError;
use proofwork_types::kudos::{
    KudosHistoryItem, KudosTotalsReport, KudosedProof, KudosedProofOrder, ProofKudosSummary,
    SkillKudosTotal,
};
use proofwork_types::page::{Page, PageRequest};
use proofwork_types::principal::{Principal, Role};
use proofwork_types::proof::{Proof, ProofId};
use proofwork_types::sponsor::SponsorId;

use crate::repository::kudos::KudosRepository;
use crate::repository::proof::ProofRepository;

/// Service computing proof totals and sponsor-facing endorsement views.
pub struct ProofEndorsement<K: KudosRepository, P: ProofRepository> {
    kudos_repo: K,
    proof_repo: P,
}

impl<K: KudosRepository, P: ProofRepository> ProofEndorsement<K, P> {
    pub fn new(kudos_repo: K, proof_repo: P) -> Self {
        Self {
            kudos_repo,
            proof_repo,
        }
    }

    /// Total kudos the proof received, from the cache.
    pub async fn total_kudos(&self, proof_id: &ProofId) -> Result<i64, KudosError> {
        self.ensure_proof(proof_id).await?;
        self.kudos_repo
            .cached_total(proof_id)
            .await
            .map_err(storage)
    }

    /// Total kudos the proof received, recomputed from skill history rows.
    pub async fn ledger_total(&self, proof_id: &ProofId) -> Result<i64, KudosError> {
        self.ensure_proof(proof_id).await?;
        self.kudos_repo
            .ledger_total(proof_id)
            .await
            .map_err(storage)
    }

    /// Compare the cached total against the ledger-derived one.
    pub async fn verify_totals(&self, proof_id: &ProofId) -> Result<KudosTotalsReport, KudosError> {
        self.ensure_proof(proof_id).await?;
        let cached = self
            .kudos_repo
            .cached_total(proof_id)
            .await
            .map_err(storage)?;
        let ledger = self
            .kudos_repo
            .ledger_total(proof_id)
            .await
            .map_err(storage)?;

        let report = KudosTotalsReport {
            proof_id: *proof_id,
            cached,
            ledger,
        };
        if !report.is_consistent() {
            tracing::warn!(
                proof_id = %proof_id,
                cached,
                ledger,
                "skill kudos cache disagrees with ledger"
            );
        }
        Ok(report)
    }

    /// Per-skill cache rows for a proof, highest first.
    pub async fn proof_skill_totals(
        &self,
        proof_id: &ProofId,
    ) -> Result<Vec<SkillKudosTotal>, KudosError> {
        self.ensure_proof(proof_id).await?;
        self.kudos_repo
            .skill_totals(proof_id)
            .await
            .map_err(storage)
    }

    /// Totals, per-skill rows, and the caller's endorsement flag in one view.
    pub async fn summary(
        &self,
        principal: &Principal,
        proof_id: &ProofId,
    ) -> Result<ProofKudosSummary, KudosError> {
        self.ensure_proof(proof_id).await?;
        let total_kudos = self
            .kudos_repo
            .cached_total(proof_id)
            .await
            .map_err(storage)?;
        let skills = self
            .kudos_repo
            .skill_totals(proof_id)
            .await
            .map_err(storage)?;
        let kudosed_by_me = match principal.as_sponsor() {
            Some(sponsor_id) => self
                .kudos_repo
                .has_endorsed(&sponsor_id, proof_id)
                .await
                .map_err(storage)?,
            None => false,
        };

        tracing::debug!(proof_id = %proof_id, total_kudos, "proof kudos summary");
        Ok(ProofKudosSummary {
            proof_id: *proof_id,
            total_kudos,
            skills,
            kudosed_by_me,
        })
    }

    /// What `sponsor_id` endorsed on the proof, per skill.
    pub async fn skill_breakdown(
        &self,
        principal: &Principal,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> Result<Vec<SkillKudosTotal>, KudosError> {
        ensure_sponsor_access(principal, sponsor_id)?;
        self.ensure_proof(proof_id).await?;
        self.kudos_repo
            .sponsor_skill_breakdown(sponsor_id, proof_id)
            .await
            .map_err(storage)
    }

    /// A sponsor's submissions on a proof, newest first.
    pub async fn history(
        &self,
        principal: &Principal,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
        page: PageRequest,
    ) -> Result<Page<KudosHistoryItem>, KudosError> {
        ensure_sponsor_access(principal, sponsor_id)?;
        self.ensure_proof(proof_id).await?;
        self.kudos_repo
            .history(sponsor_id, proof_id, page)
            .await
            .map_err(storage)
    }

    /// Proofs the sponsor has endorsed, each with the sponsor's lifetime sum.
    pub async fn ranked_proofs(
        &self,
        principal: &Principal,
        sponsor_id: &SponsorId,
        page: PageRequest,
        order: KudosedProofOrder,
    ) -> Result<Page<KudosedProof>, KudosError> {
        ensure_sponsor_access(principal, sponsor_id)?;
        self.kudos_repo
            .kudosed_proofs(sponsor_id, order, page)
            .await
            .map_err(storage)
    }

    async fn ensure_proof(&self, proof_id: &ProofId) -> Result<Proof, KudosError> {
        self.proof_repo
            .get_by_id(proof_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| KudosError::NotFound {
                entity: "proof",
                id: proof_id.to_string(),
            })
    }
}

/// Sponsor-scoped views are readable by that sponsor and by admins.
pub fn ensure_sponsor_access(
    principal: &Principal,
    sponsor_id: &SponsorId,
) -> Result<(), KudosError> {
    match principal.role {
        Role::Admin => Ok(()),
        Role::Sponsor if principal.id == sponsor_id.as_uuid() => Ok(()),
        _ => Err(KudosError::UnrelatedContent(format!(
            "kudos of sponsor '{sponsor_id}' are not visible to this caller"
        ))),
    }
}

fn storage(e: proofwork_types::error::RepositoryError) -> KudosError {
    KudosError::StorageError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::kudos::KudosLedger;
    use crate::service::skill::SkillCatalog;
    use crate::testing::InMemoryStore;
    use proofwork_types::kudos::{DEFAULT_MAX_KUDOS_LINES, KudosLine};
    use proofwork_types::proof::ProofStatus;
    use proofwork_types::skill::Skill;
    use proofwork_types::sponsor::Sponsor;

    struct Fixture {
        store: InMemoryStore,
        ledger: KudosLedger<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore>,
        reads: ProofEndorsement<InMemoryStore, InMemoryStore>,
        rust: Skill,
        sql: Skill,
    }

    fn fixture() -> Fixture {
        let store = InMemoryStore::new();
        let rust = store.seed_skill("Rust");
        let sql = store.seed_skill("SQL");
        Fixture {
            ledger: KudosLedger::new(
                store.clone(),
                store.clone(),
                store.clone(),
                SkillCatalog::new(store.clone()),
                DEFAULT_MAX_KUDOS_LINES,
            ),
            reads: ProofEndorsement::new(store.clone(), store.clone()),
            store,
            rust,
            sql,
        }
    }

    async fn post(f: &Fixture, sponsor: &Sponsor, proof: &ProofId, lines: &[KudosLine]) {
        f.ledger
            .post_kudos(&Principal::sponsor(sponsor.id), proof, lines)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_total_matches_ledger_after_each_post() {
        let f = fixture();
        let proof = f.store.seed_proof(ProofStatus::Published);
        let alice = f.store.seed_sponsor(500);
        let bob = f.store.seed_sponsor(500);

        let postings = [
            (&alice, vec![KudosLine::new(f.rust.id, 30), KudosLine::new(f.sql.id, 20)]),
            (&bob, vec![KudosLine::new(f.rust.id, 5)]),
            (&alice, vec![KudosLine::new(f.sql.id, 45)]),
        ];
        for (sponsor, lines) in &postings {
            post(&f, sponsor, &proof.id, lines).await;
            let report = f.reads.verify_totals(&proof.id).await.unwrap();
            assert!(report.is_consistent(), "drift after posting: {report:?}");
        }

        assert_eq!(f.reads.total_kudos(&proof.id).await.unwrap(), 100);
        assert_eq!(f.reads.ledger_total(&proof.id).await.unwrap(), 100);

        let totals = f.reads.proof_skill_totals(&proof.id).await.unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].skill_name, "SQL");
        assert_eq!(totals[0].kudos, 65);
        assert_eq!(totals[1].kudos, 35);
    }

    #[tokio::test]
    async fn test_verify_totals_detects_drift() {
        let f = fixture();
        let proof = f.store.seed_proof(ProofStatus::Published);
        let sponsor = f.store.seed_sponsor(100);
        post(&f, &sponsor, &proof.id, &[KudosLine::new(f.rust.id, 10)]).await;

        f.store.corrupt_cache(proof.id, f.rust.id, 99);
        let report = f.reads.verify_totals(&proof.id).await.unwrap();
        assert_eq!(report.cached, 99);
        assert_eq!(report.ledger, 10);
        assert!(!report.is_consistent());
    }

    #[tokio::test]
    async fn test_skill_breakdown_is_restricted_to_sponsor() {
        let f = fixture();
        let proof = f.store.seed_proof(ProofStatus::Published);
        let alice = f.store.seed_sponsor(100);
        let bob = f.store.seed_sponsor(100);
        post(&f, &alice, &proof.id, &[KudosLine::new(f.rust.id, 10)]).await;
        post(&f, &bob, &proof.id, &[KudosLine::new(f.sql.id, 40)]).await;
        post(&f, &alice, &proof.id, &[KudosLine::new(f.rust.id, 7)]).await;

        let mine = f
            .reads
            .skill_breakdown(&Principal::sponsor(alice.id), &alice.id, &proof.id)
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].skill_id, f.rust.id);
        assert_eq!(mine[0].kudos, 17);

        let err = f
            .reads
            .skill_breakdown(&Principal::sponsor(bob.id), &alice.id, &proof.id)
            .await
            .unwrap_err();
        assert!(matches!(err, KudosError::UnrelatedContent(_)));
    }

    #[tokio::test]
    async fn test_history_is_reverse_chronological_and_paged() {
        let f = fixture();
        let proof = f.store.seed_proof(ProofStatus::Published);
        let sponsor = f.store.seed_sponsor(100);
        for amount in [1, 2, 3] {
            post(&f, &sponsor, &proof.id, &[KudosLine::new(f.rust.id, amount)]).await;
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let principal = Principal::sponsor(sponsor.id);
        let first = f
            .reads
            .history(&principal, &sponsor.id, &proof.id, PageRequest::new(0, 2))
            .await
            .unwrap();
        assert_eq!(first.total, 3);
        let amounts: Vec<i64> = first.items.iter().map(|h| h.kudos).collect();
        assert_eq!(amounts, vec![3, 2]);

        let second = f
            .reads
            .history(&principal, &sponsor.id, &proof.id, PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].kudos, 1);
    }

    #[tokio::test]
    async fn test_ranked_proofs_orders() {
        let f = fixture();
        let sponsor = f.store.seed_sponsor(1_000);
        let small = f.store.seed_proof(ProofStatus::Published);
        let large = f.store.seed_proof(ProofStatus::Published);

        post(&f, &sponsor, &large.id, &[KudosLine::new(f.rust.id, 90)]).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        post(&f, &sponsor, &small.id, &[KudosLine::new(f.rust.id, 5)]).await;

        let principal = Principal::sponsor(sponsor.id);
        let newest = f
            .reads
            .ranked_proofs(&principal, &sponsor.id, PageRequest::new(0, 10), KudosedProofOrder::Newest)
            .await
            .unwrap();
        assert_eq!(newest.items[0].proof_id, small.id);

        let by_total = f
            .reads
            .ranked_proofs(
                &principal,
                &sponsor.id,
                PageRequest::new(0, 10),
                KudosedProofOrder::TotalKudos,
            )
            .await
            .unwrap();
        assert_eq!(by_total.items[0].proof_id, large.id);
        assert_eq!(by_total.items[0].total_kudos_from_sponsor, 90);
        assert_eq!(by_total.total, 2);
    }

    #[tokio::test]
    async fn test_summary_flags_callers_endorsement() {
        let f = fixture();
        let proof = f.store.seed_proof(ProofStatus::Published);
        let alice = f.store.seed_sponsor(100);
        let bob = f.store.seed_sponsor(100);
        post(&f, &alice, &proof.id, &[KudosLine::new(f.rust.id, 30)]).await;

        let for_alice = f
            .reads
            .summary(&Principal::sponsor(alice.id), &proof.id)
            .await
            .unwrap();
        assert!(for_alice.kudosed_by_me);
        assert_eq!(for_alice.total_kudos, 30);

        let for_bob = f
            .reads
            .summary(&Principal::sponsor(bob.id), &proof.id)
            .await
            .unwrap();
        assert!(!for_bob.kudosed_by_me);
    }

    #[tokio::test]
    async fn test_unknown_proof_is_not_found() {
        let f = fixture();
        let err = f.reads.total_kudos(&ProofId::new()).await.unwrap_err();
        assert!(matches!(err, KudosError::NotFound { entity: "proof", .. }));
    }

    #[test]
    fn test_admin_may_read_any_sponsor() {
        let sponsor_id = SponsorId::new();
        let admin = Principal {
            id: uuid::Uuid::now_v7(),
            role: Role::Admin,
        };
        assert!(ensure_sponsor_access(&admin, &sponsor_id).is_ok());
        assert!(ensure_sponsor_access(&Principal::sponsor(sponsor_id), &sponsor_id).is_ok());
        assert!(ensure_sponsor_access(&Principal::sponsor(SponsorId::new()), &sponsor_id).is_err());
    }
}
