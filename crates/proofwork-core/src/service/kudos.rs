//! Kudos ledger service.
//!
//! A sponsor spends kudos on the skills a talent demonstrated in a published
//! proof. Every check that can reject a submission runs before the write, and
//! the write itself (balance decrement, history rows, cache upserts) is a
//! single repository call that the storage layer executes atomically.

use proofwork_types::error::{KudosError, RepositoryError};
use proofwork_types::kudos::{KudosHistoryId, KudosLine, KudosReceipt};
use proofwork_types::principal::Principal;
use proofwork_types::proof::{Proof, ProofId};
use proofwork_types::skill::SkillId;
use proofwork_types::sponsor::{Sponsor, SponsorId};

use crate::repository::kudos::{KudosPosting, KudosRepository, PostOutcome};
use crate::repository::proof::ProofRepository;
use crate::repository::skill::SkillRepository;
use crate::repository::sponsor::SponsorRepository;
use crate::service::skill::SkillCatalog;

/// Service recording kudos submissions and sponsor balances.
pub struct KudosLedger<K, P, S, C>
where
    K: KudosRepository,
    P: ProofRepository,
    S: SponsorRepository,
    C: SkillRepository,
{
    kudos_repo: K,
    proof_repo: P,
    sponsor_repo: S,
    skills: SkillCatalog<C>,
    max_lines: usize,
}

impl<K, P, S, C> KudosLedger<K, P, S, C>
where
    K: KudosRepository,
    P: ProofRepository,
    S: SponsorRepository,
    C: SkillRepository,
{
    /// Create a new ledger.
    ///
    /// - `max_lines`: cap on skill lines per submission (`max_kudos_lines`)
    pub fn new(
        kudos_repo: K,
        proof_repo: P,
        sponsor_repo: S,
        skills: SkillCatalog<C>,
        max_lines: usize,
    ) -> Self {
        Self {
            kudos_repo,
            proof_repo,
            sponsor_repo,
            skills,
            max_lines,
        }
    }

    /// Post kudos against a proof on behalf of the calling sponsor.
    ///
    /// Rejections leave balance, history, and caches untouched.
    pub async fn post_kudos(
        &self,
        principal: &Principal,
        proof_id: &ProofId,
        lines: &[KudosLine],
    ) -> Result<KudosReceipt, KudosError> {
        let sponsor_id = principal.as_sponsor().ok_or_else(|| {
            KudosError::UnrelatedContent("only sponsors can post kudos".to_string())
        })?;

        let total = validate_lines(lines, self.max_lines)?;

        let skill_ids: Vec<SkillId> = lines.iter().map(|l| l.skill_id).collect();
        self.skills.resolve(&skill_ids).await?;

        let proof = self.load_proof(proof_id).await?;
        if !proof.is_published() {
            return Err(KudosError::Validation(format!(
                "proof is {}, kudos can only be posted on PUBLISHED proofs",
                proof.status
            )));
        }

        let sponsor = self.load_sponsor(&sponsor_id).await?;
        if total > sponsor.kudos {
            tracing::warn!(
                sponsor_id = %sponsor_id,
                proof_id = %proof_id,
                balance = sponsor.kudos,
                total,
                "kudos rejected: insufficient balance"
            );
            return Err(KudosError::InsufficientBalance {
                balance: sponsor.kudos,
                requested: total,
            });
        }

        let posting = KudosPosting {
            history_id: KudosHistoryId::new(),
            sponsor_id,
            proof_id: *proof_id,
            lines: lines.to_vec(),
            total,
            sent_at: chrono::Utc::now(),
        };

        let outcome = self.kudos_repo.post(&posting).await.map_err(|e| match e {
            RepositoryError::NotFound => KudosError::NotFound {
                entity: "sponsor",
                id: sponsor_id.to_string(),
            },
            other => KudosError::StorageError(other.to_string()),
        })?;

        match outcome {
            PostOutcome::Accepted(receipt) => {
                tracing::info!(
                    sponsor_id = %sponsor_id,
                    proof_id = %proof_id,
                    history_id = %posting.history_id,
                    total,
                    balance = receipt.current_sponsor_balance,
                    "kudos posted"
                );
                Ok(receipt)
            }
            // The balance moved between the pre-check and the write.
            PostOutcome::InsufficientBalance { balance } => {
                tracing::warn!(
                    sponsor_id = %sponsor_id,
                    proof_id = %proof_id,
                    balance,
                    total,
                    "kudos rejected at write: insufficient balance"
                );
                Err(KudosError::InsufficientBalance {
                    balance,
                    requested: total,
                })
            }
        }
    }

    /// Whether the sponsor has endorsed the proof at least once.
    pub async fn has_endorsed(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> Result<bool, KudosError> {
        self.kudos_repo
            .has_endorsed(sponsor_id, proof_id)
            .await
            .map_err(|e| KudosError::StorageError(e.to_string()))
    }

    /// Administrative top-up of a sponsor's balance. Returns the new balance.
    pub async fn increase_kudos(
        &self,
        sponsor_id: &SponsorId,
        amount: i64,
    ) -> Result<i64, KudosError> {
        if amount <= 0 {
            return Err(KudosError::Validation(
                "top-up amount must be positive".to_string(),
            ));
        }

        let sponsor = self.load_sponsor(sponsor_id).await?;
        if sponsor.kudos.checked_add(amount).is_none() {
            return Err(KudosError::Validation(
                "top-up would overflow the kudos balance".to_string(),
            ));
        }

        let balance = self
            .sponsor_repo
            .increase_kudos(sponsor_id, amount)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => KudosError::NotFound {
                    entity: "sponsor",
                    id: sponsor_id.to_string(),
                },
                other => KudosError::StorageError(other.to_string()),
            })?;

        tracing::info!(sponsor_id = %sponsor_id, amount, balance, "sponsor kudos topped up");
        Ok(balance)
    }

    /// Current state of a sponsor account.
    pub async fn get_sponsor(&self, sponsor_id: &SponsorId) -> Result<Sponsor, KudosError> {
        self.load_sponsor(sponsor_id).await
    }

    async fn load_proof(&self, proof_id: &ProofId) -> Result<Proof, KudosError> {
        self.proof_repo
            .get_by_id(proof_id)
            .await
            .map_err(|e| KudosError::StorageError(e.to_string()))?
            .ok_or_else(|| KudosError::NotFound {
                entity: "proof",
                id: proof_id.to_string(),
            })
    }

    async fn load_sponsor(&self, sponsor_id: &SponsorId) -> Result<Sponsor, KudosError> {
        self.sponsor_repo
            .get_by_id(sponsor_id)
            .await
            .map_err(|e| KudosError::StorageError(e.to_string()))?
            .ok_or_else(|| KudosError::NotFound {
                entity: "sponsor",
                id: sponsor_id.to_string(),
            })
    }
}

/// Check line count and amounts, returning the submission total.
pub fn validate_lines(lines: &[KudosLine], max_lines: usize) -> Result<i64, KudosError> {
    if lines.is_empty() {
        return Err(KudosError::Validation(
            "at least one skill line is required".to_string(),
        ));
    }
    if lines.len() > max_lines {
        return Err(KudosError::Validation(format!(
            "at most {max_lines} skill lines are allowed, got {}",
            lines.len()
        )));
    }

    let mut total: i64 = 0;
    for line in lines {
        if line.amount <= 0 {
            return Err(KudosError::Validation(format!(
                "amount for skill '{}' must be positive",
                line.skill_id
            )));
        }
        total = total
            .checked_add(line.amount)
            .ok_or_else(|| KudosError::Validation("kudos total overflows".to_string()))?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;
    use proofwork_types::kudos::DEFAULT_MAX_KUDOS_LINES;
    use proofwork_types::proof::ProofStatus;

    type TestLedger = KudosLedger<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore>;

    fn ledger(store: &InMemoryStore) -> TestLedger {
        KudosLedger::new(
            store.clone(),
            store.clone(),
            store.clone(),
            SkillCatalog::new(store.clone()),
            DEFAULT_MAX_KUDOS_LINES,
        )
    }

    #[tokio::test]
    async fn test_post_kudos_scenario() {
        let store = InMemoryStore::new();
        let skill_a = store.seed_skill("Rust");
        let skill_b = store.seed_skill("SQL");
        let sponsor = store.seed_sponsor(100);
        let proof = store.seed_proof(ProofStatus::Published);
        let ledger = ledger(&store);
        let principal = Principal::sponsor(sponsor.id);

        let receipt = ledger
            .post_kudos(
                &principal,
                &proof.id,
                &[KudosLine::new(skill_a.id, 30), KudosLine::new(skill_b.id, 20)],
            )
            .await
            .unwrap();

        assert_eq!(
            receipt,
            KudosReceipt {
                current_count_kudos: 50,
                current_sum_kudos_by_sponsor: 50,
                current_sponsor_balance: 50,
            }
        );
        assert_eq!(store.balance(&sponsor.id), 50);
        assert_eq!(store.history_len(), 1);
        assert_eq!(store.skill_history_len(), 2);
        assert_eq!(store.skill_kudos_rows(&proof.id), 2);

        // Second submission exceeds the remaining balance.
        let err = ledger
            .post_kudos(&principal, &proof.id, &[KudosLine::new(skill_a.id, 80)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            KudosError::InsufficientBalance {
                balance: 50,
                requested: 80
            }
        ));
        assert_eq!(store.balance(&sponsor.id), 50);
        assert_eq!(store.history_len(), 1);
        assert_eq!(store.skill_history_len(), 2);
    }

    #[tokio::test]
    async fn test_repeat_endorsement_accumulates() {
        let store = InMemoryStore::new();
        let skill = store.seed_skill("Rust");
        let sponsor = store.seed_sponsor(100);
        let proof = store.seed_proof(ProofStatus::Published);
        let ledger = ledger(&store);
        let principal = Principal::sponsor(sponsor.id);

        assert!(!ledger.has_endorsed(&sponsor.id, &proof.id).await.unwrap());
        ledger
            .post_kudos(&principal, &proof.id, &[KudosLine::new(skill.id, 10)])
            .await
            .unwrap();
        let receipt = ledger
            .post_kudos(&principal, &proof.id, &[KudosLine::new(skill.id, 15)])
            .await
            .unwrap();

        assert!(ledger.has_endorsed(&sponsor.id, &proof.id).await.unwrap());
        assert_eq!(receipt.current_count_kudos, 25);
        assert_eq!(receipt.current_sum_kudos_by_sponsor, 25);
        assert_eq!(receipt.current_sponsor_balance, 75);
        // One cache row per distinct skill, however many submissions.
        assert_eq!(store.skill_kudos_rows(&proof.id), 1);
        assert_eq!(store.history_len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_skill_rejected_before_mutation() {
        let store = InMemoryStore::new();
        let skill = store.seed_skill("Rust");
        let sponsor = store.seed_sponsor(100);
        let proof = store.seed_proof(ProofStatus::Published);
        let ledger = ledger(&store);

        let err = ledger
            .post_kudos(
                &Principal::sponsor(sponsor.id),
                &proof.id,
                &[KudosLine::new(skill.id, 10), KudosLine::new(skill.id, 5)],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, KudosError::DuplicateSkillReference(id) if id == skill.id));
        assert_eq!(store.balance(&sponsor.id), 100);
        assert_eq!(store.history_len(), 0);
    }

    #[tokio::test]
    async fn test_unknown_skill_rejected() {
        let store = InMemoryStore::new();
        let sponsor = store.seed_sponsor(100);
        let proof = store.seed_proof(ProofStatus::Published);
        let ledger = ledger(&store);

        let err = ledger
            .post_kudos(
                &Principal::sponsor(sponsor.id),
                &proof.id,
                &[KudosLine::new(SkillId::new(), 10)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, KudosError::UnknownSkillReference(_)));
        assert_eq!(store.balance(&sponsor.id), 100);
    }

    #[tokio::test]
    async fn test_draft_proof_rejected() {
        let store = InMemoryStore::new();
        let skill = store.seed_skill("Rust");
        let sponsor = store.seed_sponsor(100);
        let proof = store.seed_proof(ProofStatus::Draft);
        let ledger = ledger(&store);

        let err = ledger
            .post_kudos(
                &Principal::sponsor(sponsor.id),
                &proof.id,
                &[KudosLine::new(skill.id, 10)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, KudosError::Validation(_)));
        assert_eq!(store.history_len(), 0);
    }

    #[tokio::test]
    async fn test_missing_proof_is_not_found() {
        let store = InMemoryStore::new();
        let skill = store.seed_skill("Rust");
        let sponsor = store.seed_sponsor(100);
        let ledger = ledger(&store);

        let err = ledger
            .post_kudos(
                &Principal::sponsor(sponsor.id),
                &ProofId::new(),
                &[KudosLine::new(skill.id, 10)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, KudosError::NotFound { entity: "proof", .. }));
    }

    #[tokio::test]
    async fn test_talent_cannot_post_kudos() {
        let store = InMemoryStore::new();
        let skill = store.seed_skill("Rust");
        let proof = store.seed_proof(ProofStatus::Published);
        let talent = store.seed_talent(&[]);
        let ledger = ledger(&store);

        let err = ledger
            .post_kudos(
                &Principal::talent(talent.id),
                &proof.id,
                &[KudosLine::new(skill.id, 10)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, KudosError::UnrelatedContent(_)));
    }

    #[tokio::test]
    async fn test_line_cap_enforced() {
        let store = InMemoryStore::new();
        let sponsor = store.seed_sponsor(1_000);
        let proof = store.seed_proof(ProofStatus::Published);
        let lines: Vec<KudosLine> = (0..=DEFAULT_MAX_KUDOS_LINES)
            .map(|i| KudosLine::new(store.seed_skill(&format!("skill-{i}")).id, 1))
            .collect();
        let ledger = ledger(&store);

        let err = ledger
            .post_kudos(&Principal::sponsor(sponsor.id), &proof.id, &lines)
            .await
            .unwrap_err();
        assert!(matches!(err, KudosError::Validation(_)));
        assert_eq!(store.balance(&sponsor.id), 1_000);
    }

    #[test]
    fn test_validate_lines_rejects_non_positive_and_empty() {
        let skill = SkillId::new();
        assert!(validate_lines(&[], 30).is_err());
        assert!(validate_lines(&[KudosLine::new(skill, 0)], 30).is_err());
        assert!(validate_lines(&[KudosLine::new(skill, -5)], 30).is_err());
        assert_eq!(validate_lines(&[KudosLine::new(skill, 7)], 30).unwrap(), 7);
    }

    #[test]
    fn test_validate_lines_rejects_overflow() {
        let lines = [
            KudosLine::new(SkillId::new(), i64::MAX),
            KudosLine::new(SkillId::new(), 1),
        ];
        assert!(matches!(
            validate_lines(&lines, 30),
            Err(KudosError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_balance_equals_initial_minus_accepted_totals() {
        let store = InMemoryStore::new();
        let skill = store.seed_skill("Rust");
        let sponsor = store.seed_sponsor(40);
        let proof = store.seed_proof(ProofStatus::Published);
        let ledger = ledger(&store);
        let principal = Principal::sponsor(sponsor.id);

        let mut accepted = 0;
        for amount in [10, 25, 9, 3, 1] {
            if ledger
                .post_kudos(&principal, &proof.id, &[KudosLine::new(skill.id, amount)])
                .await
                .is_ok()
            {
                accepted += amount;
            }
        }

        // 10 + 25 accepted, 9 rejected (5 left), 3 and 1 accepted.
        assert_eq!(accepted, 39);
        assert_eq!(store.balance(&sponsor.id), 40 - accepted);
    }

    #[tokio::test]
    async fn test_increase_kudos() {
        let store = InMemoryStore::new();
        let sponsor = store.seed_sponsor(10);
        let ledger = ledger(&store);

        assert_eq!(ledger.increase_kudos(&sponsor.id, 90).await.unwrap(), 100);
        assert!(matches!(
            ledger.increase_kudos(&sponsor.id, 0).await,
            Err(KudosError::Validation(_))
        ));
        assert!(matches!(
            ledger.increase_kudos(&sponsor.id, i64::MAX).await,
            Err(KudosError::Validation(_))
        ));
        assert!(matches!(
            ledger.increase_kudos(&SponsorId::new(), 5).await,
            Err(KudosError::NotFound { .. })
        ));
        assert_eq!(store.balance(&sponsor.id), 100);
    }
}
