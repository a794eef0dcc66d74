//! Kudos ledger records.
//!
//! The ledger is append-only: one [`KudosHistoryEntry`] per submission and one
//! [`SkillKudosHistoryEntry`] per skill line of that submission. [`SkillKudos`]
//! is a per-(proof, skill) running total derived from the history and kept in
//! step with it inside the same write transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::id::uuid_id;
use crate::proof::ProofId;
use crate::skill::SkillId;
use crate::sponsor::SponsorId;

/// Default cap on the number of skill lines in a single kudos submission.
pub const DEFAULT_MAX_KUDOS_LINES: usize = 30;

uuid_id!(
    /// Unique identifier for a kudos submission (history entry).
    KudosHistoryId
);

/// One skill line of a kudos submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KudosLine {
    pub skill_id: SkillId,
    pub amount: i64,
}

impl KudosLine {
    pub fn new(skill_id: SkillId, amount: i64) -> Self {
        Self { skill_id, amount }
    }
}

/// Request body for posting kudos against a proof.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostKudosRequest {
    pub skills: Vec<KudosLine>,
}

/// Cached running total of kudos a proof received for one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillKudos {
    pub proof_id: ProofId,
    pub skill_id: SkillId,
    pub kudos: i64,
}

/// Immutable audit record of one kudos submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KudosHistoryEntry {
    pub id: KudosHistoryId,
    pub sponsor_id: SponsorId,
    pub proof_id: ProofId,
    /// Total kudos of the submission (sum of its skill lines).
    pub kudos: i64,
    pub sent_at: DateTime<Utc>,
}

/// Immutable per-skill child row of a [`KudosHistoryEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillKudosHistoryEntry {
    pub history_id: KudosHistoryId,
    pub skill_id: SkillId,
    pub kudos: i64,
}

/// Result of an accepted kudos submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KudosReceipt {
    /// Total kudos ever received by the proof, across all sponsors.
    pub current_count_kudos: i64,
    /// This sponsor's lifetime total on the proof.
    pub current_sum_kudos_by_sponsor: i64,
    /// The sponsor's balance after the submission.
    pub current_sponsor_balance: i64,
}

/// A proof the sponsor has endorsed, annotated with the sponsor's lifetime sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KudosedProof {
    pub proof_id: ProofId,
    pub icon: Option<String>,
    pub title: String,
    /// Time of the sponsor's most recent submission on this proof.
    pub sent_at: DateTime<Utc>,
    pub total_kudos_from_sponsor: i64,
}

/// One row of a sponsor's submission history on a proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KudosHistoryItem {
    pub sent_at: DateTime<Utc>,
    pub kudos: i64,
}

/// Kudos total for one skill, with the skill name resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillKudosTotal {
    pub skill_id: SkillId,
    pub skill_name: String,
    pub kudos: i64,
}

/// Kudos overview of one proof as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofKudosSummary {
    pub proof_id: ProofId,
    pub total_kudos: i64,
    pub skills: Vec<SkillKudosTotal>,
    /// Whether the calling sponsor has endorsed the proof at least once.
    pub kudosed_by_me: bool,
}

/// Ordering for the sponsor's endorsed-proofs listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KudosedProofOrder {
    /// Most recently endorsed first.
    #[default]
    Newest,
    /// Highest lifetime sum from this sponsor first.
    TotalKudos,
}

impl fmt::Display for KudosedProofOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KudosedProofOrder::Newest => write!(f, "newest"),
            KudosedProofOrder::TotalKudos => write!(f, "total_kudos"),
        }
    }
}

impl FromStr for KudosedProofOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" => Ok(KudosedProofOrder::Newest),
            "total_kudos" | "total" => Ok(KudosedProofOrder::TotalKudos),
            other => Err(format!("invalid sort order: '{other}'")),
        }
    }
}

/// Comparison of the cached per-skill totals against the history-derived sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KudosTotalsReport {
    pub proof_id: ProofId,
    /// Sum of the SkillKudos cache rows.
    pub cached: i64,
    /// Sum of the SkillKudosHistory rows.
    pub ledger: i64,
}

impl KudosTotalsReport {
    pub fn is_consistent(&self) -> bool {
        self.cached == self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_kudos_request_deserialize() {
        let skill = SkillId::new();
        let json = format!(r#"{{"skills":[{{"skill_id":"{skill}","amount":30}}]}}"#);
        let req: PostKudosRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.skills, vec![KudosLine::new(skill, 30)]);
    }

    #[test]
    fn test_kudosed_proof_order_parse() {
        assert_eq!(
            "total".parse::<KudosedProofOrder>().unwrap(),
            KudosedProofOrder::TotalKudos
        );
        assert_eq!(KudosedProofOrder::default(), KudosedProofOrder::Newest);
        assert!("random".parse::<KudosedProofOrder>().is_err());
    }

    #[test]
    fn test_totals_report_consistency() {
        let report = KudosTotalsReport {
            proof_id: ProofId::new(),
            cached: 50,
            ledger: 50,
        };
        assert!(report.is_consistent());
        let drifted = KudosTotalsReport { ledger: 49, ..report };
        assert!(!drifted.is_consistent());
    }
}
