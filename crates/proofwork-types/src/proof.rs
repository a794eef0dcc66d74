use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::id::uuid_id;
use crate::talent::TalentId;

uuid_id!(
    /// Unique identifier for a proof (published work sample).
    ProofId
);

/// Proof publication states.
///
/// - Draft: visible to its talent only, cannot receive kudos
/// - Published: public, accepts kudos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProofStatus {
    Draft,
    Published,
}

impl fmt::Display for ProofStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofStatus::Draft => write!(f, "DRAFT"),
            ProofStatus::Published => write!(f, "PUBLISHED"),
        }
    }
}

impl FromStr for ProofStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Ok(ProofStatus::Draft),
            "PUBLISHED" => Ok(ProofStatus::Published),
            other => Err(format!("invalid proof status: '{other}'")),
        }
    }
}

/// A talent-authored work sample that can receive kudos while published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proof {
    pub id: ProofId,
    /// The talent who owns this proof.
    pub talent_id: TalentId,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub icon: Option<String>,
    pub status: ProofStatus,
    /// Set when the proof is first published.
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Proof {
    pub fn is_published(&self) -> bool {
        self.status == ProofStatus::Published
    }
}

/// Request to register a proof. Proofs start as DRAFT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProofRequest {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub icon: Option<String>,
}
