use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::uuid_id;

uuid_id!(
    /// Unique identifier for a sponsor account.
    SponsorId
);

/// A sponsor: holds a kudos balance, endorses proofs, posts vacancies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sponsor {
    pub id: SponsorId,
    pub fullname: String,
    pub avatar: Option<String>,
    /// Remaining kudos. Never negative.
    pub kudos: i64,
    pub created_at: DateTime<Utc>,
}

/// Public author block embedded in vacancy details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorSummary {
    pub id: SponsorId,
    pub fullname: String,
    pub avatar: Option<String>,
}

impl From<&Sponsor> for SponsorSummary {
    fn from(sponsor: &Sponsor) -> Self {
        Self {
            id: sponsor.id,
            fullname: sponsor.fullname.clone(),
            avatar: sponsor.avatar.clone(),
        }
    }
}

/// Request to register a sponsor account with an opening balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSponsorRequest {
    pub fullname: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub kudos: i64,
}
