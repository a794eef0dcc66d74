use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::uuid_id;
use crate::skill::SkillId;

uuid_id!(
    /// Unique identifier for a talent account.
    TalentId
);

/// A talent: author of proofs and of vacancy submissions.
///
/// Profile management lives outside the core; only the fields the ledger
/// and submission guard read are modelled here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Talent {
    pub id: TalentId,
    pub fullname: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to register a talent with a declared skill set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTalentRequest {
    pub fullname: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub skill_ids: Vec<SkillId>,
}
