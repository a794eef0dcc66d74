use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::id::uuid_id;
use crate::talent::TalentId;
use crate::vacancy::VacancyId;

uuid_id!(
    /// Unique identifier for a submission.
    SubmissionId
);

uuid_id!(
    /// Identifier of the sponsor's answer to a submission.
    AnswerId
);

/// Submission states. Transitions are driven by the answer collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Pending,
    Answered,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "PENDING"),
            SubmissionStatus::Answered => write!(f, "ANSWERED"),
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(SubmissionStatus::Pending),
            "ANSWERED" => Ok(SubmissionStatus::Answered),
            other => Err(format!("invalid submission status: '{other}'")),
        }
    }
}

/// A talent's response to a published vacancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub vacancy_id: VacancyId,
    pub talent_id: TalentId,
    pub contact: String,
    pub message: String,
    pub status: SubmissionStatus,
    pub sent_at: DateTime<Utc>,
    /// Set once the sponsor replies.
    pub answer_id: Option<AnswerId>,
}

/// Request body for responding to a vacancy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubmissionRequest {
    pub contact: String,
    pub message: String,
}
