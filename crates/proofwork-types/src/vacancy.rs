use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::id::uuid_id;
use crate::skill::{Skill, SkillId};
use crate::sponsor::{SponsorId, SponsorSummary};

/// Lowest accepted skills-matched percentage.
pub const MIN_SKILLS_MATCHED_PERCENT: u8 = 50;
/// Highest accepted skills-matched percentage.
pub const MAX_SKILLS_MATCHED_PERCENT: u8 = 100;
/// Maximum vacancy title length, in characters.
pub const MAX_VACANCY_TITLE_LEN: usize = 100;

uuid_id!(
    /// Unique identifier for a vacancy.
    VacancyId
);

/// Editorial states of a vacancy.
///
/// - Draft: being written, invisible to talents
/// - Published: open for submissions
/// - Hidden: temporarily withdrawn, can be reopened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VacancyStatus {
    Draft,
    Published,
    Hidden,
}

impl fmt::Display for VacancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VacancyStatus::Draft => write!(f, "DRAFT"),
            VacancyStatus::Published => write!(f, "PUBLISHED"),
            VacancyStatus::Hidden => write!(f, "HIDDEN"),
        }
    }
}

impl FromStr for VacancyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Ok(VacancyStatus::Draft),
            "PUBLISHED" => Ok(VacancyStatus::Published),
            "HIDDEN" => Ok(VacancyStatus::Hidden),
            other => Err(format!("invalid vacancy status: '{other}'")),
        }
    }
}

/// A sponsor-authored job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacancy {
    pub id: VacancyId,
    /// Owning sponsor; the only principal allowed to modify the vacancy.
    pub sponsor_id: SponsorId,
    pub title: String,
    pub content: String,
    pub status: VacancyStatus,
    /// Set on the first transition into PUBLISHED, never cleared.
    pub published_at: Option<DateTime<Utc>>,
    /// Minimum share of the bound skills a talent must hold to submit.
    pub skills_matched_percent: u8,
    /// Bound skill set.
    pub skill_ids: Vec<SkillId>,
    /// Incremented on every write; used to linearize concurrent modifications.
    pub revision: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a vacancy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVacancyRequest {
    pub title: String,
    pub content: String,
    pub status: VacancyStatus,
    #[serde(default)]
    pub skill_ids: Vec<SkillId>,
    /// Falls back to the configured default when absent.
    pub skills_matched_percent: Option<u8>,
}

/// Request to modify a vacancy. The requested status selects the transition;
/// fields are applied only by transitions that replace them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifyVacancyRequest {
    pub title: String,
    pub content: String,
    pub status: VacancyStatus,
    #[serde(default)]
    pub skill_ids: Vec<SkillId>,
}

/// Vacancy with resolved skills and author, as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyDetail {
    pub id: VacancyId,
    pub title: String,
    pub content: String,
    pub status: VacancyStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub skills_matched_percent: u8,
    pub skills: Vec<Skill>,
    pub author: SponsorSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VacancyDetail {
    pub fn new(vacancy: Vacancy, skills: Vec<Skill>, author: SponsorSummary) -> Self {
        Self {
            id: vacancy.id,
            title: vacancy.title,
            content: vacancy.content,
            status: vacancy.status,
            published_at: vacancy.published_at,
            skills_matched_percent: vacancy.skills_matched_percent,
            skills,
            author,
            created_at: vacancy.created_at,
            updated_at: vacancy.updated_at,
        }
    }
}
