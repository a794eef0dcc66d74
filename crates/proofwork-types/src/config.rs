//! Global configuration types for Proofwork.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls ledger
//! limits and pagination defaults.

use serde::{Deserialize, Serialize};

use crate::kudos::DEFAULT_MAX_KUDOS_LINES;
use crate::vacancy::MIN_SKILLS_MATCHED_PERCENT;

/// Top-level configuration for the Proofwork platform.
///
/// Loaded from `~/.proofwork/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Maximum number of skill lines in one kudos submission.
    #[serde(default = "default_max_kudos_lines")]
    pub max_kudos_lines: usize,

    /// Page size used when a list request does not ask for one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound on any requested page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Skills-matched percentage applied when a vacancy is created without one.
    #[serde(default = "default_skills_matched_percent")]
    pub default_skills_matched_percent: u8,
}

fn default_max_kudos_lines() -> usize {
    DEFAULT_MAX_KUDOS_LINES
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}

fn default_skills_matched_percent() -> u8 {
    MIN_SKILLS_MATCHED_PERCENT
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            max_kudos_lines: default_max_kudos_lines(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            default_skills_matched_percent: default_skills_matched_percent(),
        }
    }
}
