//! The caller identity handed to every core operation.
//!
//! Authentication is an external collaborator. Whatever resolves the caller
//! (API key lookup, upstream gateway) produces a [`Principal`], and services
//! take it as an explicit argument instead of reading ambient state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::sponsor::SponsorId;
use crate::talent::TalentId;

/// Role of an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Talent,
    Sponsor,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Talent => write!(f, "talent"),
            Role::Sponsor => write!(f, "sponsor"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "talent" => Ok(Role::Talent),
            "sponsor" => Ok(Role::Sponsor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

/// Current caller: id plus role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn sponsor(id: SponsorId) -> Self {
        Self {
            id: id.0,
            role: Role::Sponsor,
        }
    }

    pub fn talent(id: TalentId) -> Self {
        Self {
            id: id.0,
            role: Role::Talent,
        }
    }

    /// The sponsor id of this caller, if the caller acts as a sponsor.
    pub fn as_sponsor(&self) -> Option<SponsorId> {
        (self.role == Role::Sponsor).then(|| SponsorId::from_uuid(self.id))
    }

    /// The talent id of this caller, if the caller acts as a talent.
    pub fn as_talent(&self) -> Option<TalentId> {
        (self.role == Role::Talent).then(|| TalentId::from_uuid(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_case_insensitive() {
        assert_eq!("Sponsor".parse::<Role>().unwrap(), Role::Sponsor);
        assert_eq!("TALENT".parse::<Role>().unwrap(), Role::Talent);
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn test_principal_role_projection() {
        let sponsor_id = SponsorId::new();
        let principal = Principal::sponsor(sponsor_id);
        assert_eq!(principal.as_sponsor(), Some(sponsor_id));
        assert_eq!(principal.as_talent(), None);
    }
}
