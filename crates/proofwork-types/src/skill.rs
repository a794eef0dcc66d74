use serde::{Deserialize, Serialize};

use crate::id::uuid_id;

/// Maximum length of a skill name, in characters.
pub const MAX_SKILL_NAME_LEN: usize = 30;

uuid_id!(
    /// Unique identifier for a catalog skill.
    SkillId
);

/// A named capability tag shared by proofs, vacancies, and talents.
///
/// Skill names are unique across the catalog. A skill is never removed while
/// a proof endorsement or vacancy still references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
}

/// Request to register a new skill in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSkillRequest {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_id_display_parse() {
        let id = SkillId::new();
        let parsed: SkillId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_skill_id_serializes_as_plain_uuid() {
        let id = SkillId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }

    #[test]
    fn test_skill_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<SkillId>().is_err());
    }
}
