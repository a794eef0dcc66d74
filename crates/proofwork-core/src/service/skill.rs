//! Skill catalog service.
//!
//! Owns skill registration and the reference resolution shared by the kudos
//! ledger and the vacancy lifecycle: a list of requested ids is accepted only
//! if it has no duplicates and every id exists.

use std::collections::HashSet;

use proofwork_types::error::{RepositoryError, SkillError};
use proofwork_types::skill::{CreateSkillRequest, MAX_SKILL_NAME_LEN, Skill, SkillId};

use crate::repository::skill::SkillRepository;

/// Service over the canonical skill set.
pub struct SkillCatalog<S: SkillRepository> {
    skill_repo: S,
}

impl<S: SkillRepository> SkillCatalog<S> {
    pub fn new(skill_repo: S) -> Self {
        Self { skill_repo }
    }

    /// Register a new skill. Names are trimmed, 1..=30 characters, unique
    /// ignoring case.
    pub async fn create_skill(&self, request: CreateSkillRequest) -> Result<Skill, SkillError> {
        let name = validate_skill_name(&request.name)?;

        let existing = self
            .skill_repo
            .get_by_name(&name)
            .await
            .map_err(|e| SkillError::StorageError(e.to_string()))?;
        if existing.is_some() {
            return Err(SkillError::NameConflict(name));
        }

        let skill = Skill {
            id: SkillId::new(),
            name,
        };

        let skill = self.skill_repo.create(&skill).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => SkillError::NameConflict(skill.name.clone()),
            other => SkillError::StorageError(other.to_string()),
        })?;

        tracing::info!(skill_id = %skill.id, name = %skill.name, "skill registered");
        Ok(skill)
    }

    pub async fn get_skill(&self, id: &SkillId) -> Result<Skill, SkillError> {
        self.skill_repo
            .get_by_id(id)
            .await
            .map_err(|e| SkillError::StorageError(e.to_string()))?
            .ok_or_else(|| SkillError::NotFound(id.to_string()))
    }

    pub async fn list_skills(&self) -> Result<Vec<Skill>, SkillError> {
        self.skill_repo
            .list()
            .await
            .map_err(|e| SkillError::StorageError(e.to_string()))
    }

    /// Resolve requested ids to catalog skills, preserving request order.
    ///
    /// Duplicates are rejected before storage is consulted; unknown ids are
    /// all reported together.
    pub async fn resolve(&self, ids: &[SkillId]) -> Result<Vec<Skill>, SkillError> {
        ensure_unique(ids)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found = self
            .skill_repo
            .find_by_ids(ids)
            .await
            .map_err(|e| SkillError::StorageError(e.to_string()))?;

        let mut resolved = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        for id in ids {
            match found.iter().find(|s| &s.id == id) {
                Some(skill) => resolved.push(skill.clone()),
                None => missing.push(*id),
            }
        }

        if !missing.is_empty() {
            return Err(SkillError::UnknownReference(missing));
        }
        Ok(resolved)
    }
}

/// Reject the first id that appears twice.
pub fn ensure_unique(ids: &[SkillId]) -> Result<(), SkillError> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id) {
            return Err(SkillError::DuplicateReference(*id));
        }
    }
    Ok(())
}

fn validate_skill_name(raw: &str) -> Result<String, SkillError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(SkillError::InvalidName("name cannot be empty".to_string()));
    }
    if name.chars().count() > MAX_SKILL_NAME_LEN {
        return Err(SkillError::InvalidName(format!(
            "name must be at most {MAX_SKILL_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;

    #[tokio::test]
    async fn test_create_skill_trims_and_stores() {
        let catalog = SkillCatalog::new(InMemoryStore::new());
        let skill = catalog
            .create_skill(CreateSkillRequest {
                name: "  Rust  ".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(skill.name, "Rust");
        assert_eq!(catalog.list_skills().await.unwrap(), vec![skill]);
    }

    #[tokio::test]
    async fn test_create_skill_rejects_long_and_empty_names() {
        let catalog = SkillCatalog::new(InMemoryStore::new());
        let long = "x".repeat(MAX_SKILL_NAME_LEN + 1);
        assert!(matches!(
            catalog.create_skill(CreateSkillRequest { name: long }).await,
            Err(SkillError::InvalidName(_))
        ));
        assert!(matches!(
            catalog
                .create_skill(CreateSkillRequest {
                    name: "   ".to_string()
                })
                .await,
            Err(SkillError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn test_create_skill_name_conflict_ignores_case() {
        let store = InMemoryStore::new();
        store.seed_skill("Rust");
        let catalog = SkillCatalog::new(store);
        let err = catalog
            .create_skill(CreateSkillRequest {
                name: "rust".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SkillError::NameConflict(_)));
    }

    #[tokio::test]
    async fn test_resolve_preserves_request_order() {
        let store = InMemoryStore::new();
        let a = store.seed_skill("Rust");
        let b = store.seed_skill("SQL");
        let catalog = SkillCatalog::new(store);
        let resolved = catalog.resolve(&[b.id, a.id]).await.unwrap();
        assert_eq!(resolved, vec![b, a]);
    }

    #[tokio::test]
    async fn test_resolve_rejects_duplicates() {
        let store = InMemoryStore::new();
        let a = store.seed_skill("Rust");
        let catalog = SkillCatalog::new(store);
        let err = catalog.resolve(&[a.id, a.id]).await.unwrap_err();
        assert!(matches!(err, SkillError::DuplicateReference(id) if id == a.id));
    }

    #[tokio::test]
    async fn test_resolve_reports_all_unknown_ids() {
        let store = InMemoryStore::new();
        let a = store.seed_skill("Rust");
        let catalog = SkillCatalog::new(store);
        let x = SkillId::new();
        let y = SkillId::new();
        let err = catalog.resolve(&[x, a.id, y]).await.unwrap_err();
        match err {
            SkillError::UnknownReference(ids) => assert_eq!(ids, vec![x, y]),
            other => panic!("expected unknown reference, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_skill_not_found() {
        let catalog = SkillCatalog::new(InMemoryStore::new());
        let err = catalog.get_skill(&SkillId::new()).await.unwrap_err();
        assert!(matches!(err, SkillError::NotFound(_)));
    }
}
