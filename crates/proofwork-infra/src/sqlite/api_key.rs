//! API key store: the authentication collaborator behind the HTTP layer.
//!
//! A key maps to exactly one principal (id + role). Keys are stored as
//! SHA-256 digests; lookups hash the presented key and compare digests.

use chrono::{DateTime, Utc};
use proofwork_types::error::RepositoryError;
use proofwork_types::principal::{Principal, Role};
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_optional_datetime, query_err};
use crate::crypto::hash::{generate_api_key, hash_api_key};

/// Metadata of an issued key. Never carries the plaintext.
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyInfo {
    pub id: Uuid,
    pub name: String,
    pub principal: Principal,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

/// A freshly issued key. `key` is the only copy of the plaintext.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedApiKey {
    pub key: String,
    pub info: ApiKeyInfo,
}

pub struct SqliteApiKeyStore {
    pool: DatabasePool,
}

impl SqliteApiKeyStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Issue a new key bound to `principal`.
    pub async fn issue(
        &self,
        name: &str,
        principal: &Principal,
    ) -> Result<IssuedApiKey, RepositoryError> {
        let key = generate_api_key();
        let info = ApiKeyInfo {
            id: Uuid::now_v7(),
            name: name.to_string(),
            principal: *principal,
            created_at: Utc::now(),
            last_used_at: None,
        };

        sqlx::query(
            "INSERT INTO api_keys (id, name, key_hash, principal_id, role, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(info.id.to_string())
        .bind(&info.name)
        .bind(hash_api_key(&key))
        .bind(principal.id.to_string())
        .bind(principal.role.to_string())
        .bind(format_datetime(&info.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        tracing::info!(key_id = %info.id, role = %principal.role, "api key issued");
        Ok(IssuedApiKey { key, info })
    }

    /// Resolve a presented key to its principal.
    ///
    /// Touches `last_used_at` on success; a failed touch does not fail the
    /// lookup.
    pub async fn resolve(&self, key: &str) -> Result<Option<Principal>, RepositoryError> {
        let row = sqlx::query("SELECT id, principal_id, role FROM api_keys WHERE key_hash = ?")
            .bind(hash_api_key(key))
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let id: String = row.try_get("id").map_err(query_err)?;
        let principal = row_to_principal(&row)?;

        if let Err(e) = sqlx::query("UPDATE api_keys SET last_used_at = ? WHERE id = ?")
            .bind(format_datetime(&Utc::now()))
            .bind(&id)
            .execute(&self.pool.writer)
            .await
        {
            tracing::debug!(key_id = %id, error = %e, "could not record api key use");
        }
        Ok(Some(principal))
    }

    /// All issued keys, newest first.
    pub async fn list(&self) -> Result<Vec<ApiKeyInfo>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM api_keys ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id").map_err(query_err)?;
                let created_at: String = row.try_get("created_at").map_err(query_err)?;
                Ok(ApiKeyInfo {
                    id: Uuid::parse_str(&id)
                        .map_err(|e| RepositoryError::Query(format!("invalid api key id: {e}")))?,
                    name: row.try_get("name").map_err(query_err)?,
                    principal: row_to_principal(row)?,
                    created_at: parse_datetime(&created_at)?,
                    last_used_at: parse_optional_datetime(
                        row.try_get("last_used_at").map_err(query_err)?,
                    )?,
                })
            })
            .collect()
    }
}

fn row_to_principal(row: &sqlx::sqlite::SqliteRow) -> Result<Principal, RepositoryError> {
    let principal_id: String = row.try_get("principal_id").map_err(query_err)?;
    let role: String = row.try_get("role").map_err(query_err)?;
    Ok(Principal {
        id: Uuid::parse_str(&principal_id)
            .map_err(|e| RepositoryError::Query(format!("invalid principal id: {e}")))?,
        role: role.parse::<Role>().map_err(RepositoryError::Query)?,
    })
}
