use serde::Serialize;
use thiserror::Error;

use std::fmt;

use crate::skill::SkillId;
use crate::vacancy::{VacancyId, VacancyStatus};

/// Stable, transport-agnostic error kind surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    InsufficientBalance,
    DuplicateSkillReference,
    UnknownSkillReference,
    InvalidInitialState,
    IllegalLifecycleTransition,
    UnrelatedContent,
    ValidationFailure,
    /// A concurrent write won the race; the caller may reload and retry.
    Conflict,
    /// Infrastructure fault, not caller-correctable.
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::InsufficientBalance => "INSUFFICIENT_BALANCE",
            ErrorKind::DuplicateSkillReference => "DUPLICATE_SKILL_REFERENCE",
            ErrorKind::UnknownSkillReference => "UNKNOWN_SKILL_REFERENCE",
            ErrorKind::InvalidInitialState => "INVALID_INITIAL_STATE",
            ErrorKind::IllegalLifecycleTransition => "ILLEGAL_LIFECYCLE_TRANSITION",
            ErrorKind::UnrelatedContent => "UNRELATED_CONTENT",
            ErrorKind::ValidationFailure => "VALIDATION_FAILURE",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Storage => "STORAGE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn join_ids(ids: &[SkillId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors related to the skill catalog.
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("skill '{0}' not found")]
    NotFound(String),

    #[error("invalid skill name: {0}")]
    InvalidName(String),

    #[error("skill '{0}' already exists")]
    NameConflict(String),

    #[error("skill '{0}' is referenced more than once")]
    DuplicateReference(SkillId),

    #[error("unknown skill reference(s): {}", join_ids(.0))]
    UnknownReference(Vec<SkillId>),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl SkillError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SkillError::NotFound(_) => ErrorKind::NotFound,
            SkillError::InvalidName(_) => ErrorKind::ValidationFailure,
            SkillError::NameConflict(_) => ErrorKind::Conflict,
            SkillError::DuplicateReference(_) => ErrorKind::DuplicateSkillReference,
            SkillError::UnknownReference(_) => ErrorKind::UnknownSkillReference,
            SkillError::StorageError(_) => ErrorKind::Storage,
        }
    }
}

/// Errors related to kudos ledger operations.
#[derive(Debug, Error)]
pub enum KudosError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("insufficient kudos balance: {balance} available, {requested} requested")]
    InsufficientBalance { balance: i64, requested: i64 },

    #[error("skill '{0}' is referenced more than once")]
    DuplicateSkillReference(SkillId),

    #[error("unknown skill reference(s): {}", join_ids(.0))]
    UnknownSkillReference(Vec<SkillId>),

    #[error("unrelated content: {0}")]
    UnrelatedContent(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl KudosError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KudosError::NotFound { .. } => ErrorKind::NotFound,
            KudosError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            KudosError::DuplicateSkillReference(_) => ErrorKind::DuplicateSkillReference,
            KudosError::UnknownSkillReference(_) => ErrorKind::UnknownSkillReference,
            KudosError::UnrelatedContent(_) => ErrorKind::UnrelatedContent,
            KudosError::Validation(_) => ErrorKind::ValidationFailure,
            KudosError::StorageError(_) => ErrorKind::Storage,
        }
    }
}

impl From<SkillError> for KudosError {
    fn from(e: SkillError) -> Self {
        match e {
            SkillError::DuplicateReference(id) => KudosError::DuplicateSkillReference(id),
            SkillError::UnknownReference(ids) => KudosError::UnknownSkillReference(ids),
            SkillError::StorageError(msg) => KudosError::StorageError(msg),
            other => KudosError::Validation(other.to_string()),
        }
    }
}

/// Errors related to the vacancy lifecycle.
#[derive(Debug, Error)]
pub enum VacancyError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("skill '{0}' is referenced more than once")]
    DuplicateSkillReference(SkillId),

    #[error("unknown skill reference(s): {}", join_ids(.0))]
    UnknownSkillReference(Vec<SkillId>),

    #[error("a vacancy cannot be created in state {0}")]
    InvalidInitialState(VacancyStatus),

    #[error("illegal lifecycle transition from {from} to {to}")]
    IllegalLifecycleTransition {
        from: VacancyStatus,
        to: VacancyStatus,
    },

    #[error("unrelated content: {0}")]
    UnrelatedContent(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("vacancy '{0}' was modified concurrently")]
    ConcurrentModification(VacancyId),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl VacancyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VacancyError::NotFound { .. } => ErrorKind::NotFound,
            VacancyError::DuplicateSkillReference(_) => ErrorKind::DuplicateSkillReference,
            VacancyError::UnknownSkillReference(_) => ErrorKind::UnknownSkillReference,
            VacancyError::InvalidInitialState(_) => ErrorKind::InvalidInitialState,
            VacancyError::IllegalLifecycleTransition { .. } => {
                ErrorKind::IllegalLifecycleTransition
            }
            VacancyError::UnrelatedContent(_) => ErrorKind::UnrelatedContent,
            VacancyError::Validation(_) => ErrorKind::ValidationFailure,
            VacancyError::ConcurrentModification(_) => ErrorKind::Conflict,
            VacancyError::StorageError(_) => ErrorKind::Storage,
        }
    }
}

impl From<SkillError> for VacancyError {
    fn from(e: SkillError) -> Self {
        match e {
            SkillError::DuplicateReference(id) => VacancyError::DuplicateSkillReference(id),
            SkillError::UnknownReference(ids) => VacancyError::UnknownSkillReference(ids),
            SkillError::StorageError(msg) => VacancyError::StorageError(msg),
            other => VacancyError::Validation(other.to_string()),
        }
    }
}

/// Errors related to vacancy submissions.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("vacancy is {0}, submissions are accepted only while PUBLISHED")]
    VacancyNotPublished(VacancyStatus),

    #[error("skill match {actual}% is below the required {required}%")]
    SkillMatchTooLow { required: u8, actual: u8 },

    #[error("unrelated content: {0}")]
    UnrelatedContent(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl SubmissionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SubmissionError::NotFound { .. } => ErrorKind::NotFound,
            SubmissionError::VacancyNotPublished(_)
            | SubmissionError::SkillMatchTooLow { .. }
            | SubmissionError::Validation(_) => ErrorKind::ValidationFailure,
            SubmissionError::UnrelatedContent(_) => ErrorKind::UnrelatedContent,
            SubmissionError::StorageError(_) => ErrorKind::Storage,
        }
    }
}

/// Errors from account and proof registration.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("skill '{0}' is referenced more than once")]
    DuplicateSkillReference(SkillId),

    #[error("unknown skill reference(s): {}", join_ids(.0))]
    UnknownSkillReference(Vec<SkillId>),

    #[error("unrelated content: {0}")]
    UnrelatedContent(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl ProfileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProfileError::NotFound { .. } => ErrorKind::NotFound,
            ProfileError::DuplicateSkillReference(_) => ErrorKind::DuplicateSkillReference,
            ProfileError::UnknownSkillReference(_) => ErrorKind::UnknownSkillReference,
            ProfileError::UnrelatedContent(_) => ErrorKind::UnrelatedContent,
            ProfileError::Validation(_) => ErrorKind::ValidationFailure,
            ProfileError::StorageError(_) => ErrorKind::Storage,
        }
    }
}

impl From<SkillError> for ProfileError {
    fn from(e: SkillError) -> Self {
        match e {
            SkillError::DuplicateReference(id) => ProfileError::DuplicateSkillReference(id),
            SkillError::UnknownReference(ids) => ProfileError::UnknownSkillReference(ids),
            SkillError::StorageError(msg) => ProfileError::StorageError(msg),
            other => ProfileError::Validation(other.to_string()),
        }
    }
}

/// Errors from repository operations (used by trait definitions in proofwork-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_balance_display() {
        let err = KudosError::InsufficientBalance {
            balance: 50,
            requested: 80,
        };
        assert_eq!(
            err.to_string(),
            "insufficient kudos balance: 50 available, 80 requested"
        );
        assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
    }

    #[test]
    fn test_illegal_transition_names_both_states() {
        let err = VacancyError::IllegalLifecycleTransition {
            from: VacancyStatus::Published,
            to: VacancyStatus::Draft,
        };
        let msg = err.to_string();
        assert!(msg.contains("PUBLISHED"));
        assert!(msg.contains("DRAFT"));
    }

    #[test]
    fn test_unknown_reference_lists_ids() {
        let a = SkillId::new();
        let b = SkillId::new();
        let err = SkillError::UnknownReference(vec![a, b]);
        let msg = err.to_string();
        assert!(msg.contains(&a.to_string()));
        assert!(msg.contains(&b.to_string()));
    }

    #[test]
    fn test_skill_error_converts_to_kudos_kind() {
        let id = SkillId::new();
        let err: KudosError = SkillError::DuplicateReference(id).into();
        assert_eq!(err.kind(), ErrorKind::DuplicateSkillReference);

        let err: VacancyError = SkillError::UnknownReference(vec![id]).into();
        assert_eq!(err.kind(), ErrorKind::UnknownSkillReference);
    }

    #[test]
    fn test_error_kind_serializes_screaming() {
        let json = serde_json::to_string(&ErrorKind::UnrelatedContent).unwrap();
        assert_eq!(json, "\"UNRELATED_CONTENT\"");
        assert_eq!(ErrorKind::UnrelatedContent.to_string(), "UNRELATED_CONTENT");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
