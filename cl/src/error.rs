//! Ledger error types

use thiserror::Error;

/// Which kind of record a lookup failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Routine,
    Chore,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Routine => write!(f, "routine"),
            Self::Chore => write!(f, "chore"),
        }
    }
}

/// Errors that can occur during ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Unknown shop item: {0}")]
    UnknownShopItem(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error("Insufficient points: cost {cost}, available {available}")]
    InsufficientPoints { cost: u32, available: i64 },

    #[error("Persisted state is corrupt: {0}")]
    PersistenceCorrupt(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("State file is locked by another process: {0}")]
    Locked(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl LedgerError {
    pub(crate) fn routine_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: RecordKind::Routine,
            id: id.into(),
        }
    }

    pub(crate) fn chore_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: RecordKind::Chore,
            id: id.into(),
        }
    }

    /// Check if this is an expected, user-facing condition rather than a desync or I/O fault
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InsufficientPoints { .. } | Self::PersistenceCorrupt(_))
    }
}

/// Result alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
