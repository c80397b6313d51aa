//! Error handling module
//!
//! Centralized application error type. Layer-specific errors (domain,
//! storage, backup, config) convert into [`AppError`] with `#[from]`.

use uuid::Uuid;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Debtor not found: {0}")]
    DebtorNotFound(Uuid),

    #[error("Agreement not found: {0}")]
    AgreementNotFound(Uuid),

    #[error("Installment not found: {0}")]
    InstallmentNotFound(Uuid),

    #[error("Agreement update not found: {0}")]
    UpdateNotFound(Uuid),

    #[error("{kind} not found: {id}")]
    RecordNotFound { kind: &'static str, id: Uuid },

    // Domain errors
    #[error(transparent)]
    Domain(#[from] crate::domain::DomainError),

    // Infrastructure errors
    #[error("Storage error: {0}")]
    Storage(#[from] crate::store::StorageError),

    #[error(transparent)]
    Backup(#[from] crate::backup::BackupError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_not_found_message() {
        let id = Uuid::nil();
        let err = AppError::RecordNotFound { kind: "Job", id };
        assert_eq!(err.to_string(), format!("Job not found: {id}"));
    }
}
