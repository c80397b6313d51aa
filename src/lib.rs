//! JurisFinance Library
//!
//! Re-exports modules for integration testing and external use.

pub mod assistant;
pub mod backup;
pub mod domain;
pub mod format;
pub mod handlers;
pub mod report;
pub mod session;
pub mod store;

pub mod config;
mod error;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use domain::{AgreementStatus, DebtorAgreement, Debtor, DomainError, InstallmentStatus};
pub use domain::{PaymentAmount, SETTLEMENT_TOLERANCE};
pub use store::DataStore;
