//! Domain layer
//!
//! Pure entity types and the installment engine. Nothing in this module
//! touches persistence.

mod amount;
pub mod agreement;
pub mod debtor;
mod error;
pub mod records;
pub mod settings;
pub mod update_log;

pub use agreement::{
    AgreementStatus, DebtorAgreement, Installment, InstallmentStatus, Payment,
};
pub use amount::{is_settled, AmountError, PaymentAmount, SETTLEMENT_TOLERANCE};
pub use debtor::Debtor;
pub use error::DomainError;
pub use records::{
    Appointment, AppointmentType, Case, CaseStatus, CaseType, Contract, ContractStatus,
    ContractType, DraftNote, Job, JobObservation, JobStatus, ServiceType, Task, TaskKind,
    TaskStatus, TaskUpdate,
};
pub use settings::{AppSettings, ChatMessage, ChatSender, SettingsPatch};
pub use update_log::{AgreementUpdate, UpdateRevision};
