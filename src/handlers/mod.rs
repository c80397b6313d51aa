//! Command layer
//!
//! Typed command structs consumed by the [`crate::store::DataStore`]
//! mutators.

mod commands;

pub use commands::{
    AddAgreementCommand, AddAppointmentCommand, AddCaseCommand, AddContractCommand,
    AddDebtorCommand, AddDraftNoteCommand, AddJobCommand, AddTaskCommand, AddUpdateCommand,
    EditUpdateCommand, PaymentReceipt, RegisterPaymentCommand,
};
