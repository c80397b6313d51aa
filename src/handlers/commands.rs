//! Command definitions
//!
//! Commands represent intentions to change the system state. Every mutation
//! the store exposes takes an explicit command struct, so required fields
//! are enforced statically and invalid values are caught at construction
//! rather than assumed at the call site.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    AppointmentType, CaseStatus, CaseType, ContractStatus, ContractType, DomainError, JobStatus,
    PaymentAmount, ServiceType, TaskKind, TaskStatus,
};

// =========================================================================
// AddDebtorCommand
// =========================================================================

/// Command to register a new debtor
#[derive(Debug, Clone)]
pub struct AddDebtorCommand {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    pub observations: Option<String>,
}

impl AddDebtorCommand {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::MissingField("name"));
        }
        Ok(Self {
            name,
            email: email.into(),
            company: None,
            phone: None,
            tax_id: None,
            observations: None,
        })
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.tax_id = Some(tax_id.into());
        self
    }

    pub fn with_observations(mut self, observations: impl Into<String>) -> Self {
        self.observations = Some(observations.into());
        self
    }
}

// =========================================================================
// AddAgreementCommand
// =========================================================================

/// Command to create a settlement agreement with a generated installment
/// plan. Structural validation (positive value, at least one installment,
/// sane fee) happens when the aggregate is built.
#[derive(Debug, Clone)]
pub struct AddAgreementCommand {
    pub debtor_id: Uuid,
    pub original_debt: Decimal,
    pub agreement_value: Decimal,
    pub fee_percentage: Decimal,
    pub num_installments: u32,
    pub first_due_date: NaiveDate,
    pub case_number_link: Option<String>,
    pub notes: Option<String>,
}

impl AddAgreementCommand {
    pub fn new(
        debtor_id: Uuid,
        original_debt: Decimal,
        agreement_value: Decimal,
        fee_percentage: Decimal,
        num_installments: u32,
        first_due_date: NaiveDate,
    ) -> Self {
        Self {
            debtor_id,
            original_debt,
            agreement_value,
            fee_percentage,
            num_installments,
            first_due_date,
            case_number_link: None,
            notes: None,
        }
    }

    pub fn with_case_number(mut self, case_number: impl Into<String>) -> Self {
        self.case_number_link = Some(case_number.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

// =========================================================================
// RegisterPaymentCommand
// =========================================================================

/// Command to register a payment against one installment.
///
/// The single entry point that advances money state. The amount is
/// validated here (positive, centavo-grained); whether it fits the
/// installment's outstanding balance is checked against the installment
/// itself when the command executes.
#[derive(Debug, Clone)]
pub struct RegisterPaymentCommand {
    pub agreement_id: Uuid,
    pub installment_id: Uuid,
    pub amount: PaymentAmount,
}

impl RegisterPaymentCommand {
    pub fn new(
        agreement_id: Uuid,
        installment_id: Uuid,
        amount: Decimal,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            agreement_id,
            installment_id,
            amount: PaymentAmount::new(amount)?,
        })
    }
}

/// Result of a successful payment registration
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub payment_id: Uuid,
    pub installment_status: crate::domain::InstallmentStatus,
    pub agreement_status: crate::domain::AgreementStatus,
    /// Lawyer commission on the collected amount
    pub fees: Decimal,
}

// =========================================================================
// Update log commands
// =========================================================================

/// Command to append a free-text update to an agreement
#[derive(Debug, Clone)]
pub struct AddUpdateCommand {
    pub agreement_id: Uuid,
    pub text: String,
}

impl AddUpdateCommand {
    pub fn new(agreement_id: Uuid, text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::BlankUpdateText);
        }
        Ok(Self { agreement_id, text })
    }
}

/// Command to edit an existing agreement update
#[derive(Debug, Clone)]
pub struct EditUpdateCommand {
    pub agreement_id: Uuid,
    pub update_id: Uuid,
    pub new_text: String,
}

impl EditUpdateCommand {
    pub fn new(
        agreement_id: Uuid,
        update_id: Uuid,
        new_text: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let new_text = new_text.into();
        if new_text.trim().is_empty() {
            return Err(DomainError::BlankUpdateText);
        }
        Ok(Self {
            agreement_id,
            update_id,
            new_text,
        })
    }
}

// =========================================================================
// Peripheral record commands
// =========================================================================

/// Command to create a service job
#[derive(Debug, Clone)]
pub struct AddJobCommand {
    pub name: String,
    pub client_id: Uuid,
    pub service_type: ServiceType,
    pub value: Decimal,
    pub deadline: DateTime<Utc>,
    pub status: JobStatus,
    pub notes: Option<String>,
}

impl AddJobCommand {
    pub fn new(
        name: impl Into<String>,
        client_id: Uuid,
        service_type: ServiceType,
        value: Decimal,
        deadline: DateTime<Utc>,
        status: JobStatus,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::MissingField("name"));
        }
        Ok(Self {
            name,
            client_id,
            service_type,
            value,
            deadline,
            status,
            notes: None,
        })
    }
}

/// Command to open a court case record
#[derive(Debug, Clone)]
pub struct AddCaseCommand {
    pub name: String,
    pub case_number: String,
    pub client_id: Uuid,
    pub case_type: CaseType,
    pub status: CaseStatus,
    pub court: Option<String>,
    pub responsible_lawyers: Vec<String>,
}

impl AddCaseCommand {
    pub fn new(
        name: impl Into<String>,
        case_number: impl Into<String>,
        client_id: Uuid,
        case_type: CaseType,
        status: CaseStatus,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::MissingField("name"));
        }
        Ok(Self {
            name,
            case_number: case_number.into(),
            client_id,
            case_type,
            status,
            court: None,
            responsible_lawyers: Vec::new(),
        })
    }
}

/// Command to create a task or deadline
#[derive(Debug, Clone)]
pub struct AddTaskCommand {
    pub title: String,
    pub kind: TaskKind,
    pub due_date: DateTime<Utc>,
    pub assigned_to: String,
    pub status: TaskStatus,
    pub description: Option<String>,
    pub case_id: Option<Uuid>,
}

impl AddTaskCommand {
    pub fn new(
        title: impl Into<String>,
        kind: TaskKind,
        due_date: DateTime<Utc>,
        assigned_to: impl Into<String>,
        status: TaskStatus,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::MissingField("title"));
        }
        Ok(Self {
            title,
            kind,
            due_date,
            assigned_to: assigned_to.into(),
            status,
            description: None,
            case_id: None,
        })
    }
}

/// Command to schedule an appointment
#[derive(Debug, Clone)]
pub struct AddAppointmentCommand {
    pub title: String,
    pub appointment_type: AppointmentType,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub case_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
}

impl AddAppointmentCommand {
    pub fn new(
        title: impl Into<String>,
        appointment_type: AppointmentType,
        date: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::MissingField("title"));
        }
        Ok(Self {
            title,
            appointment_type,
            date,
            location: None,
            notes: None,
            case_id: None,
            client_id: None,
        })
    }
}

/// Command to file a contract record
#[derive(Debug, Clone)]
pub struct AddContractCommand {
    pub name: String,
    pub client_id: Uuid,
    pub contract_type: ContractType,
    pub status: ContractStatus,
    pub start_date: DateTime<Utc>,
    pub value: Option<Decimal>,
    pub success_fee_percentage: Option<Decimal>,
    pub description: Option<String>,
}

impl AddContractCommand {
    pub fn new(
        name: impl Into<String>,
        client_id: Uuid,
        contract_type: ContractType,
        status: ContractStatus,
        start_date: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::MissingField("name"));
        }
        Ok(Self {
            name,
            client_id,
            contract_type,
            status,
            start_date,
            value: None,
            success_fee_percentage: None,
            description: None,
        })
    }
}

/// Command to create a scratchpad draft note
#[derive(Debug, Clone)]
pub struct AddDraftNoteCommand {
    pub title: String,
    pub content: String,
}

impl AddDraftNoteCommand {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payment_command_rejects_non_positive_amount() {
        let result = RegisterPaymentCommand::new(Uuid::new_v4(), Uuid::new_v4(), dec!(0));
        assert!(result.is_err());

        let result = RegisterPaymentCommand::new(Uuid::new_v4(), Uuid::new_v4(), dec!(-5));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_command_rejects_blank_text() {
        let result = AddUpdateCommand::new(Uuid::new_v4(), "   ");
        assert!(matches!(result, Err(DomainError::BlankUpdateText)));
    }

    #[test]
    fn test_debtor_command_requires_name() {
        let result = AddDebtorCommand::new("", "a@b.com");
        assert!(matches!(result, Err(DomainError::MissingField("name"))));
    }

    #[test]
    fn test_job_command_carries_fields() {
        let client_id = Uuid::new_v4();
        let cmd = AddJobCommand::new(
            "Website redesign",
            client_id,
            ServiceType::Website,
            dec!(12000),
            Utc::now(),
            JobStatus::Briefing,
        )
        .unwrap();

        assert_eq!(cmd.client_id, client_id);
        assert_eq!(cmd.status, JobStatus::Briefing);
    }
}
