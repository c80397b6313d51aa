//! Peripheral office records
//!
//! Jobs, cases, tasks, appointments, contracts and draft notes. These share
//! the soft-delete / archive / creation-timestamp lifecycle convention but
//! have no coupling to the installment engine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =========================================================================
// Jobs
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "Vídeo")]
    Video,
    #[serde(rename = "Design Gráfico")]
    Design,
    #[serde(rename = "Social Media")]
    SocialMedia,
    #[serde(rename = "Website")]
    Website,
    #[serde(rename = "Consultoria")]
    Consulting,
    #[serde(rename = "Outro")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "Briefing")]
    Briefing,
    #[serde(rename = "Produção")]
    Production,
    #[serde(rename = "Revisão")]
    Review,
    #[serde(rename = "Finalizado")]
    Finalized,
    #[serde(rename = "Pago (Arquivo)")]
    Paid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobObservation {
    pub id: Uuid,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A billable service job for a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub name: String,
    pub client_id: Uuid,
    pub service_type: ServiceType,
    pub value: Decimal,
    pub deadline: DateTime<Utc>,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub is_pre_paid: bool,
    #[serde(default)]
    pub observations_log: Vec<JobObservation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_notes: Option<String>,
}

impl Job {
    pub fn new(
        name: impl Into<String>,
        client_id: Uuid,
        service_type: ServiceType,
        value: Decimal,
        deadline: DateTime<Utc>,
        status: JobStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            client_id,
            service_type,
            value,
            deadline,
            status,
            notes: None,
            created_at: Utc::now(),
            is_deleted: false,
            is_pre_paid: false,
            observations_log: Vec::new(),
            paid_at: None,
            payment_method: None,
            payment_notes: None,
        }
    }
}

// =========================================================================
// Cases
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    #[serde(rename = "Ativo")]
    Active,
    #[serde(rename = "Suspenso")]
    Suspended,
    #[serde(rename = "Encerrado com Êxito")]
    ClosedWon,
    #[serde(rename = "Encerrado sem Êxito")]
    ClosedLost,
    #[serde(rename = "Arquivado")]
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseType {
    #[serde(rename = "Cível")]
    Civil,
    #[serde(rename = "Trabalhista")]
    Labor,
    #[serde(rename = "Penal")]
    Criminal,
    #[serde(rename = "Tributário")]
    Tax,
    #[serde(rename = "Empresarial")]
    Corporate,
    #[serde(rename = "Consumidor")]
    Consumer,
    #[serde(rename = "Outro")]
    Other,
}

/// A court case handled by the practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: Uuid,
    pub name: String,
    pub case_number: String,
    pub client_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<String>,
    pub case_type: CaseType,
    pub status: CaseStatus,
    #[serde(default)]
    pub responsible_lawyers: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub is_archived: bool,
}

impl Case {
    pub fn new(
        name: impl Into<String>,
        case_number: impl Into<String>,
        client_id: Uuid,
        case_type: CaseType,
        status: CaseStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            case_number: case_number.into(),
            client_id,
            court: None,
            case_type,
            status,
            responsible_lawyers: Vec::new(),
            created_at: Utc::now(),
            is_deleted: false,
            is_archived: false,
        }
    }
}

// =========================================================================
// Tasks
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "Pendente")]
    Pending,
    #[serde(rename = "Fazendo")]
    InProgress,
    #[serde(rename = "Concluída")]
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    #[serde(rename = "Prazo")]
    Deadline,
    #[serde(rename = "Tarefa")]
    Task,
}

/// A progress note on a task. Unlike agreement updates, task updates keep
/// no edit history, only the last-edited time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub id: Uuid,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskUpdate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            timestamp: Utc::now(),
            updated_at: None,
        }
    }
}

/// A deadline or to-do item, optionally linked to a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub due_date: DateTime<Utc>,
    pub assigned_to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<Uuid>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub updates: Vec<TaskUpdate>,
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        kind: TaskKind,
        due_date: DateTime<Utc>,
        assigned_to: impl Into<String>,
        status: TaskStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            kind,
            due_date,
            assigned_to: assigned_to.into(),
            description: None,
            case_id: None,
            status,
            created_at: Utc::now(),
            completed_at: None,
            is_deleted: false,
            is_archived: false,
            updates: Vec::new(),
        }
    }
}

// =========================================================================
// Appointments
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentType {
    #[serde(rename = "Reunião")]
    Meeting,
    #[serde(rename = "Audiência")]
    Hearing,
    #[serde(rename = "Sustentação Oral")]
    OralArgument,
    #[serde(rename = "Prazo Interno")]
    InternalDeadline,
    #[serde(rename = "Outro")]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub title: String,
    pub appointment_type: AppointmentType,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Uuid>,
}

impl Appointment {
    pub fn new(
        title: impl Into<String>,
        appointment_type: AppointmentType,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            appointment_type,
            date,
            location: None,
            notes: None,
            case_id: None,
            client_id: None,
        }
    }
}

// =========================================================================
// Contracts
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractType {
    #[serde(rename = "Pró-Labore")]
    ProLabore,
    #[serde(rename = "Ad Exitum")]
    AdExitum,
    #[serde(rename = "Retainer (Mensal)")]
    Retainer,
    #[serde(rename = "Por Hora")]
    Hourly,
    #[serde(rename = "Misto")]
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
    #[serde(rename = "Rascunho")]
    Draft,
    #[serde(rename = "Enviado")]
    Sent,
    #[serde(rename = "Assinado")]
    Signed,
    #[serde(rename = "Expirado")]
    Expired,
    #[serde(rename = "Cancelado")]
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Uuid,
    pub name: String,
    pub client_id: Uuid,
    pub contract_type: ContractType,
    pub status: ContractStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_fee_percentage: Option<Decimal>,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub is_archived: bool,
}

impl Contract {
    pub fn new(
        name: impl Into<String>,
        client_id: Uuid,
        contract_type: ContractType,
        status: ContractStatus,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            client_id,
            contract_type,
            status,
            value: None,
            success_fee_percentage: None,
            start_date,
            description: None,
            created_at: Utc::now(),
            is_deleted: false,
            is_archived: false,
        }
    }
}

// =========================================================================
// Draft notes
// =========================================================================

/// A scratchpad note. Deleted permanently, never soft-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftNote {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DraftNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
