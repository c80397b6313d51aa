//! Peripheral record operations
//!
//! Store mutators for jobs, cases, tasks, appointments, contracts and draft
//! notes. Same conventions as the core collections: whole-record replace by
//! id, soft-delete and archive flags, write-through snapshot per mutation.

use chrono::Utc;
use uuid::Uuid;

use super::{keys, write_snapshot, DataStore, StorageError};
use crate::domain::{
    Appointment, Case, Contract, DraftNote, Job, JobObservation, Task, TaskStatus, TaskUpdate,
};
use crate::error::{AppError, AppResult};
use crate::handlers::{
    AddAppointmentCommand, AddCaseCommand, AddContractCommand, AddDraftNoteCommand, AddJobCommand,
    AddTaskCommand,
};

fn not_found(kind: &'static str, id: Uuid) -> AppError {
    AppError::RecordNotFound { kind, id }
}

impl DataStore {
    pub(super) fn persist_jobs(&mut self) -> Result<(), StorageError> {
        write_snapshot(self.backend.as_mut(), keys::JOBS, &self.jobs)
    }

    pub(super) fn persist_cases(&mut self) -> Result<(), StorageError> {
        write_snapshot(self.backend.as_mut(), keys::CASES, &self.cases)
    }

    pub(super) fn persist_tasks(&mut self) -> Result<(), StorageError> {
        write_snapshot(self.backend.as_mut(), keys::TASKS, &self.tasks)
    }

    pub(super) fn persist_appointments(&mut self) -> Result<(), StorageError> {
        write_snapshot(self.backend.as_mut(), keys::APPOINTMENTS, &self.appointments)
    }

    pub(super) fn persist_contracts(&mut self) -> Result<(), StorageError> {
        write_snapshot(self.backend.as_mut(), keys::CONTRACTS, &self.contracts)
    }

    pub(super) fn persist_draft_notes(&mut self) -> Result<(), StorageError> {
        write_snapshot(self.backend.as_mut(), keys::DRAFT_NOTES, &self.draft_notes)
    }

    // =====================================================================
    // Jobs
    // =====================================================================

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn add_job(&mut self, command: AddJobCommand) -> AppResult<Uuid> {
        if self.debtor(command.client_id).is_none() {
            return Err(AppError::DebtorNotFound(command.client_id));
        }
        let mut job = Job::new(
            command.name,
            command.client_id,
            command.service_type,
            command.value,
            command.deadline,
            command.status,
        );
        job.notes = command.notes;

        let id = job.id;
        self.jobs.push(job);
        self.persist_jobs()?;
        Ok(id)
    }

    pub fn update_job(&mut self, job: Job) -> AppResult<()> {
        let slot = self
            .jobs
            .iter_mut()
            .find(|j| j.id == job.id)
            .ok_or_else(|| not_found("Job", job.id))?;
        *slot = job;
        self.persist_jobs()?;
        Ok(())
    }

    pub fn soft_delete_job(&mut self, job_id: Uuid) -> AppResult<()> {
        let job = self
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .ok_or_else(|| not_found("Job", job_id))?;
        job.is_deleted = true;
        self.persist_jobs()?;
        Ok(())
    }

    pub fn restore_job(&mut self, job_id: Uuid) -> AppResult<()> {
        let job = self
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .ok_or_else(|| not_found("Job", job_id))?;
        job.is_deleted = false;
        self.persist_jobs()?;
        Ok(())
    }

    pub fn permanently_delete_job(&mut self, job_id: Uuid) -> AppResult<()> {
        let before = self.jobs.len();
        self.jobs.retain(|j| j.id != job_id);
        if self.jobs.len() == before {
            return Err(not_found("Job", job_id));
        }
        self.persist_jobs()?;
        Ok(())
    }

    /// Append a dated observation to a job's log.
    pub fn add_job_observation(
        &mut self,
        job_id: Uuid,
        text: impl Into<String>,
    ) -> AppResult<Uuid> {
        let job = self
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .ok_or_else(|| not_found("Job", job_id))?;
        let observation = JobObservation {
            id: Uuid::new_v4(),
            text: text.into(),
            timestamp: Utc::now(),
        };
        let id = observation.id;
        job.observations_log.push(observation);
        self.persist_jobs()?;
        Ok(id)
    }

    /// Move a job to the paid archive, stamping payment details.
    pub fn mark_job_paid(
        &mut self,
        job_id: Uuid,
        method: Option<String>,
        notes: Option<String>,
    ) -> AppResult<()> {
        let job = self
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .ok_or_else(|| not_found("Job", job_id))?;
        job.status = crate::domain::JobStatus::Paid;
        job.paid_at = Some(Utc::now());
        job.payment_method = method;
        job.payment_notes = notes;
        self.persist_jobs()?;
        Ok(())
    }

    // =====================================================================
    // Cases
    // =====================================================================

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn add_case(&mut self, command: AddCaseCommand) -> AppResult<Uuid> {
        let mut case = Case::new(
            command.name,
            command.case_number,
            command.client_id,
            command.case_type,
            command.status,
        );
        case.court = command.court;
        case.responsible_lawyers = command.responsible_lawyers;

        let id = case.id;
        self.cases.push(case);
        self.persist_cases()?;
        Ok(id)
    }

    pub fn update_case(&mut self, case: Case) -> AppResult<()> {
        let slot = self
            .cases
            .iter_mut()
            .find(|c| c.id == case.id)
            .ok_or_else(|| not_found("Case", case.id))?;
        *slot = case;
        self.persist_cases()?;
        Ok(())
    }

    pub fn set_case_deleted(&mut self, case_id: Uuid, deleted: bool) -> AppResult<()> {
        let case = self
            .cases
            .iter_mut()
            .find(|c| c.id == case_id)
            .ok_or_else(|| not_found("Case", case_id))?;
        case.is_deleted = deleted;
        self.persist_cases()?;
        Ok(())
    }

    pub fn toggle_case_archive(&mut self, case_id: Uuid) -> AppResult<()> {
        let case = self
            .cases
            .iter_mut()
            .find(|c| c.id == case_id)
            .ok_or_else(|| not_found("Case", case_id))?;
        case.is_archived = !case.is_archived;
        self.persist_cases()?;
        Ok(())
    }

    pub fn permanently_delete_case(&mut self, case_id: Uuid) -> AppResult<()> {
        let before = self.cases.len();
        self.cases.retain(|c| c.id != case_id);
        if self.cases.len() == before {
            return Err(not_found("Case", case_id));
        }
        self.persist_cases()?;
        Ok(())
    }

    // =====================================================================
    // Tasks
    // =====================================================================

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn add_task(&mut self, command: AddTaskCommand) -> AppResult<Uuid> {
        let mut task = Task::new(
            command.title,
            command.kind,
            command.due_date,
            command.assigned_to,
            command.status,
        );
        task.description = command.description;
        task.case_id = command.case_id;

        let id = task.id;
        self.tasks.push(task);
        self.persist_tasks()?;
        Ok(id)
    }

    pub fn update_task(&mut self, task: Task) -> AppResult<()> {
        let slot = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| not_found("Task", task.id))?;
        *slot = task;
        self.persist_tasks()?;
        Ok(())
    }

    /// Change a task's status. Completion is stamped the first time the
    /// task reaches Done and cleared if it moves back.
    pub fn set_task_status(&mut self, task_id: Uuid, status: TaskStatus) -> AppResult<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| not_found("Task", task_id))?;
        task.status = status;
        task.completed_at = match status {
            TaskStatus::Done => task.completed_at.or_else(|| Some(Utc::now())),
            _ => None,
        };
        self.persist_tasks()?;
        Ok(())
    }

    pub fn set_task_deleted(&mut self, task_id: Uuid, deleted: bool) -> AppResult<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| not_found("Task", task_id))?;
        task.is_deleted = deleted;
        self.persist_tasks()?;
        Ok(())
    }

    pub fn toggle_task_archive(&mut self, task_id: Uuid) -> AppResult<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| not_found("Task", task_id))?;
        task.is_archived = !task.is_archived;
        self.persist_tasks()?;
        Ok(())
    }

    pub fn permanently_delete_task(&mut self, task_id: Uuid) -> AppResult<()> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task_id);
        if self.tasks.len() == before {
            return Err(not_found("Task", task_id));
        }
        self.persist_tasks()?;
        Ok(())
    }

    pub fn add_task_update(&mut self, task_id: Uuid, text: impl Into<String>) -> AppResult<Uuid> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| not_found("Task", task_id))?;
        let update = TaskUpdate::new(text);
        let id = update.id;
        task.updates.push(update);
        self.persist_tasks()?;
        Ok(id)
    }

    /// Replace a task update's text in place; only the last-edited time is
    /// kept, there is no revision history here.
    pub fn edit_task_update(
        &mut self,
        task_id: Uuid,
        update_id: Uuid,
        new_text: impl Into<String>,
    ) -> AppResult<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| not_found("Task", task_id))?;
        let update = task
            .updates
            .iter_mut()
            .find(|u| u.id == update_id)
            .ok_or(AppError::UpdateNotFound(update_id))?;
        update.text = new_text.into();
        update.updated_at = Some(Utc::now());
        self.persist_tasks()?;
        Ok(())
    }

    // =====================================================================
    // Appointments
    // =====================================================================

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn add_appointment(&mut self, command: AddAppointmentCommand) -> AppResult<Uuid> {
        let mut appointment =
            Appointment::new(command.title, command.appointment_type, command.date);
        appointment.location = command.location;
        appointment.notes = command.notes;
        appointment.case_id = command.case_id;
        appointment.client_id = command.client_id;

        let id = appointment.id;
        self.appointments.push(appointment);
        self.persist_appointments()?;
        Ok(id)
    }

    pub fn update_appointment(&mut self, appointment: Appointment) -> AppResult<()> {
        let slot = self
            .appointments
            .iter_mut()
            .find(|a| a.id == appointment.id)
            .ok_or_else(|| not_found("Appointment", appointment.id))?;
        *slot = appointment;
        self.persist_appointments()?;
        Ok(())
    }

    /// Appointments have no soft-delete flag; removal is final.
    pub fn delete_appointment(&mut self, appointment_id: Uuid) -> AppResult<()> {
        let before = self.appointments.len();
        self.appointments.retain(|a| a.id != appointment_id);
        if self.appointments.len() == before {
            return Err(not_found("Appointment", appointment_id));
        }
        self.persist_appointments()?;
        Ok(())
    }

    // =====================================================================
    // Contracts
    // =====================================================================

    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    pub fn add_contract(&mut self, command: AddContractCommand) -> AppResult<Uuid> {
        if self.debtor(command.client_id).is_none() {
            return Err(AppError::DebtorNotFound(command.client_id));
        }
        let mut contract = Contract::new(
            command.name,
            command.client_id,
            command.contract_type,
            command.status,
            command.start_date,
        );
        contract.value = command.value;
        contract.success_fee_percentage = command.success_fee_percentage;
        contract.description = command.description;

        let id = contract.id;
        self.contracts.push(contract);
        self.persist_contracts()?;
        Ok(id)
    }

    pub fn update_contract(&mut self, contract: Contract) -> AppResult<()> {
        let slot = self
            .contracts
            .iter_mut()
            .find(|c| c.id == contract.id)
            .ok_or_else(|| not_found("Contract", contract.id))?;
        *slot = contract;
        self.persist_contracts()?;
        Ok(())
    }

    pub fn set_contract_deleted(&mut self, contract_id: Uuid, deleted: bool) -> AppResult<()> {
        let contract = self
            .contracts
            .iter_mut()
            .find(|c| c.id == contract_id)
            .ok_or_else(|| not_found("Contract", contract_id))?;
        contract.is_deleted = deleted;
        self.persist_contracts()?;
        Ok(())
    }

    pub fn toggle_contract_archive(&mut self, contract_id: Uuid) -> AppResult<()> {
        let contract = self
            .contracts
            .iter_mut()
            .find(|c| c.id == contract_id)
            .ok_or_else(|| not_found("Contract", contract_id))?;
        contract.is_archived = !contract.is_archived;
        self.persist_contracts()?;
        Ok(())
    }

    pub fn permanently_delete_contract(&mut self, contract_id: Uuid) -> AppResult<()> {
        let before = self.contracts.len();
        self.contracts.retain(|c| c.id != contract_id);
        if self.contracts.len() == before {
            return Err(not_found("Contract", contract_id));
        }
        self.persist_contracts()?;
        Ok(())
    }

    // =====================================================================
    // Draft notes
    // =====================================================================

    pub fn draft_notes(&self) -> &[DraftNote] {
        &self.draft_notes
    }

    pub fn add_draft_note(&mut self, command: AddDraftNoteCommand) -> AppResult<Uuid> {
        let note = DraftNote::new(command.title, command.content);
        let id = note.id;
        self.draft_notes.push(note);
        self.persist_draft_notes()?;
        Ok(id)
    }

    pub fn update_draft_note(
        &mut self,
        note_id: Uuid,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> AppResult<()> {
        let note = self
            .draft_notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or_else(|| not_found("Draft note", note_id))?;
        note.title = title.into();
        note.content = content.into();
        note.updated_at = Utc::now();
        self.persist_draft_notes()?;
        Ok(())
    }

    pub fn delete_draft_note(&mut self, note_id: Uuid) -> AppResult<()> {
        let before = self.draft_notes.len();
        self.draft_notes.retain(|n| n.id != note_id);
        if self.draft_notes.len() == before {
            return Err(not_found("Draft note", note_id));
        }
        self.persist_draft_notes()?;
        Ok(())
    }
}
