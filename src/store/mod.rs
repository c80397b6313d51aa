//! Data Store
//!
//! Process-wide state holding every entity collection, loaded synchronously
//! at startup and written through to the keyed persistence backend on every
//! mutation. The store is an explicitly constructed state owner: callers
//! hold it and pass it around, there is no ambient singleton.
//!
//! Mutations never partially apply. Each operation either fully replaces an
//! item in a collection (matched by id), appends one, or removes one, and
//! then persists that collection's full snapshot.

mod error;
mod kv;
mod records;

pub use error::StorageError;
pub use kv::{keys, FileStore, KeyStore, MemoryStore};

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal_macros::dec;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    AgreementUpdate, AppSettings, Appointment, Case, ChatMessage, Contract, Debtor,
    DebtorAgreement, DraftNote, InstallmentStatus, Job, Payment, SettingsPatch, Task,
};
use crate::error::{AppError, AppResult};
use crate::handlers::{
    AddAgreementCommand, AddDebtorCommand, AddUpdateCommand, EditUpdateCommand, PaymentReceipt,
    RegisterPaymentCommand,
};

/// Serialize a collection and write its full snapshot under `key`.
fn write_snapshot<T: Serialize>(
    backend: &mut dyn KeyStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    backend.put(key, &json)
}

/// Read and parse one key; absent keys are not an error.
fn read_key<T: DeserializeOwned>(
    backend: &dyn KeyStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match backend.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

// =========================================================================
// DataStore
// =========================================================================

pub struct DataStore {
    backend: Box<dyn KeyStore>,

    debtors: Vec<Debtor>,
    agreements: Vec<DebtorAgreement>,
    settings: AppSettings,
    chat_history: Vec<ChatMessage>,
    pub(crate) jobs: Vec<Job>,
    pub(crate) cases: Vec<Case>,
    pub(crate) tasks: Vec<Task>,
    pub(crate) appointments: Vec<Appointment>,
    pub(crate) contracts: Vec<Contract>,
    pub(crate) draft_notes: Vec<DraftNote>,

    // Session flags. Only `authenticated` is persisted.
    authenticated: bool,
    resting: bool,
}

/// Everything `load` reads before the store exists.
struct LoadedState {
    debtors: Vec<Debtor>,
    agreements: Vec<DebtorAgreement>,
    settings: AppSettings,
    chat_history: Vec<ChatMessage>,
    jobs: Vec<Job>,
    cases: Vec<Case>,
    tasks: Vec<Task>,
    appointments: Vec<Appointment>,
    contracts: Vec<Contract>,
    draft_notes: Vec<DraftNote>,
    authenticated: bool,
}

impl LoadedState {
    fn read(backend: &dyn KeyStore) -> Result<Self, StorageError> {
        let (seed_debtors, seed_agreements) = seed_data();
        Ok(Self {
            debtors: read_key(backend, keys::DEBTORS)?.unwrap_or(seed_debtors),
            agreements: read_key(backend, keys::AGREEMENTS)?.unwrap_or(seed_agreements),
            settings: read_key(backend, keys::SETTINGS)?.unwrap_or_default(),
            chat_history: read_key(backend, keys::CHAT_HISTORY)?.unwrap_or_default(),
            jobs: read_key(backend, keys::JOBS)?.unwrap_or_default(),
            cases: read_key(backend, keys::CASES)?.unwrap_or_default(),
            tasks: read_key(backend, keys::TASKS)?.unwrap_or_default(),
            appointments: read_key(backend, keys::APPOINTMENTS)?.unwrap_or_default(),
            contracts: read_key(backend, keys::CONTRACTS)?.unwrap_or_default(),
            draft_notes: read_key(backend, keys::DRAFT_NOTES)?.unwrap_or_default(),
            authenticated: read_key(backend, keys::AUTHENTICATED)?.unwrap_or(false),
        })
    }

    fn seeded() -> Self {
        let (debtors, agreements) = seed_data();
        Self {
            debtors,
            agreements,
            settings: AppSettings::default(),
            chat_history: Vec::new(),
            jobs: Vec::new(),
            cases: Vec::new(),
            tasks: Vec::new(),
            appointments: Vec::new(),
            contracts: Vec::new(),
            draft_notes: Vec::new(),
            authenticated: false,
        }
    }
}

/// Built-in sample data used on first run and after a corrupt-storage reset.
fn seed_data() -> (Vec<Debtor>, Vec<DebtorAgreement>) {
    let debtor_a = Debtor::new("Infratech Ltda", "financeiro@infratech.com")
        .with_company("Tecnologia")
        .with_phone("11999998888")
        .with_tax_id("11.222.333/0001-44")
        .with_observations("Contato principal: Sr. Antunes");
    let debtor_b = Debtor::new("Carlos Ferreira", "carlos.ferreira@email.com")
        .with_tax_id("111.222.333-44")
        .with_observations("Negociação difícil.");

    let first_due = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap_or_default();
    let mut agreement = DebtorAgreement::new(
        debtor_a.id,
        dec!(100000),
        dec!(80000),
        dec!(20),
        8,
        first_due,
    )
    .expect("seed agreement parameters are valid")
    .with_case_number("0012345-67.2023.8.26.0100");

    // First two installments already collected
    for installment in agreement.installments.iter_mut().take(2) {
        let paid_on = installment.due_date.date_naive().pred_opt().unwrap_or(first_due);
        installment.paid_amount = installment.value;
        installment.status = InstallmentStatus::Paid;
        installment.payment_history.push(Payment {
            id: Uuid::new_v4(),
            date: Utc.from_utc_datetime(&paid_on.and_time(NaiveTime::MIN)),
            amount: installment.value,
            method: Some("PIX".to_string()),
            notes: None,
        });
    }

    (vec![debtor_a, debtor_b], vec![agreement])
}

impl DataStore {
    /// Load all collections from the backend.
    ///
    /// Any read or parse failure resets **all** collections to the built-in
    /// defaults; there is no per-collection recovery. Every loaded agreement
    /// is recalculated before being held, so stale status snapshots
    /// self-correct on each session start. Absent keys simply fall back to
    /// their defaults (first run).
    pub fn load(backend: Box<dyn KeyStore>) -> Self {
        Self::load_with_today(backend, Utc::now().date_naive())
    }

    /// Same as [`DataStore::load`] with an explicit "today" for the status
    /// recalculation.
    pub fn load_with_today(backend: Box<dyn KeyStore>, today: NaiveDate) -> Self {
        let state = match LoadedState::read(backend.as_ref()) {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Failed to load persisted state, resetting all collections to defaults"
                );
                LoadedState::seeded()
            }
        };

        let mut store = Self {
            backend,
            debtors: state.debtors,
            agreements: state.agreements,
            settings: state.settings,
            chat_history: state.chat_history,
            jobs: state.jobs,
            cases: state.cases,
            tasks: state.tasks,
            appointments: state.appointments,
            contracts: state.contracts,
            draft_notes: state.draft_notes,
            authenticated: state.authenticated,
            resting: false,
        };

        for agreement in &mut store.agreements {
            agreement.recalculate(today);
        }

        // Write every snapshot back right away: a first run (or a
        // corrupt-storage reseed) is fully exportable before any mutation,
        // and recalculated statuses reach disk immediately
        if let Err(e) = store.persist_all() {
            tracing::error!(error = %e, "Failed to persist loaded state");
        }
        store
    }

    pub fn backend(&self) -> &dyn KeyStore {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> &mut dyn KeyStore {
        self.backend.as_mut()
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    pub fn debtors(&self) -> &[Debtor] {
        &self.debtors
    }

    pub fn agreements(&self) -> &[DebtorAgreement] {
        &self.agreements
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        &self.chat_history
    }

    pub fn debtor(&self, debtor_id: Uuid) -> Option<&Debtor> {
        self.debtors.iter().find(|d| d.id == debtor_id)
    }

    pub fn agreement(&self, agreement_id: Uuid) -> Option<&DebtorAgreement> {
        self.agreements.iter().find(|a| a.id == agreement_id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_resting(&self) -> bool {
        self.resting
    }

    // =====================================================================
    // Snapshot writers
    // =====================================================================

    fn persist_debtors(&mut self) -> Result<(), StorageError> {
        write_snapshot(self.backend.as_mut(), keys::DEBTORS, &self.debtors)
    }

    fn persist_agreements(&mut self) -> Result<(), StorageError> {
        write_snapshot(self.backend.as_mut(), keys::AGREEMENTS, &self.agreements)
    }

    fn persist_settings(&mut self) -> Result<(), StorageError> {
        write_snapshot(self.backend.as_mut(), keys::SETTINGS, &self.settings)
    }

    fn persist_chat_history(&mut self) -> Result<(), StorageError> {
        write_snapshot(self.backend.as_mut(), keys::CHAT_HISTORY, &self.chat_history)
    }

    fn persist_authenticated(&mut self) -> Result<(), StorageError> {
        write_snapshot(self.backend.as_mut(), keys::AUTHENTICATED, &self.authenticated)
    }

    fn persist_all(&mut self) -> Result<(), StorageError> {
        self.persist_debtors()?;
        self.persist_agreements()?;
        self.persist_settings()?;
        self.persist_chat_history()?;
        self.persist_authenticated()?;
        self.persist_jobs()?;
        self.persist_cases()?;
        self.persist_tasks()?;
        self.persist_appointments()?;
        self.persist_contracts()?;
        self.persist_draft_notes()
    }

    // =====================================================================
    // Debtors
    // =====================================================================

    pub fn add_debtor(&mut self, command: AddDebtorCommand) -> AppResult<Uuid> {
        let mut debtor = Debtor::new(command.name, command.email);
        debtor.company = command.company;
        debtor.phone = command.phone;
        debtor.tax_id = command.tax_id;
        debtor.observations = command.observations;

        let id = debtor.id;
        self.debtors.push(debtor);
        self.persist_debtors()?;
        Ok(id)
    }

    /// Whole-record replace by id.
    pub fn update_debtor(&mut self, debtor: Debtor) -> AppResult<()> {
        let slot = self
            .debtors
            .iter_mut()
            .find(|d| d.id == debtor.id)
            .ok_or(AppError::DebtorNotFound(debtor.id))?;
        *slot = debtor;
        self.persist_debtors()?;
        Ok(())
    }

    pub fn toggle_debtor_archive(&mut self, debtor_id: Uuid) -> AppResult<()> {
        let debtor = self
            .debtors
            .iter_mut()
            .find(|d| d.id == debtor_id)
            .ok_or(AppError::DebtorNotFound(debtor_id))?;
        debtor.is_archived = !debtor.is_archived;
        self.persist_debtors()?;
        Ok(())
    }

    pub fn soft_delete_debtor(&mut self, debtor_id: Uuid) -> AppResult<()> {
        self.set_debtor_deleted(debtor_id, true)
    }

    pub fn restore_debtor(&mut self, debtor_id: Uuid) -> AppResult<()> {
        self.set_debtor_deleted(debtor_id, false)
    }

    fn set_debtor_deleted(&mut self, debtor_id: Uuid, deleted: bool) -> AppResult<()> {
        let debtor = self
            .debtors
            .iter_mut()
            .find(|d| d.id == debtor_id)
            .ok_or(AppError::DebtorNotFound(debtor_id))?;
        debtor.is_deleted = deleted;
        self.persist_debtors()?;
        Ok(())
    }

    /// Irreversible removal from the collection.
    pub fn permanently_delete_debtor(&mut self, debtor_id: Uuid) -> AppResult<()> {
        let before = self.debtors.len();
        self.debtors.retain(|d| d.id != debtor_id);
        if self.debtors.len() == before {
            return Err(AppError::DebtorNotFound(debtor_id));
        }
        self.persist_debtors()?;
        Ok(())
    }

    // =====================================================================
    // Agreements
    // =====================================================================

    pub fn add_agreement(&mut self, command: AddAgreementCommand) -> AppResult<Uuid> {
        if self.debtor(command.debtor_id).is_none() {
            return Err(AppError::DebtorNotFound(command.debtor_id));
        }

        let mut agreement = DebtorAgreement::new(
            command.debtor_id,
            command.original_debt,
            command.agreement_value,
            command.fee_percentage,
            command.num_installments,
            command.first_due_date,
        )?;
        agreement.case_number_link = command.case_number_link;
        agreement.notes = command.notes;

        let id = agreement.id;
        self.agreements.push(agreement);
        self.persist_agreements()?;
        Ok(id)
    }

    /// Whole-record replace by id, followed by a status recalculation.
    ///
    /// The installment plan structure is fixed at creation; callers edit
    /// fields like notes, fee or due dates but keep the same installments.
    pub fn update_agreement(&mut self, agreement: DebtorAgreement) -> AppResult<()> {
        let today = Utc::now().date_naive();
        let slot = self
            .agreements
            .iter_mut()
            .find(|a| a.id == agreement.id)
            .ok_or(AppError::AgreementNotFound(agreement.id))?;
        *slot = agreement;
        slot.recalculate(today);
        self.persist_agreements()?;
        Ok(())
    }

    pub fn toggle_agreement_archive(&mut self, agreement_id: Uuid) -> AppResult<()> {
        let agreement = self.agreement_mut(agreement_id)?;
        agreement.is_archived = !agreement.is_archived;
        self.persist_agreements()?;
        Ok(())
    }

    pub fn soft_delete_agreement(&mut self, agreement_id: Uuid) -> AppResult<()> {
        let agreement = self.agreement_mut(agreement_id)?;
        agreement.is_deleted = true;
        self.persist_agreements()?;
        Ok(())
    }

    pub fn restore_agreement(&mut self, agreement_id: Uuid) -> AppResult<()> {
        let agreement = self.agreement_mut(agreement_id)?;
        agreement.is_deleted = false;
        self.persist_agreements()?;
        Ok(())
    }

    pub fn permanently_delete_agreement(&mut self, agreement_id: Uuid) -> AppResult<()> {
        let before = self.agreements.len();
        self.agreements.retain(|a| a.id != agreement_id);
        if self.agreements.len() == before {
            return Err(AppError::AgreementNotFound(agreement_id));
        }
        self.persist_agreements()?;
        Ok(())
    }

    fn agreement_mut(&mut self, agreement_id: Uuid) -> AppResult<&mut DebtorAgreement> {
        self.agreements
            .iter_mut()
            .find(|a| a.id == agreement_id)
            .ok_or(AppError::AgreementNotFound(agreement_id))
    }

    // =====================================================================
    // Payment registration
    // =====================================================================

    /// Register a payment against one installment of one agreement.
    ///
    /// Appends the payment record, accumulates the installment's paid
    /// amount, re-derives its status, recalculates the owning agreement and
    /// persists the collection. Registered payments cannot be reversed.
    pub fn register_payment(
        &mut self,
        command: RegisterPaymentCommand,
    ) -> AppResult<PaymentReceipt> {
        self.register_payment_at(command, Utc::now())
    }

    pub fn register_payment_with_today(
        &mut self,
        command: RegisterPaymentCommand,
        today: NaiveDate,
    ) -> AppResult<PaymentReceipt> {
        self.register_payment_at(command, Utc.from_utc_datetime(&today.and_time(NaiveTime::MIN)))
    }

    /// The payment record and the status recalculation share one clock, so
    /// the recorded payment date always matches the day statuses were
    /// derived against.
    fn register_payment_at(
        &mut self,
        command: RegisterPaymentCommand,
        now: DateTime<Utc>,
    ) -> AppResult<PaymentReceipt> {
        let today = now.date_naive();
        let agreement = self
            .agreements
            .iter_mut()
            .find(|a| a.id == command.agreement_id)
            .ok_or(AppError::AgreementNotFound(command.agreement_id))?;

        let installment = agreement
            .installment_mut(command.installment_id)
            .ok_or(AppError::InstallmentNotFound(command.installment_id))?;

        let payment_id = installment
            .register_payment(command.amount, now)
            .map_err(AppError::from)?;
        let installment_status = installment.status;

        agreement.recalculate(today);

        let receipt = PaymentReceipt {
            payment_id,
            installment_status,
            agreement_status: agreement.status,
            fees: agreement.fees_on(command.amount.value()),
        };

        tracing::info!(
            agreement_id = %command.agreement_id,
            installment_id = %command.installment_id,
            amount = %command.amount,
            fees = %receipt.fees,
            "Payment registered"
        );

        self.persist_agreements()?;
        Ok(receipt)
    }

    // =====================================================================
    // Agreement update log
    // =====================================================================

    pub fn add_agreement_update(&mut self, command: AddUpdateCommand) -> AppResult<Uuid> {
        let agreement = self.agreement_mut(command.agreement_id)?;
        let update = AgreementUpdate::new(command.text);
        let id = update.id;
        agreement.updates.push(update);
        self.persist_agreements()?;
        Ok(id)
    }

    pub fn edit_agreement_update(&mut self, command: EditUpdateCommand) -> AppResult<()> {
        let agreement = self.agreement_mut(command.agreement_id)?;
        let update = agreement
            .update_mut(command.update_id)
            .ok_or(AppError::UpdateNotFound(command.update_id))?;
        update.edit(command.new_text, Utc::now());
        self.persist_agreements()?;
        Ok(())
    }

    pub fn soft_delete_agreement_update(
        &mut self,
        agreement_id: Uuid,
        update_id: Uuid,
    ) -> AppResult<()> {
        self.set_update_deleted(agreement_id, update_id, true)
    }

    pub fn restore_agreement_update(
        &mut self,
        agreement_id: Uuid,
        update_id: Uuid,
    ) -> AppResult<()> {
        self.set_update_deleted(agreement_id, update_id, false)
    }

    fn set_update_deleted(
        &mut self,
        agreement_id: Uuid,
        update_id: Uuid,
        deleted: bool,
    ) -> AppResult<()> {
        let agreement = self.agreement_mut(agreement_id)?;
        let update = agreement
            .update_mut(update_id)
            .ok_or(AppError::UpdateNotFound(update_id))?;
        update.is_deleted = deleted;
        self.persist_agreements()?;
        Ok(())
    }

    // =====================================================================
    // Settings & chat
    // =====================================================================

    pub fn update_settings(&mut self, patch: SettingsPatch) -> AppResult<()> {
        self.settings.apply(patch);
        self.persist_settings()?;
        Ok(())
    }

    pub fn push_chat_message(&mut self, message: ChatMessage) -> AppResult<()> {
        self.chat_history.push(message);
        self.persist_chat_history()?;
        Ok(())
    }

    // =====================================================================
    // Session flags
    // =====================================================================

    pub(crate) fn set_authenticated(&mut self, authenticated: bool) -> AppResult<()> {
        self.authenticated = authenticated;
        self.persist_authenticated()?;
        Ok(())
    }

    pub(crate) fn set_resting(&mut self, resting: bool) {
        self.resting = resting;
    }

    /// Clear both session flags. Used by explicit logout and by the
    /// rest-mode inactivity timer.
    pub fn logout(&mut self) -> AppResult<()> {
        self.resting = false;
        self.set_authenticated(false)?;
        tracing::info!("Session logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_store() -> DataStore {
        DataStore::load_with_today(
            Box::new(MemoryStore::new()),
            NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        )
    }

    #[test]
    fn test_first_run_seeds_sample_data() {
        let store = fresh_store();

        assert_eq!(store.debtors().len(), 2);
        assert_eq!(store.agreements().len(), 1);
        // Seeded agreement: first two installments paid, third due
        // 2024-09-15, so nothing overdue on 2024-09-01
        assert_eq!(
            store.agreements()[0].status,
            crate::domain::AgreementStatus::Active
        );
    }

    #[test]
    fn test_corrupt_key_resets_everything() {
        let mut backend = MemoryStore::new();
        backend.put(keys::DEBTORS, "[]").unwrap();
        backend.put(keys::AGREEMENTS, "this is not json").unwrap();

        let store = DataStore::load_with_today(
            Box::new(backend),
            NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        );

        // Not the empty debtor list that was stored: the corrupt agreements
        // key failed the whole load and every collection was reseeded
        assert_eq!(store.debtors().len(), 2);
        assert_eq!(store.agreements().len(), 1);
    }

    #[test]
    fn test_fresh_load_persists_every_collection() {
        let store = fresh_store();
        let stored = store.backend().keys().unwrap();

        // All eleven keys written, so a first-run export yields a full
        // backup before any mutation
        assert_eq!(stored.len(), 11);
        assert!(stored.contains(&keys::DEBTORS.to_string()));
        assert!(stored.contains(&keys::AGREEMENTS.to_string()));
        assert!(stored.contains(&keys::AUTHENTICATED.to_string()));
        assert!(stored.contains(&keys::DRAFT_NOTES.to_string()));
    }

    #[test]
    fn test_payment_date_matches_recalculation_day() {
        let mut store = fresh_store();
        let agreement_id = store.agreements()[0].id;
        let installment_id = store.agreements()[0].installments[2].id;
        let today = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();

        store
            .register_payment_with_today(
                RegisterPaymentCommand::new(agreement_id, installment_id, dec!(100)).unwrap(),
                today,
            )
            .unwrap();

        let payment = &store
            .agreement(agreement_id)
            .unwrap()
            .installment(installment_id)
            .unwrap()
            .payment_history[0];
        assert_eq!(payment.date.date_naive(), today);
    }

    #[test]
    fn test_mutation_writes_through() {
        let mut store = fresh_store();
        let command = AddDebtorCommand::new("Nova Empresa", "nova@empresa.com").unwrap();
        let id = store.add_debtor(command).unwrap();

        let raw = store.backend().get(keys::DEBTORS).unwrap().unwrap();
        assert!(raw.contains(&id.to_string()));
    }

    #[test]
    fn test_soft_delete_restore_roundtrip_preserves_fields() {
        let mut store = fresh_store();
        let id = store.debtors()[0].id;
        let before = store.debtors()[0].clone();

        store.soft_delete_debtor(id).unwrap();
        assert!(store.debtor(id).unwrap().is_deleted);

        store.restore_debtor(id).unwrap();
        assert_eq!(store.debtor(id).unwrap(), &before);
    }

    #[test]
    fn test_permanent_delete_is_gone_after_reload() {
        let mut store = fresh_store();
        let id = store.debtors()[1].id;
        store.permanently_delete_debtor(id).unwrap();
        assert!(store.debtor(id).is_none());

        assert!(matches!(
            store.permanently_delete_debtor(id),
            Err(AppError::DebtorNotFound(_))
        ));
    }

    #[test]
    fn test_add_agreement_requires_existing_debtor() {
        let mut store = fresh_store();
        let command = AddAgreementCommand::new(
            Uuid::new_v4(),
            dec!(1000),
            dec!(800),
            dec!(10),
            4,
            NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
        );

        assert!(matches!(
            store.add_agreement(command),
            Err(AppError::DebtorNotFound(_))
        ));
    }

    #[test]
    fn test_register_payment_full_cycle() {
        let mut store = fresh_store();
        let agreement_id = store.agreements()[0].id;
        let installment_id = store.agreements()[0].installments[2].id;

        let command =
            RegisterPaymentCommand::new(agreement_id, installment_id, dec!(10000)).unwrap();
        let receipt = store
            .register_payment_with_today(command, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap())
            .unwrap();

        assert_eq!(receipt.installment_status, InstallmentStatus::Paid);
        // 20% commission on 10000
        assert_eq!(receipt.fees, dec!(2000));

        let agreement = store.agreement(agreement_id).unwrap();
        assert_eq!(agreement.installments[2].paid_amount, dec!(10000));
        assert_eq!(agreement.installments[2].payment_history.len(), 1);
    }

    #[test]
    fn test_register_payment_rejects_overshoot() {
        let mut store = fresh_store();
        let agreement_id = store.agreements()[0].id;
        let installment_id = store.agreements()[0].installments[2].id;

        let command =
            RegisterPaymentCommand::new(agreement_id, installment_id, dec!(10000.01)).unwrap();
        let result = store
            .register_payment_with_today(command, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());

        assert!(matches!(result, Err(AppError::Domain(_))));
    }

    #[test]
    fn test_register_payment_unknown_installment() {
        let mut store = fresh_store();
        let agreement_id = store.agreements()[0].id;

        let command =
            RegisterPaymentCommand::new(agreement_id, Uuid::new_v4(), dec!(100)).unwrap();
        let result = store
            .register_payment_with_today(command, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());

        assert!(matches!(result, Err(AppError::InstallmentNotFound(_))));
    }

    #[test]
    fn test_update_log_edit_history() {
        let mut store = fresh_store();
        let agreement_id = store.agreements()[0].id;

        let update_id = store
            .add_agreement_update(AddUpdateCommand::new(agreement_id, "A").unwrap())
            .unwrap();
        store
            .edit_agreement_update(EditUpdateCommand::new(agreement_id, update_id, "B").unwrap())
            .unwrap();
        store
            .edit_agreement_update(EditUpdateCommand::new(agreement_id, update_id, "C").unwrap())
            .unwrap();

        let update = store
            .agreement(agreement_id)
            .unwrap()
            .update(update_id)
            .unwrap();
        assert_eq!(update.text, "C");
        assert_eq!(update.history.len(), 2);
        assert_eq!(update.history[0].text, "A");
        assert_eq!(update.history[1].text, "B");
    }

    #[test]
    fn test_update_soft_delete_restore() {
        let mut store = fresh_store();
        let agreement_id = store.agreements()[0].id;
        let update_id = store
            .add_agreement_update(AddUpdateCommand::new(agreement_id, "nota").unwrap())
            .unwrap();

        store
            .soft_delete_agreement_update(agreement_id, update_id)
            .unwrap();
        assert!(
            store
                .agreement(agreement_id)
                .unwrap()
                .update(update_id)
                .unwrap()
                .is_deleted
        );

        store
            .restore_agreement_update(agreement_id, update_id)
            .unwrap();
        assert!(
            !store
                .agreement(agreement_id)
                .unwrap()
                .update(update_id)
                .unwrap()
                .is_deleted
        );
    }

    #[test]
    fn test_chat_history_appends_and_persists() {
        let mut store = fresh_store();
        store
            .push_chat_message(crate::domain::ChatMessage::new(
                crate::domain::ChatSender::User,
                "Qual o saldo devedor?",
            ))
            .unwrap();

        assert_eq!(store.chat_history().len(), 1);
        let raw = store.backend().get(keys::CHAT_HISTORY).unwrap().unwrap();
        assert!(raw.contains("Qual o saldo devedor?"));
    }

    #[test]
    fn test_settings_patch_persists() {
        let mut store = fresh_store();
        store
            .update_settings(SettingsPatch {
                privacy_mode_enabled: Some(true),
                ..Default::default()
            })
            .unwrap();

        assert!(store.settings().privacy_mode_enabled);
        let raw = store.backend().get(keys::SETTINGS).unwrap().unwrap();
        assert!(raw.contains("\"privacyModeEnabled\":true"));
    }

    #[test]
    fn test_reload_recalculates_statuses() {
        // Persist a snapshot where nothing is overdue, then reload far in
        // the future: the recalculation on load must flag delinquency.
        let mut store = fresh_store();
        let agreement_id = store.agreements()[0].id;
        let mut edited = store.agreement(agreement_id).unwrap().clone();
        store.update_agreement(edited.clone()).unwrap();

        let raw = store.backend().get(keys::AGREEMENTS).unwrap().unwrap();
        let mut backend = MemoryStore::new();
        backend.put(keys::AGREEMENTS, &raw).unwrap();

        let reloaded = DataStore::load_with_today(
            Box::new(backend),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        );
        let agreement = reloaded.agreement(agreement_id).unwrap();

        assert_eq!(agreement.status, crate::domain::AgreementStatus::Delinquent);
        edited.recalculate(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(agreement.status, edited.status);
    }
}
