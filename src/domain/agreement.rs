//! Debtor Agreement Aggregate
//!
//! The aggregate root of the installment engine. An agreement owns an
//! ordered, fixed-size list of installments; each installment owns its
//! append-only payment history. Agreement status is always derived from
//! installment state by [`DebtorAgreement::recalculate`], never set by hand.

use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::update_log::AgreementUpdate;
use crate::domain::{is_settled, DomainError, PaymentAmount, SETTLEMENT_TOLERANCE};

// =========================================================================
// Statuses
// =========================================================================

/// Installment lifecycle status.
///
/// Serialized with the Portuguese labels the stored data uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    #[serde(rename = "Pendente")]
    Pending,
    #[serde(rename = "Paga Parcialmente")]
    PartiallyPaid,
    #[serde(rename = "Paga")]
    Paid,
    #[serde(rename = "Atrasada")]
    Overdue,
}

/// Agreement lifecycle status, derived from installment statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgreementStatus {
    #[serde(rename = "Ativo")]
    Active,
    #[serde(rename = "Quitado")]
    Settled,
    #[serde(rename = "Inadimplente")]
    Delinquent,
}

impl std::fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pending => "Pendente",
            Self::PartiallyPaid => "Paga Parcialmente",
            Self::Paid => "Paga",
            Self::Overdue => "Atrasada",
        };
        f.write_str(label)
    }
}

impl std::fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Active => "Ativo",
            Self::Settled => "Quitado",
            Self::Delinquent => "Inadimplente",
        };
        f.write_str(label)
    }
}

// =========================================================================
// Payment
// =========================================================================

/// One actual money transfer applied against an installment.
///
/// Append-only: payments are never mutated or deleted. There is no reversal
/// operation; a mistaken payment must be corrected by editing the record
/// outside the registration contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =========================================================================
// Installment
// =========================================================================

/// One scheduled partial payment within an agreement.
///
/// # Invariants
/// - `paid_amount` is monotonically non-decreasing
/// - `paid_amount` never exceeds `value` beyond [`SETTLEMENT_TOLERANCE`]
/// - sum of `payment_history` amounts equals `paid_amount`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: Uuid,
    /// 1-based sequence number, fixed at creation
    pub installment_number: u32,
    pub due_date: DateTime<Utc>,
    pub value: Decimal,
    pub paid_amount: Decimal,
    pub status: InstallmentStatus,
    pub payment_history: Vec<Payment>,
}

impl Installment {
    fn new(number: u32, due_date: NaiveDate, value: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            installment_number: number,
            due_date: due_date.and_time(NaiveTime::MIN).and_utc(),
            value,
            paid_amount: Decimal::ZERO,
            status: InstallmentStatus::Pending,
            payment_history: Vec::new(),
        }
    }

    /// Remaining balance on this installment.
    pub fn outstanding(&self) -> Decimal {
        self.value - self.paid_amount
    }

    /// Register a payment against this installment.
    ///
    /// Appends a [`Payment`] record, accumulates `paid_amount` and derives
    /// the new status: remaining balance within tolerance means `Paid`,
    /// anything else means `PartiallyPaid`.
    ///
    /// # Errors
    /// `DomainError::PaymentExceedsOutstanding` when the amount overshoots
    /// the remaining balance by more than the tolerance.
    pub fn register_payment(
        &mut self,
        amount: PaymentAmount,
        now: DateTime<Utc>,
    ) -> Result<Uuid, DomainError> {
        let amount = amount.value();
        if amount > self.outstanding() + SETTLEMENT_TOLERANCE {
            return Err(DomainError::PaymentExceedsOutstanding {
                amount,
                outstanding: self.outstanding(),
            });
        }

        let payment = Payment {
            id: Uuid::new_v4(),
            date: now,
            amount,
            method: None,
            notes: Some(format!("Pagamento de {amount:.2} registrado.")),
        };
        let payment_id = payment.id;

        self.paid_amount += amount;
        self.status = if is_settled(self.value, self.paid_amount) {
            InstallmentStatus::Paid
        } else {
            InstallmentStatus::PartiallyPaid
        };
        self.payment_history.push(payment);

        Ok(payment_id)
    }
}

// =========================================================================
// DebtorAgreement
// =========================================================================

/// A negotiated settlement between the practice and a debtor, repaid via
/// installments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtorAgreement {
    pub id: Uuid,
    pub debtor_id: Uuid,
    /// Court case number this agreement is linked to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_number_link: Option<String>,
    pub original_debt: Decimal,
    pub agreement_value: Decimal,
    pub installments: Vec<Installment>,
    pub status: AgreementStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Lawyer commission, percent of collected amounts
    pub fee_percentage: Decimal,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub updates: Vec<AgreementUpdate>,
    pub created_at: DateTime<Utc>,
}

impl DebtorAgreement {
    /// Create a new agreement with a generated installment plan.
    ///
    /// The plan is fixed at creation: `num_installments` installments of
    /// `agreement_value / num_installments` rounded to centavos, with the
    /// rounding remainder folded into the last one so the plan sums to the
    /// agreement value, due monthly starting at `first_due_date`.
    /// Installment count and cadence cannot change later, only statuses and
    /// payment history.
    pub fn new(
        debtor_id: Uuid,
        original_debt: Decimal,
        agreement_value: Decimal,
        fee_percentage: Decimal,
        num_installments: u32,
        first_due_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        if agreement_value <= Decimal::ZERO {
            return Err(DomainError::NonPositiveAgreementValue(agreement_value));
        }
        if num_installments == 0 {
            return Err(DomainError::EmptyInstallmentPlan);
        }
        if fee_percentage < Decimal::ZERO || fee_percentage > Decimal::ONE_HUNDRED {
            return Err(DomainError::InvalidFeePercentage(fee_percentage));
        }

        // Centavo rounding remainder lands on the last installment, so the
        // plan always sums to exactly the agreement value
        let base_value = (agreement_value / Decimal::from(num_installments)).round_dp(2);
        let last_value = agreement_value - base_value * Decimal::from(num_installments - 1);
        let installments = (0..num_installments)
            .map(|i| {
                let due = first_due_date
                    .checked_add_months(Months::new(i))
                    .expect("installment due date out of calendar range");
                let value = if i + 1 == num_installments {
                    last_value
                } else {
                    base_value
                };
                Installment::new(i + 1, due, value)
            })
            .collect();

        Ok(Self {
            id: Uuid::new_v4(),
            debtor_id,
            case_number_link: None,
            original_debt,
            agreement_value,
            installments,
            status: AgreementStatus::Active,
            notes: None,
            fee_percentage,
            is_deleted: false,
            is_archived: false,
            updates: Vec::new(),
            created_at: Utc::now(),
        })
    }

    pub fn with_case_number(mut self, case_number: impl Into<String>) -> Self {
        self.case_number_link = Some(case_number.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn installment(&self, installment_id: Uuid) -> Option<&Installment> {
        self.installments.iter().find(|i| i.id == installment_id)
    }

    pub fn installment_mut(&mut self, installment_id: Uuid) -> Option<&mut Installment> {
        self.installments.iter_mut().find(|i| i.id == installment_id)
    }

    pub fn update(&self, update_id: Uuid) -> Option<&AgreementUpdate> {
        self.updates.iter().find(|u| u.id == update_id)
    }

    pub fn update_mut(&mut self, update_id: Uuid) -> Option<&mut AgreementUpdate> {
        self.updates.iter_mut().find(|u| u.id == update_id)
    }

    /// Sum of everything paid across all installments.
    pub fn total_paid(&self) -> Decimal {
        self.installments.iter().map(|i| i.paid_amount).sum()
    }

    /// What the debtor still owes on the agreed settlement value.
    pub fn outstanding_balance(&self) -> Decimal {
        self.agreement_value - self.total_paid()
    }

    /// Lawyer commission on a collected amount.
    pub fn fees_on(&self, amount: Decimal) -> Decimal {
        (amount * self.fee_percentage / Decimal::ONE_HUNDRED).round_dp(2)
    }

    // =====================================================================
    // Status recalculation
    // =====================================================================

    /// Re-derive installment and agreement statuses for a given date.
    ///
    /// Date-only comparison: time-of-day on due dates and on `today` is
    /// ignored. Per installment:
    /// - not `Paid` and due before today: becomes `Overdue`
    /// - `Overdue` but due today or later (due date edited, or the clock
    ///   moved): back to `PartiallyPaid` when money was already collected,
    ///   else `Pending`
    /// - otherwise unchanged
    ///
    /// Agreement status then follows: all `Paid` means `Settled`, any
    /// `Overdue` means `Delinquent`, everything else is `Active`.
    ///
    /// Called on every load from storage and after every mutation that can
    /// change installment state. Idempotent for a fixed `today`.
    pub fn recalculate(&mut self, today: NaiveDate) {
        let mut has_overdue = false;

        for installment in &mut self.installments {
            let due = installment.due_date.date_naive();

            if installment.status != InstallmentStatus::Paid && due < today {
                installment.status = InstallmentStatus::Overdue;
                has_overdue = true;
            } else if installment.status == InstallmentStatus::Overdue && due >= today {
                installment.status = if installment.paid_amount > Decimal::ZERO {
                    InstallmentStatus::PartiallyPaid
                } else {
                    InstallmentStatus::Pending
                };
            }
        }

        let all_paid = self
            .installments
            .iter()
            .all(|i| i.status == InstallmentStatus::Paid);

        self.status = if all_paid {
            AgreementStatus::Settled
        } else if has_overdue {
            AgreementStatus::Delinquent
        } else {
            AgreementStatus::Active
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn agreement_8x10000() -> DebtorAgreement {
        DebtorAgreement::new(
            Uuid::new_v4(),
            dec!(100000),
            dec!(80000),
            dec!(20),
            8,
            date(2024, 7, 15),
        )
        .unwrap()
    }

    fn pay_in_full(installment: &mut Installment) {
        let outstanding = installment.outstanding();
        installment
            .register_payment(PaymentAmount::new(outstanding).unwrap(), Utc::now())
            .unwrap();
    }

    // =====================================================================
    // Plan generation
    // =====================================================================

    #[test]
    fn test_plan_has_monthly_cadence() {
        let agreement = agreement_8x10000();

        assert_eq!(agreement.installments.len(), 8);
        assert_eq!(agreement.installments[0].due_date.date_naive(), date(2024, 7, 15));
        assert_eq!(agreement.installments[1].due_date.date_naive(), date(2024, 8, 15));
        assert_eq!(agreement.installments[7].due_date.date_naive(), date(2025, 2, 15));
    }

    #[test]
    fn test_plan_splits_value_equally() {
        let agreement = agreement_8x10000();

        for (i, installment) in agreement.installments.iter().enumerate() {
            assert_eq!(installment.value, dec!(10000));
            assert_eq!(installment.installment_number, (i + 1) as u32);
            assert_eq!(installment.status, InstallmentStatus::Pending);
            assert!(installment.payment_history.is_empty());
        }
    }

    #[test]
    fn test_plan_sums_to_agreement_value_despite_rounding() {
        // 100 / 3 rounds to 33.33; the last installment absorbs the
        // remaining centavo
        let agreement = DebtorAgreement::new(
            Uuid::new_v4(),
            dec!(100),
            dec!(100),
            Decimal::ZERO,
            3,
            date(2024, 7, 15),
        )
        .unwrap();

        let values: Vec<Decimal> = agreement.installments.iter().map(|i| i.value).collect();
        assert_eq!(values, vec![dec!(33.33), dec!(33.33), dec!(33.34)]);
        assert_eq!(values.iter().sum::<Decimal>(), dec!(100));
    }

    #[test]
    fn test_uneven_plan_settles_with_zero_balance() {
        let mut agreement = DebtorAgreement::new(
            Uuid::new_v4(),
            dec!(100),
            dec!(100),
            Decimal::ZERO,
            3,
            date(2024, 7, 15),
        )
        .unwrap();

        for installment in &mut agreement.installments {
            pay_in_full(installment);
        }
        agreement.recalculate(date(2024, 9, 1));

        assert_eq!(agreement.status, AgreementStatus::Settled);
        assert_eq!(agreement.outstanding_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_plan_rejects_zero_installments() {
        let result = DebtorAgreement::new(
            Uuid::new_v4(),
            dec!(1000),
            dec!(800),
            dec!(10),
            0,
            date(2024, 7, 15),
        );
        assert!(matches!(result, Err(DomainError::EmptyInstallmentPlan)));
    }

    #[test]
    fn test_plan_rejects_non_positive_value() {
        let result = DebtorAgreement::new(
            Uuid::new_v4(),
            dec!(1000),
            Decimal::ZERO,
            dec!(10),
            4,
            date(2024, 7, 15),
        );
        assert!(matches!(
            result,
            Err(DomainError::NonPositiveAgreementValue(_))
        ));
    }

    #[test]
    fn test_plan_rejects_bad_fee() {
        let result = DebtorAgreement::new(
            Uuid::new_v4(),
            dec!(1000),
            dec!(800),
            dec!(120),
            4,
            date(2024, 7, 15),
        );
        assert!(matches!(result, Err(DomainError::InvalidFeePercentage(_))));
    }

    // =====================================================================
    // Payment registration
    // =====================================================================

    #[test]
    fn test_payment_accumulation() {
        let mut agreement = DebtorAgreement::new(
            Uuid::new_v4(),
            dec!(100),
            dec!(100),
            Decimal::ZERO,
            1,
            date(2024, 7, 15),
        )
        .unwrap();
        let installment = &mut agreement.installments[0];

        installment
            .register_payment(PaymentAmount::new(dec!(50)).unwrap(), Utc::now())
            .unwrap();
        assert_eq!(installment.status, InstallmentStatus::PartiallyPaid);

        installment
            .register_payment(PaymentAmount::new(dec!(50)).unwrap(), Utc::now())
            .unwrap();

        assert_eq!(installment.paid_amount, dec!(100));
        assert_eq!(installment.status, InstallmentStatus::Paid);
        assert_eq!(installment.payment_history.len(), 2);
        let total: Decimal = installment.payment_history.iter().map(|p| p.amount).sum();
        assert_eq!(total, dec!(100));
    }

    #[test]
    fn test_payment_within_tolerance_settles() {
        let mut agreement = agreement_8x10000();
        let installment = &mut agreement.installments[0];

        // 0.0005 short of the full value, within the 0.001 tolerance
        installment
            .register_payment(PaymentAmount::new(dec!(9999.9995)).unwrap(), Utc::now())
            .unwrap();

        assert_eq!(installment.status, InstallmentStatus::Paid);
    }

    #[test]
    fn test_payment_overshoot_rejected() {
        let mut agreement = agreement_8x10000();
        let installment = &mut agreement.installments[0];

        let result = installment
            .register_payment(PaymentAmount::new(dec!(10000.01)).unwrap(), Utc::now());

        assert!(matches!(
            result,
            Err(DomainError::PaymentExceedsOutstanding { .. })
        ));
        assert_eq!(installment.paid_amount, Decimal::ZERO);
        assert!(installment.payment_history.is_empty());
    }

    #[test]
    fn test_payment_exact_outstanding_settles() {
        let mut agreement = agreement_8x10000();
        let installment = &mut agreement.installments[0];

        installment
            .register_payment(PaymentAmount::new(dec!(10000)).unwrap(), Utc::now())
            .unwrap();

        assert_eq!(installment.status, InstallmentStatus::Paid);
        assert_eq!(installment.outstanding(), Decimal::ZERO);
    }

    // =====================================================================
    // Recalculation
    // =====================================================================

    #[test]
    fn test_overdue_transition() {
        let mut agreement = agreement_8x10000();
        agreement.recalculate(date(2024, 9, 1));

        // Installments due 2024-07-15 and 2024-08-15 are unpaid and past due
        assert_eq!(agreement.installments[0].status, InstallmentStatus::Overdue);
        assert_eq!(agreement.installments[1].status, InstallmentStatus::Overdue);
        assert_eq!(agreement.installments[2].status, InstallmentStatus::Pending);
        assert_eq!(agreement.status, AgreementStatus::Delinquent);
    }

    #[test]
    fn test_overdue_overrides_partially_paid() {
        let mut agreement = agreement_8x10000();
        agreement.installments[0]
            .register_payment(PaymentAmount::new(dec!(500)).unwrap(), Utc::now())
            .unwrap();
        assert_eq!(agreement.installments[0].status, InstallmentStatus::PartiallyPaid);

        agreement.recalculate(date(2024, 9, 1));
        assert_eq!(agreement.installments[0].status, InstallmentStatus::Overdue);
    }

    #[test]
    fn test_overdue_reversal_keeps_partial_payment_info() {
        let mut agreement = agreement_8x10000();
        agreement.installments[0]
            .register_payment(PaymentAmount::new(dec!(500)).unwrap(), Utc::now())
            .unwrap();
        agreement.recalculate(date(2024, 9, 1));
        assert_eq!(agreement.installments[0].status, InstallmentStatus::Overdue);

        // Due date corrected forward
        agreement.installments[0].due_date =
            date(2024, 10, 1).and_time(NaiveTime::MIN).and_utc();
        agreement.recalculate(date(2024, 9, 1));

        assert_eq!(
            agreement.installments[0].status,
            InstallmentStatus::PartiallyPaid
        );
    }

    #[test]
    fn test_overdue_reversal_to_pending_without_payments() {
        let mut agreement = agreement_8x10000();
        agreement.recalculate(date(2024, 9, 1));
        assert_eq!(agreement.installments[0].status, InstallmentStatus::Overdue);

        agreement.installments[0].due_date =
            date(2024, 9, 1).and_time(NaiveTime::MIN).and_utc();
        agreement.recalculate(date(2024, 9, 1));

        // Due today is not overdue
        assert_eq!(agreement.installments[0].status, InstallmentStatus::Pending);
    }

    #[test]
    fn test_recalculate_is_idempotent() {
        let mut agreement = agreement_8x10000();
        agreement.installments[2]
            .register_payment(PaymentAmount::new(dec!(100)).unwrap(), Utc::now())
            .unwrap();

        let today = date(2024, 9, 1);
        agreement.recalculate(today);
        let once = agreement.clone();
        agreement.recalculate(today);

        assert_eq!(agreement, once);
    }

    #[test]
    fn test_settled_when_all_paid() {
        let mut agreement = DebtorAgreement::new(
            Uuid::new_v4(),
            dec!(2000),
            dec!(2000),
            dec!(10),
            2,
            date(2024, 7, 15),
        )
        .unwrap();

        for installment in &mut agreement.installments {
            pay_in_full(installment);
        }
        agreement.recalculate(date(2024, 9, 1));

        assert_eq!(agreement.status, AgreementStatus::Settled);
    }

    #[test]
    fn test_paid_installments_never_go_overdue() {
        // Agreement with 8 installments of 10000 due monthly from
        // 2024-07-15, first two already paid. On 2024-09-01 the third
        // installment (due 2024-09-15) is still in the future, so the
        // agreement stays Active.
        let mut agreement = agreement_8x10000();
        pay_in_full(&mut agreement.installments[0]);
        pay_in_full(&mut agreement.installments[1]);

        agreement.recalculate(date(2024, 9, 1));

        assert_eq!(agreement.installments[0].status, InstallmentStatus::Paid);
        assert_eq!(agreement.installments[1].status, InstallmentStatus::Paid);
        assert_eq!(agreement.installments[2].status, InstallmentStatus::Pending);
        assert_eq!(agreement.status, AgreementStatus::Active);
    }

    // =====================================================================
    // Totals and fees
    // =====================================================================

    #[test]
    fn test_totals_and_outstanding_balance() {
        let mut agreement = agreement_8x10000();
        pay_in_full(&mut agreement.installments[0]);
        agreement.installments[1]
            .register_payment(PaymentAmount::new(dec!(2500)).unwrap(), Utc::now())
            .unwrap();

        assert_eq!(agreement.total_paid(), dec!(12500));
        assert_eq!(agreement.outstanding_balance(), dec!(67500));
    }

    #[test]
    fn test_fees_on_collected_amount() {
        let agreement = agreement_8x10000();
        // 20% commission
        assert_eq!(agreement.fees_on(dec!(10000)), dec!(2000));
    }

    // =====================================================================
    // Serialization
    // =====================================================================

    #[test]
    fn test_status_labels_roundtrip() {
        let json = serde_json::to_string(&InstallmentStatus::PartiallyPaid).unwrap();
        assert_eq!(json, "\"Paga Parcialmente\"");

        let status: AgreementStatus = serde_json::from_str("\"Inadimplente\"").unwrap();
        assert_eq!(status, AgreementStatus::Delinquent);
    }

    #[test]
    fn test_agreement_json_shape() {
        let agreement = agreement_8x10000();
        let json = serde_json::to_value(&agreement).unwrap();

        assert!(json.get("debtorId").is_some());
        assert!(json.get("feePercentage").is_some());
        assert!(json["installments"][0].get("dueDate").is_some());
        assert!(json["installments"][0].get("paymentHistory").is_some());
    }
}
