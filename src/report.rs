//! Dashboard figures
//!
//! Aggregate numbers over the agreement collection. Soft-deleted agreements
//! are excluded everywhere; archived ones still count, archiving is a
//! presentation concern.

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::domain::{AgreementStatus, DebtorAgreement};

/// Key figures for one reference month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Outstanding balance across all live agreements
    pub total_to_receive: Decimal,
    /// Sum of payments dated within the reference month
    pub received_in_month: Decimal,
    pub active_agreements: usize,
    pub delinquent_agreements: usize,
    pub settled_agreements: usize,
}

/// Compute the dashboard figures for `year`/`month`.
pub fn dashboard_summary(agreements: &[DebtorAgreement], year: i32, month: u32) -> DashboardSummary {
    let mut summary = DashboardSummary {
        total_to_receive: Decimal::ZERO,
        received_in_month: Decimal::ZERO,
        active_agreements: 0,
        delinquent_agreements: 0,
        settled_agreements: 0,
    };

    for agreement in agreements.iter().filter(|a| !a.is_deleted) {
        summary.total_to_receive += agreement.outstanding_balance();
        match agreement.status {
            AgreementStatus::Active => summary.active_agreements += 1,
            AgreementStatus::Delinquent => summary.delinquent_agreements += 1,
            AgreementStatus::Settled => summary.settled_agreements += 1,
        }

        for installment in &agreement.installments {
            for payment in &installment.payment_history {
                let date = payment.date.date_naive();
                if date.year() == year && date.month() == month {
                    summary.received_in_month += payment.amount;
                }
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn agreement_with_one_payment() -> DebtorAgreement {
        let mut agreement = DebtorAgreement::new(
            Uuid::new_v4(),
            dec!(100000),
            dec!(80000),
            dec!(20),
            8,
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
        )
        .unwrap();
        let installment_id = agreement.installments[0].id;
        agreement
            .installment_mut(installment_id)
            .unwrap()
            .register_payment(
                crate::domain::PaymentAmount::new(dec!(10000)).unwrap(),
                Utc::now(),
            )
            .unwrap();
        agreement.recalculate(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        agreement
    }

    #[test]
    fn test_summary_counts_and_balances() {
        let agreement = agreement_with_one_payment();
        let now = Utc::now().date_naive();
        let summary = dashboard_summary(&[agreement], now.year(), now.month());

        assert_eq!(summary.total_to_receive, dec!(70000));
        assert_eq!(summary.received_in_month, dec!(10000));
        assert_eq!(summary.active_agreements, 1);
        assert_eq!(summary.delinquent_agreements, 0);
    }

    #[test]
    fn test_payments_outside_month_excluded() {
        let agreement = agreement_with_one_payment();
        let summary = dashboard_summary(&[agreement], 1999, 1);

        assert_eq!(summary.received_in_month, dec!(0));
    }

    #[test]
    fn test_deleted_agreements_ignored() {
        let mut agreement = agreement_with_one_payment();
        agreement.is_deleted = true;
        let now = Utc::now().date_naive();
        let summary = dashboard_summary(&[agreement], now.year(), now.month());

        assert_eq!(summary.total_to_receive, dec!(0));
        assert_eq!(summary.active_agreements, 0);
    }
}
