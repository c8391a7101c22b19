//! Month-by-month amortization ledger for a single tranche.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::amortization::payment::{compute_monthly_payment, monthly_rate, total_months};
use crate::config::EngineConfig;
use crate::error::MortgageMixError;
use crate::types::{Money, Rate, Years};
use crate::MortgageMixResult;

/// One ledger line of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Month number (1-indexed).
    pub month: u32,
    /// Balance owed before this month's payment.
    pub opening_balance: Money,
    /// Installment paid this month (interest + principal).
    pub payment: Money,
    /// Interest portion of the installment.
    pub interest: Money,
    /// Principal portion of the installment.
    pub principal: Money,
    /// Balance owed after this month's payment, never negative.
    pub closing_balance: Money,
}

/// Schedule using the default one-cent payoff tolerance.
pub fn generate_amortization_schedule(
    principal: Money,
    annual_rate: Rate,
    years: Years,
) -> MortgageMixResult<Vec<AmortizationRow>> {
    generate_amortization_schedule_with_config(
        principal,
        annual_rate,
        years,
        &EngineConfig::default(),
    )
}

/// Builds up to `years × 12` rows. The first month whose closing balance
/// drops to `config.balance_tolerance` or below becomes the final row: its
/// principal is snapped to the opening balance so the loan closes at exactly
/// zero, and no further rows are emitted. Month `years × 12` is always snapped,
/// so a zero tolerance still closes the loan at zero.
pub fn generate_amortization_schedule_with_config(
    principal: Money,
    annual_rate: Rate,
    years: Years,
    config: &EngineConfig,
) -> MortgageMixResult<Vec<AmortizationRow>> {
    config.validate()?;
    let payment = compute_monthly_payment(principal, annual_rate, years)?;

    let r = monthly_rate(annual_rate);
    let n = total_months(years)?;

    let mut rows = Vec::with_capacity(n as usize);
    let mut balance = principal;

    for month in 1..=n {
        let opening_balance = balance;
        let interest = opening_balance
            .checked_mul(r)
            .ok_or_else(|| MortgageMixError::overflow("principal"))?;
        let principal_paid = payment - interest;
        let closing_balance = (opening_balance - principal_paid).max(Decimal::ZERO);

        if closing_balance <= config.balance_tolerance || month == n {
            let final_payment = interest
                .checked_add(opening_balance)
                .ok_or_else(|| MortgageMixError::overflow("principal"))?;
            rows.push(AmortizationRow {
                month,
                opening_balance,
                payment: final_payment,
                interest,
                principal: opening_balance,
                closing_balance: Decimal::ZERO,
            });
            if month < n {
                trace!(month, months = n, "schedule paid off before final term month");
            }
            break;
        }

        rows.push(AmortizationRow {
            month,
            opening_balance,
            payment,
            interest,
            principal: principal_paid,
            closing_balance,
        });
        balance = closing_balance;
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.000001);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    #[test]
    fn test_full_term_length() {
        let rows = generate_amortization_schedule(dec!(500_000), dec!(3), 30).unwrap();
        assert_eq!(rows.len(), 360);
        assert_eq!(rows.first().unwrap().month, 1);
        assert_eq!(rows.last().unwrap().month, 360);
    }

    #[test]
    fn test_final_row_closes_at_zero() {
        let rows = generate_amortization_schedule(dec!(1_000_000), dec!(5), 25).unwrap();
        assert_eq!(rows.last().unwrap().closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_principal_sums_to_loan_amount() {
        let rows = generate_amortization_schedule(dec!(600_000), dec!(6), 20).unwrap();
        let total_principal: Decimal = rows.iter().map(|r| r.principal).sum();
        assert_close(total_principal, dec!(600_000), dec!(0.01), "principal sum");
    }

    #[test]
    fn test_every_row_decomposes() {
        let rows = generate_amortization_schedule(dec!(700_000), dec!(3.5), 30).unwrap();
        for row in &rows {
            assert_close(row.payment, row.interest + row.principal, TOL, "payment split");
            let expected_close = (row.opening_balance - row.principal).max(Decimal::ZERO);
            assert_close(row.closing_balance, expected_close, TOL, "closing balance");
        }
    }

    #[test]
    fn test_rows_chain_balances() {
        let rows = generate_amortization_schedule(dec!(250_000), dec!(4.2), 15).unwrap();
        assert_eq!(rows[0].opening_balance, dec!(250_000));
        for pair in rows.windows(2) {
            assert_eq!(pair[0].closing_balance, pair[1].opening_balance);
        }
    }

    #[test]
    fn test_interest_declines_over_time() {
        let rows = generate_amortization_schedule(dec!(400_000), dec!(5), 20).unwrap();
        assert!(rows[0].interest > rows[100].interest);
        assert!(rows[0].principal < rows[100].principal);
    }

    #[test]
    fn test_zero_rate_schedule_has_no_interest() {
        let rows = generate_amortization_schedule(dec!(240_000), Decimal::ZERO, 20).unwrap();
        assert_eq!(rows.len(), 240);
        assert!(rows.iter().all(|r| r.interest.is_zero()));
        assert_eq!(rows[0].payment, dec!(1000));
    }

    #[test]
    fn test_zero_principal_single_empty_row() {
        let rows = generate_amortization_schedule(Decimal::ZERO, dec!(4), 10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].payment, Decimal::ZERO);
        assert_eq!(rows[0].closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_wide_tolerance_terminates_early() {
        // A tolerance above the last scheduled principal ends the loan a month early.
        let config = EngineConfig::with_balance_tolerance(dec!(6000)).unwrap();
        let rows =
            generate_amortization_schedule_with_config(dec!(1_000_000), dec!(5), 25, &config)
                .unwrap();
        assert!(rows.len() < 300);
        let last = rows.last().unwrap();
        assert_eq!(last.closing_balance, Decimal::ZERO);
        assert_eq!(last.principal, last.opening_balance);
    }

    #[test]
    fn test_zero_tolerance_still_closes_on_last_month() {
        let config = EngineConfig::with_balance_tolerance(Decimal::ZERO).unwrap();
        for (principal, rate, years) in [
            (dec!(1_000_000), dec!(5), 25u32),
            (dec!(333_333.33), dec!(3.7), 17),
            (dec!(100_000), Decimal::ZERO, 7),
        ] {
            let rows =
                generate_amortization_schedule_with_config(principal, rate, years, &config)
                    .unwrap();
            assert_eq!(rows.len(), (years * 12) as usize);
            let last = rows.last().unwrap();
            assert_eq!(last.closing_balance, Decimal::ZERO);
            assert_eq!(last.principal, last.opening_balance);
            assert_eq!(last.payment, last.interest + last.principal);
        }
    }

    #[test]
    fn test_extreme_terms_are_errors() {
        for (principal, rate, years) in [
            (dec!(1_000_000), dec!(120), 50u32),
            (dec!(100_000), dec!(4), 400_000_000),
            (Decimal::MAX, dec!(4), 30),
        ] {
            let err = generate_amortization_schedule(principal, rate, years).unwrap_err();
            assert!(matches!(err, MortgageMixError::InvalidInput { .. }));
        }
    }

    #[test]
    fn test_schedule_is_reproducible() {
        let a = generate_amortization_schedule(dec!(321_000), dec!(4.75), 18).unwrap();
        let b = generate_amortization_schedule(dec!(321_000), dec!(4.75), 18).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_terms_propagate() {
        let err = generate_amortization_schedule(dec!(100_000), dec!(4), 0).unwrap_err();
        assert!(matches!(err, MortgageMixError::InvalidInput { .. }));
    }
}
