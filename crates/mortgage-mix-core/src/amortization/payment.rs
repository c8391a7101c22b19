//! Level monthly installment for a single loan tranche.
//!
//! Standard annuity formula with monthly compounding, falling back to a
//! straight-line split when the rate is zero. All math in `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::MortgageMixError;
use crate::types::{Money, Rate, Years};
use crate::MortgageMixResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Longest accepted term. Keeps `years × 12` and the schedule length bounded.
pub const MAX_TERM_YEARS: Years = 100;
/// Highest accepted annual rate, in percent.
pub const MAX_ANNUAL_RATE: Rate = dec!(100);
/// Largest accepted principal. Leaves headroom for summed totals across a mix.
pub const MAX_PRINCIPAL: Money = dec!(1_000_000_000_000_000);

/// Fixed monthly payment that retires `principal` in exactly `years × 12`
/// equal installments at `annual_rate` percent, compounded monthly.
pub fn compute_monthly_payment(
    principal: Money,
    annual_rate: Rate,
    years: Years,
) -> MortgageMixResult<Money> {
    validate_loan_terms(principal, annual_rate, years)?;

    let n = total_months(years)?;
    if annual_rate.is_zero() {
        return Ok(principal / Decimal::from(n));
    }

    let r = monthly_rate(annual_rate);
    let factor = compound_factor(r, n)?;
    let denominator = factor - Decimal::ONE;

    // Rates so small that (1 + r)^n rounds to one amortize straight-line.
    if denominator.is_zero() {
        return Ok(principal / Decimal::from(n));
    }

    // principal × (r·F / (F − 1)); the bracket stays near r, so large
    // factors cannot push the intermediate product out of range.
    r.checked_mul(factor)
        .and_then(|v| v.checked_div(denominator))
        .and_then(|v| v.checked_mul(principal))
        .ok_or_else(|| MortgageMixError::overflow("interest_rate"))
}

/// Number of monthly installments in a term of `years`.
pub fn total_months(years: Years) -> MortgageMixResult<u32> {
    years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| MortgageMixError::overflow("years"))
}

/// Annual percentage rate to a monthly decimal rate (4.5 -> 0.00375).
pub fn monthly_rate(annual_rate: Rate) -> Decimal {
    annual_rate / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

fn compound_factor(monthly_rate: Decimal, months: u32) -> MortgageMixResult<Decimal> {
    (Decimal::ONE + monthly_rate)
        .checked_powu(u64::from(months))
        .ok_or_else(|| MortgageMixError::InvalidInput {
            field: "interest_rate".into(),
            reason: format!("Compounding over {months} months overflows decimal range"),
        })
}

pub(crate) fn validate_loan_terms(
    principal: Money,
    annual_rate: Rate,
    years: Years,
) -> MortgageMixResult<()> {
    if principal < Decimal::ZERO {
        return Err(MortgageMixError::InvalidInput {
            field: "principal".into(),
            reason: "Principal cannot be negative".into(),
        });
    }
    if principal > MAX_PRINCIPAL {
        return Err(MortgageMixError::InvalidInput {
            field: "principal".into(),
            reason: format!("Principal cannot exceed {MAX_PRINCIPAL}"),
        });
    }
    if annual_rate < Decimal::ZERO {
        return Err(MortgageMixError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if annual_rate > MAX_ANNUAL_RATE {
        return Err(MortgageMixError::InvalidInput {
            field: "interest_rate".into(),
            reason: format!("Interest rate cannot exceed {MAX_ANNUAL_RATE}%"),
        });
    }
    if years == 0 {
        return Err(MortgageMixError::InvalidInput {
            field: "years".into(),
            reason: "Loan term must be at least one year".into(),
        });
    }
    if years > MAX_TERM_YEARS {
        return Err(MortgageMixError::InvalidInput {
            field: "years".into(),
            reason: format!("Loan term cannot exceed {MAX_TERM_YEARS} years"),
        });
    }
    Ok(())
}
