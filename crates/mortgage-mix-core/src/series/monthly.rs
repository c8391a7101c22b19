use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::schedule::AmortizationRow;
use crate::mix::track::TrackCalculation;
use crate::series::year_of_month;
use crate::types::Money;

/// One month of an aggregated series, with the per-track components keyed
/// by track id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub month: u32,
    pub year: u32,
    pub total: Decimal,
    pub per_track: BTreeMap<String, Decimal>,
}

/// Interest/principal split of the combined installment for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub month: u32,
    pub year: u32,
    pub interest: Money,
    pub principal: Money,
    pub interest_percentage: Decimal,
    pub principal_percentage: Decimal,
}

/// Combined installment per month.
pub fn generate_monthly_payment_series(tracks: &[TrackCalculation]) -> Vec<SeriesRow> {
    sum_series(tracks, |row| row.payment)
}

/// Combined outstanding balance (after that month's payment) per month.
pub fn generate_debt_balance_series(tracks: &[TrackCalculation]) -> Vec<SeriesRow> {
    sum_series(tracks, |row| row.closing_balance)
}

/// Balance-weighted nominal rate across tracks still carrying a balance.
/// Zero once nothing is owed.
pub fn generate_blended_rate_series(tracks: &[TrackCalculation]) -> Vec<SeriesRow> {
    (1..=horizon(tracks))
        .map(|month| {
            let mut weighted = Decimal::ZERO;
            let mut balance = Decimal::ZERO;
            let mut per_track = BTreeMap::new();

            for calc in tracks {
                let Some(row) = calc.row(month) else { continue };
                if row.closing_balance > Decimal::ZERO {
                    weighted += row.closing_balance * calc.track.interest_rate;
                    balance += row.closing_balance;
                    per_track.insert(calc.track.id.clone(), calc.track.interest_rate);
                }
            }

            SeriesRow {
                month,
                year: year_of_month(month),
                total: ratio(weighted, balance),
                per_track,
            }
        })
        .collect()
}

/// Share of interest versus principal in the combined installment.
pub fn generate_principal_interest_breakdown_series(
    tracks: &[TrackCalculation],
) -> Vec<BreakdownRow> {
    (1..=horizon(tracks))
        .map(|month| {
            let (interest, principal) = tracks
                .iter()
                .filter_map(|calc| calc.row(month))
                .fold((Decimal::ZERO, Decimal::ZERO), |(i, p), row| {
                    (i + row.interest, p + row.principal)
                });
            let paid = interest + principal;

            BreakdownRow {
                month,
                year: year_of_month(month),
                interest,
                principal,
                interest_percentage: ratio(interest, paid) * dec!(100),
                principal_percentage: ratio(principal, paid) * dec!(100),
            }
        })
        .collect()
}

fn sum_series(
    tracks: &[TrackCalculation],
    value: impl Fn(&AmortizationRow) -> Decimal,
) -> Vec<SeriesRow> {
    (1..=horizon(tracks))
        .map(|month| {
            let per_track: BTreeMap<String, Decimal> = tracks
                .iter()
                .map(|calc| {
                    let v = calc.row(month).map(&value).unwrap_or(Decimal::ZERO);
                    (calc.track.id.clone(), v)
                })
                .collect();

            SeriesRow {
                month,
                year: year_of_month(month),
                total: per_track.values().copied().sum(),
                per_track,
            }
        })
        .collect()
}

fn horizon(tracks: &[TrackCalculation]) -> u32 {
    tracks.iter().map(|t| t.months()).max().unwrap_or(0) as u32
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}
