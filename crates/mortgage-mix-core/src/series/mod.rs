//! Month-aligned chart series derived from computed tracks.
//!
//! Every generator spans months `1..=L`, `L` being the longest track schedule.
//! A track whose schedule has ended contributes nothing for later months.

pub mod monthly;
pub mod yearly;

pub use monthly::{
    generate_blended_rate_series, generate_debt_balance_series, generate_monthly_payment_series,
    generate_principal_interest_breakdown_series, BreakdownRow, SeriesRow,
};
pub use yearly::{yearly_totals, YearlyAggregation, YearlyRow};

/// Calendar year of the loan a 1-indexed month falls in.
pub fn year_of_month(month: u32) -> u32 {
    month.saturating_sub(1) / 12 + 1
}
