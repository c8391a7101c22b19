use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::series::monthly::SeriesRow;

/// How twelve monthly values collapse into one yearly value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearlyAggregation {
    /// Flows such as payments: add the months together.
    Sum,
    /// Stocks such as balances or rates: keep the year's last month.
    Last,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyRow {
    pub year: u32,
    /// Months of the year present in the source series (12 except possibly the last year).
    pub months: u32,
    pub total: Decimal,
    pub per_track: BTreeMap<String, Decimal>,
}

/// Collapse a monthly series into one row per loan year.
pub fn yearly_totals(rows: &[SeriesRow], aggregation: YearlyAggregation) -> Vec<YearlyRow> {
    let mut out: Vec<YearlyRow> = Vec::new();

    for row in rows {
        let starts_new_year = out.last().map_or(true, |y| y.year != row.year);
        if starts_new_year {
            out.push(YearlyRow {
                year: row.year,
                months: 0,
                total: Decimal::ZERO,
                per_track: BTreeMap::new(),
            });
        }
        let Some(current) = out.last_mut() else { continue };
        current.months += 1;

        match aggregation {
            YearlyAggregation::Sum => {
                current.total += row.total;
                for (id, value) in &row.per_track {
                    *current.per_track.entry(id.clone()).or_insert(Decimal::ZERO) += *value;
                }
            }
            YearlyAggregation::Last => {
                current.total = row.total;
                current.per_track = row.per_track.clone();
            }
        }
    }

    out
}
