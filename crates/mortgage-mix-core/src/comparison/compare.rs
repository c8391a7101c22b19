//! Side-by-side evaluation of competing mortgage mixes.
//!
//! Each mix is calculated in full, then three independent winners are picked
//! by linear scan: lowest monthly payment, lowest total cost, lowest total
//! interest. Ties go to the mix listed first.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::MortgageMixError;
use crate::mix::aggregate::{calculate_mix_with_config, Mix, MixCalculation, MixSummary};
use crate::types::Money;
use crate::MortgageMixResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// The winning mix for one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixPick {
    /// Position of the mix in the compared list.
    pub index: usize,
    pub mix_id: String,
    pub mix_name: String,
    /// The criterion value that won.
    pub value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixComparison {
    pub per_mix_calculations: Vec<MixCalculation>,
    pub best_by_monthly_payment: MixPick,
    /// Lowest total paid over the life of the loan.
    pub best_by_total_cost: MixPick,
    pub best_by_total_interest: MixPick,
    /// Highest minus lowest total monthly payment.
    pub monthly_payment_spread: Money,
    /// Highest minus lowest total paid.
    pub total_cost_spread: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn compare_mixes(mixes: &[Mix]) -> MortgageMixResult<MixComparison> {
    compare_mixes_with_config(mixes, &EngineConfig::default())
}

pub fn compare_mixes_with_config(
    mixes: &[Mix],
    config: &EngineConfig,
) -> MortgageMixResult<MixComparison> {
    if mixes.is_empty() {
        return Err(MortgageMixError::EmptyComparison);
    }

    let per_mix_calculations = mixes
        .iter()
        .map(|mix| calculate_mix_with_config(mix, config))
        .collect::<MortgageMixResult<Vec<_>>>()?;

    let best_by_monthly_payment = pick_lowest(&per_mix_calculations, |s| s.total_monthly_payment);
    let best_by_total_cost = pick_lowest(&per_mix_calculations, |s| s.total_paid);
    let best_by_total_interest = pick_lowest(&per_mix_calculations, |s| s.total_interest);

    let monthly_payment_spread = spread(&per_mix_calculations, |s| s.total_monthly_payment);
    let total_cost_spread = spread(&per_mix_calculations, |s| s.total_paid);

    debug!(
        mixes = mixes.len(),
        by_payment = %best_by_monthly_payment.mix_id,
        by_cost = %best_by_total_cost.mix_id,
        by_interest = %best_by_total_interest.mix_id,
        "mixes compared"
    );

    Ok(MixComparison {
        per_mix_calculations,
        best_by_monthly_payment,
        best_by_total_cost,
        best_by_total_interest,
        monthly_payment_spread,
        total_cost_spread,
    })
}

/// Strict `<` scan; the first of equal values is kept. `calcs` is non-empty.
fn pick_lowest(calcs: &[MixCalculation], metric: impl Fn(&MixSummary) -> Money) -> MixPick {
    let mut best_idx = 0;
    let mut best_value = metric(&calcs[0].summary);

    for (idx, calc) in calcs.iter().enumerate().skip(1) {
        let value = metric(&calc.summary);
        if value < best_value {
            best_idx = idx;
            best_value = value;
        }
    }

    let mix = &calcs[best_idx].mix;
    MixPick {
        index: best_idx,
        mix_id: mix.id.clone(),
        mix_name: mix.name.clone(),
        value: best_value,
    }
}

fn spread(calcs: &[MixCalculation], metric: impl Fn(&MixSummary) -> Money) -> Money {
    let values = calcs.iter().map(|c| metric(&c.summary));
    let max = values.clone().max().unwrap_or(Decimal::ZERO);
    let min = values.min().unwrap_or(Decimal::ZERO);
    max - min
}
