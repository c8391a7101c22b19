//! Portfolio-level totals and weighted averages for a mortgage mix.
//!
//! Tracks are computed independently; the mix only sums their results and
//! weights rate and term by each track's nominal amount over the mix's
//! declared total. A zero total yields zero averages rather than an error.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::MortgageMixError;
use crate::mix::track::{calculate_track_with_config, Track, TrackCalculation};
use crate::types::{Money, Rate};
use crate::MortgageMixResult;

/// Allowed gap, in percentage points, between a track's entered percentage
/// and its actual share of the mix total before a warning is raised.
const PERCENTAGE_DRIFT_TOLERANCE: Decimal = dec!(0.5);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A portfolio of tracks making up one mortgage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mix {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Declared mortgage principal. Not required to equal the sum of track amounts.
    pub total_amount: Money,
    pub tracks: Vec<Track>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixSummary {
    pub total_monthly_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    /// Σ(rate × amount) / total_amount, in percent.
    pub average_rate: Rate,
    /// Σ(years × amount) / total_amount.
    pub weighted_average_years: Decimal,
    /// Σ track amounts.
    pub track_amount_total: Money,
    /// Σ track amounts − total_amount. Non-zero means the tracks do not cover
    /// (or over-cover) the declared principal.
    pub amount_mismatch: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixCalculation {
    /// The mix as supplied, unchanged.
    pub mix: Mix,
    /// One entry per track, in input order.
    pub tracks: Vec<TrackCalculation>,
    pub summary: MixSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn calculate_mix(mix: &Mix) -> MortgageMixResult<MixCalculation> {
    calculate_mix_with_config(mix, &EngineConfig::default())
}

pub fn calculate_mix_with_config(
    mix: &Mix,
    config: &EngineConfig,
) -> MortgageMixResult<MixCalculation> {
    if mix.total_amount < Decimal::ZERO {
        return Err(MortgageMixError::InvalidInput {
            field: "total_amount".into(),
            reason: "Mix total amount cannot be negative".into(),
        });
    }

    let tracks = mix
        .tracks
        .iter()
        .map(|track| calculate_track_with_config(track, config))
        .collect::<MortgageMixResult<Vec<_>>>()?;

    let summary = summarize(mix.total_amount, &tracks)?;
    debug!(
        mix_id = %mix.id,
        tracks = tracks.len(),
        total_monthly_payment = %summary.total_monthly_payment,
        "mix calculated"
    );

    Ok(MixCalculation {
        mix: mix.clone(),
        tracks,
        summary,
    })
}

fn summarize(total_amount: Money, tracks: &[TrackCalculation]) -> MortgageMixResult<MixSummary> {
    let mut total_monthly_payment = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut rate_numerator = Decimal::ZERO;
    let mut years_numerator = Decimal::ZERO;
    let mut track_amount_total = Decimal::ZERO;

    for calc in tracks {
        let track = &calc.track;
        total_monthly_payment = add(total_monthly_payment, calc.monthly_payment)?;
        total_interest = add(total_interest, calc.total_interest)?;
        total_paid = add(total_paid, calc.total_paid)?;
        rate_numerator = add(rate_numerator, mul(track.interest_rate, track.amount)?)?;
        years_numerator = add(years_numerator, mul(Decimal::from(track.years), track.amount)?)?;
        track_amount_total = add(track_amount_total, track.amount)?;
    }

    let (average_rate, weighted_average_years) = if total_amount.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        (
            div(rate_numerator, total_amount)?,
            div(years_numerator, total_amount)?,
        )
    };

    Ok(MixSummary {
        total_monthly_payment,
        total_interest,
        total_paid,
        average_rate,
        weighted_average_years,
        track_amount_total,
        amount_mismatch: track_amount_total - total_amount,
    })
}

fn add(a: Decimal, b: Decimal) -> MortgageMixResult<Decimal> {
    a.checked_add(b).ok_or_else(|| MortgageMixError::overflow("amount"))
}

fn mul(a: Decimal, b: Decimal) -> MortgageMixResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| MortgageMixError::overflow("amount"))
}

fn div(a: Decimal, b: Decimal) -> MortgageMixResult<Decimal> {
    a.checked_div(b).ok_or_else(|| MortgageMixError::overflow("total_amount"))
}

/// Non-blocking consistency notes for a mix: empty track list, tracks not
/// summing to the declared total, and entered percentages that drifted from
/// the actual amount shares.
pub fn mix_warnings(mix: &Mix) -> Vec<String> {
    let mut warnings = Vec::new();

    if mix.tracks.is_empty() {
        warnings.push(format!("Mix '{}' has no tracks", mix.name));
        return warnings;
    }

    let track_total = mix
        .tracks
        .iter()
        .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.amount));
    if track_total != Some(mix.total_amount) {
        let track_total = track_total
            .map_or_else(|| "an out-of-range value".to_string(), |v| v.to_string());
        warnings.push(format!(
            "Mix '{}': track amounts sum to {} but total amount is {}",
            mix.name, track_total, mix.total_amount
        ));
    }

    if !mix.total_amount.is_zero() {
        for track in &mix.tracks {
            let Some(actual) = track
                .amount
                .checked_div(mix.total_amount)
                .and_then(|share| share.checked_mul(dec!(100)))
            else {
                continue;
            };
            if (actual - track.percentage).abs() > PERCENTAGE_DRIFT_TOLERANCE {
                warnings.push(format!(
                    "Track '{}': entered percentage {} differs from amount share {}",
                    track.name,
                    track.percentage,
                    actual.round_dp(2)
                ));
            }
        }
    }

    warnings
}
