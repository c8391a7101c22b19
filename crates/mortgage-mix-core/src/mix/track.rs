//! A single mortgage track and its computed payment profile.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::payment::compute_monthly_payment;
use crate::amortization::schedule::{generate_amortization_schedule_with_config, AmortizationRow};
use crate::config::EngineConfig;
use crate::types::{Money, Rate, Years};
use crate::MortgageMixResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Rate regime of a track. Descriptive only; every regime amortizes with the
/// same level-payment schedule at the track's nominal rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackType {
    #[default]
    Fixed,
    Variable,
    Prime,
    CpiLinked,
}

/// One interest-rate/term tranche of a mortgage mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub track_type: TrackType,
    /// Principal allocated to this track.
    pub amount: Money,
    /// Share of the mix total as entered in the form (0-100). Display only;
    /// no calculation reads it.
    #[serde(default)]
    pub percentage: Decimal,
    /// Nominal annual rate in percent.
    pub interest_rate: Rate,
    pub years: Years,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Computed payment profile for one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCalculation {
    /// The track as supplied, unchanged.
    pub track: Track,
    pub monthly_payment: Money,
    /// Total paid less the principal.
    pub total_interest: Money,
    /// Sum of every scheduled payment.
    pub total_paid: Money,
    pub schedule: Vec<AmortizationRow>,
}

impl TrackCalculation {
    /// Row for a 1-indexed month, or `None` once the schedule has ended.
    pub fn row(&self, month: u32) -> Option<&AmortizationRow> {
        month
            .checked_sub(1)
            .and_then(|idx| self.schedule.get(idx as usize))
    }

    pub fn months(&self) -> usize {
        self.schedule.len()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn calculate_track(track: &Track) -> MortgageMixResult<TrackCalculation> {
    calculate_track_with_config(track, &EngineConfig::default())
}

pub fn calculate_track_with_config(
    track: &Track,
    config: &EngineConfig,
) -> MortgageMixResult<TrackCalculation> {
    let monthly_payment = compute_monthly_payment(track.amount, track.interest_rate, track.years)?;
    let schedule = generate_amortization_schedule_with_config(
        track.amount,
        track.interest_rate,
        track.years,
        config,
    )?;

    let total_paid: Money = schedule.iter().map(|row| row.payment).sum();
    let total_interest = total_paid - track.amount;

    Ok(TrackCalculation {
        track: track.clone(),
        monthly_payment,
        total_interest,
        total_paid,
        schedule,
    })
}
