pub mod amortization;
pub mod analytics;
pub mod config;
pub mod error;
pub mod mix;
pub mod types;

#[cfg(feature = "comparison")]
pub mod comparison;

#[cfg(feature = "series")]
pub mod series;

pub use amortization::payment::compute_monthly_payment;
pub use amortization::schedule::{generate_amortization_schedule, AmortizationRow};
pub use config::EngineConfig;
pub use error::MortgageMixError;
pub use mix::aggregate::{calculate_mix, Mix, MixCalculation, MixSummary};
pub use mix::track::{calculate_track, Track, TrackCalculation, TrackType};
pub use types::*;

#[cfg(feature = "comparison")]
pub use comparison::compare::{compare_mixes, MixComparison, MixPick};

/// Standard result type for all mortgage-mix operations
pub type MortgageMixResult<T> = Result<T, MortgageMixError>;
