use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use mortgage_mix_core::analytics::{self, MixAnalyticsInput};
use mortgage_mix_core::mix::track::TrackCalculation;
use mortgage_mix_core::{series, Mix, Track};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<'a, T: Deserialize<'a>>(json: &'a str) -> NapiResult<T> {
    serde_json::from_str(json).map_err(to_napi_error)
}

fn parse_decimal(field: &str, value: &str) -> NapiResult<Decimal> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|e| to_napi_error(format!("{field}: {e}")))
}

// ---------------------------------------------------------------------------
// Single loan
// ---------------------------------------------------------------------------

/// Decimal arguments travel as strings so no precision is lost in JS numbers.
#[napi]
pub fn compute_monthly_payment(
    principal: String,
    annual_rate_percent: String,
    years: u32,
) -> NapiResult<String> {
    let payment = mortgage_mix_core::compute_monthly_payment(
        parse_decimal("principal", &principal)?,
        parse_decimal("annual_rate_percent", &annual_rate_percent)?,
        years,
    )
    .map_err(to_napi_error)?;
    Ok(payment.to_string())
}

#[napi]
pub fn generate_amortization_schedule(
    principal: String,
    annual_rate_percent: String,
    years: u32,
) -> NapiResult<String> {
    let rows = mortgage_mix_core::generate_amortization_schedule(
        parse_decimal("principal", &principal)?,
        parse_decimal("annual_rate_percent", &annual_rate_percent)?,
        years,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&rows).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Tracks and mixes
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_track(track_json: String) -> NapiResult<String> {
    let track: Track = parse(&track_json)?;
    let output = mortgage_mix_core::calculate_track(&track).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_mix(mix_json: String) -> NapiResult<String> {
    let mix: Mix = parse(&mix_json)?;
    let output = mortgage_mix_core::calculate_mix(&mix).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_mixes(mixes_json: String) -> NapiResult<String> {
    let mixes: Vec<Mix> = parse(&mixes_json)?;
    let output = mortgage_mix_core::compare_mixes(&mixes).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Chart series (input: JSON array of track calculations)
// ---------------------------------------------------------------------------

#[napi]
pub fn generate_monthly_payment_series(track_calculations_json: String) -> NapiResult<String> {
    let tracks: Vec<TrackCalculation> = parse(&track_calculations_json)?;
    serde_json::to_string(&series::generate_monthly_payment_series(&tracks))
        .map_err(to_napi_error)
}

#[napi]
pub fn generate_debt_balance_series(track_calculations_json: String) -> NapiResult<String> {
    let tracks: Vec<TrackCalculation> = parse(&track_calculations_json)?;
    serde_json::to_string(&series::generate_debt_balance_series(&tracks)).map_err(to_napi_error)
}

#[napi]
pub fn generate_blended_rate_series(track_calculations_json: String) -> NapiResult<String> {
    let tracks: Vec<TrackCalculation> = parse(&track_calculations_json)?;
    serde_json::to_string(&series::generate_blended_rate_series(&tracks)).map_err(to_napi_error)
}

#[napi]
pub fn generate_principal_interest_breakdown_series(
    track_calculations_json: String,
) -> NapiResult<String> {
    let tracks: Vec<TrackCalculation> = parse(&track_calculations_json)?;
    serde_json::to_string(&series::generate_principal_interest_breakdown_series(&tracks))
        .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Enveloped dispatcher
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_mix(input_json: String) -> NapiResult<String> {
    let input: MixAnalyticsInput = parse(&input_json)?;
    let output = analytics::analyze_mix(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
