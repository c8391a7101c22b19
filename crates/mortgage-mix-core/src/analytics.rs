//! Single entry point over every engine operation.
//!
//! Takes one tagged input, routes it to the matching calculation and wraps
//! the result in the standard `ComputationOutput` envelope with methodology,
//! consistency warnings and timing metadata. The CLI and the Node bindings
//! both go through here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::payment::{compute_monthly_payment, total_months};
use crate::amortization::schedule::{generate_amortization_schedule_with_config, AmortizationRow};
use crate::config::EngineConfig;
use crate::mix::aggregate::{calculate_mix_with_config, mix_warnings, Mix, MixCalculation};
use crate::mix::track::{calculate_track_with_config, Track, TrackCalculation};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::MortgageMixResult;

#[cfg(feature = "comparison")]
use crate::comparison::compare::{compare_mixes_with_config, MixComparison};

#[cfg(feature = "series")]
use crate::series::{
    generate_blended_rate_series, generate_debt_balance_series, generate_monthly_payment_series,
    generate_principal_interest_breakdown_series, yearly_totals, BreakdownRow, SeriesRow,
    YearlyAggregation, YearlyRow,
};

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Principal, rate and term of a standalone loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual rate in percent.
    pub interest_rate: Rate,
    pub years: Years,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    #[serde(flatten)]
    pub terms: LoanTerms,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackInput {
    pub track: Track,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixInput {
    pub mix: Mix,
    #[serde(default)]
    pub config: EngineConfig,
}

#[cfg(feature = "comparison")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareInput {
    pub mixes: Vec<Mix>,
    #[serde(default)]
    pub config: EngineConfig,
}

/// Which chart series to derive from a mix.
#[cfg(feature = "series")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    MonthlyPayment,
    DebtBalance,
    BlendedRate,
    PrincipalInterest,
}

#[cfg(feature = "series")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesInput {
    pub mix: Mix,
    pub kind: SeriesKind,
    /// Collapse the monthly rows into loan years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly: Option<YearlyAggregation>,
    #[serde(default)]
    pub config: EngineConfig,
}

/// Top-level engine input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MixAnalyticsInput {
    Payment(LoanTerms),
    Schedule(ScheduleInput),
    Track(TrackInput),
    Mix(MixInput),
    #[cfg(feature = "comparison")]
    Compare(CompareInput),
    #[cfg(feature = "series")]
    Series(SeriesInput),
}

impl MixAnalyticsInput {
    /// Replace the engine config carried by the input. `Payment` has none.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        match &mut self {
            MixAnalyticsInput::Payment(_) => {}
            MixAnalyticsInput::Schedule(s) => s.config = config,
            MixAnalyticsInput::Track(t) => t.config = config,
            MixAnalyticsInput::Mix(m) => m.config = config,
            #[cfg(feature = "comparison")]
            MixAnalyticsInput::Compare(c) => c.config = config,
            #[cfg(feature = "series")]
            MixAnalyticsInput::Series(s) => s.config = config,
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutput {
    pub monthly_payment: Money,
    pub total_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub rows: Vec<AmortizationRow>,
}

#[cfg(feature = "series")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SeriesOutput {
    Monthly(Vec<SeriesRow>),
    Breakdown(Vec<BreakdownRow>),
    Yearly(Vec<YearlyRow>),
}

/// Unified engine output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MixAnalyticsOutput {
    Payment(PaymentOutput),
    Schedule(ScheduleOutput),
    Track(TrackCalculation),
    Mix(MixCalculation),
    #[cfg(feature = "comparison")]
    Compare(MixComparison),
    #[cfg(feature = "series")]
    Series(SeriesOutput),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the requested engine operation.
pub fn analyze_mix(
    input: &MixAnalyticsInput,
) -> MortgageMixResult<ComputationOutput<MixAnalyticsOutput>> {
    let start = Instant::now();

    let (output, methodology, warnings) = match input {
        MixAnalyticsInput::Payment(terms) => {
            let monthly_payment =
                compute_monthly_payment(terms.principal, terms.interest_rate, terms.years)?;
            (
                MixAnalyticsOutput::Payment(PaymentOutput {
                    monthly_payment,
                    total_months: total_months(terms.years)?,
                }),
                "Level Annuity Payment (Monthly Compounding)",
                Vec::new(),
            )
        }
        MixAnalyticsInput::Schedule(sched) => {
            let (out, w) = compute_schedule(sched)?;
            (
                MixAnalyticsOutput::Schedule(out),
                "Level-Payment Amortization Schedule",
                w,
            )
        }
        MixAnalyticsInput::Track(t) => {
            let calc = calculate_track_with_config(&t.track, &t.config)?;
            (
                MixAnalyticsOutput::Track(calc),
                "Single Track Amortization",
                Vec::new(),
            )
        }
        MixAnalyticsInput::Mix(m) => {
            let calc = calculate_mix_with_config(&m.mix, &m.config)?;
            (
                MixAnalyticsOutput::Mix(calc),
                "Mortgage Mix Aggregation (Amount-Weighted Averages)",
                mix_warnings(&m.mix),
            )
        }
        #[cfg(feature = "comparison")]
        MixAnalyticsInput::Compare(c) => {
            let cmp = compare_mixes_with_config(&c.mixes, &c.config)?;
            let warnings = c.mixes.iter().flat_map(mix_warnings).collect();
            (
                MixAnalyticsOutput::Compare(cmp),
                "Mortgage Mix Comparison (Lowest Payment / Cost / Interest)",
                warnings,
            )
        }
        #[cfg(feature = "series")]
        MixAnalyticsInput::Series(s) => {
            let (out, w) = compute_series(s)?;
            (
                MixAnalyticsOutput::Series(out),
                "Month-Aligned Mix Chart Series",
                w,
            )
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

fn compute_schedule(input: &ScheduleInput) -> MortgageMixResult<(ScheduleOutput, Vec<String>)> {
    let mut warnings = Vec::new();
    let terms = &input.terms;

    let monthly_payment =
        compute_monthly_payment(terms.principal, terms.interest_rate, terms.years)?;
    let rows = generate_amortization_schedule_with_config(
        terms.principal,
        terms.interest_rate,
        terms.years,
        &input.config,
    )?;

    let term = total_months(terms.years)?;
    if (rows.len() as u32) < term && terms.principal > Decimal::ZERO {
        warnings.push(format!(
            "Schedule paid off after {} of {} months (balance tolerance {})",
            rows.len(),
            term,
            input.config.balance_tolerance
        ));
    }

    let total_paid: Money = rows.iter().map(|r| r.payment).sum();
    Ok((
        ScheduleOutput {
            monthly_payment,
            total_paid,
            total_interest: total_paid - terms.principal,
            rows,
        },
        warnings,
    ))
}

#[cfg(feature = "series")]
fn compute_series(input: &SeriesInput) -> MortgageMixResult<(SeriesOutput, Vec<String>)> {
    let mut warnings = mix_warnings(&input.mix);
    let calc = calculate_mix_with_config(&input.mix, &input.config)?;
    let tracks = &calc.tracks;

    let monthly = match input.kind {
        SeriesKind::MonthlyPayment => generate_monthly_payment_series(tracks),
        SeriesKind::DebtBalance => generate_debt_balance_series(tracks),
        SeriesKind::BlendedRate => generate_blended_rate_series(tracks),
        SeriesKind::PrincipalInterest => {
            if input.yearly.is_some() {
                warnings.push(
                    "Yearly aggregation is not available for the principal/interest breakdown"
                        .into(),
                );
            }
            return Ok((
                SeriesOutput::Breakdown(generate_principal_interest_breakdown_series(tracks)),
                warnings,
            ));
        }
    };

    let output = match input.yearly {
        Some(aggregation) => SeriesOutput::Yearly(yearly_totals(&monthly, aggregation)),
        None => SeriesOutput::Monthly(monthly),
    };
    Ok((output, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MortgageMixError;
    use crate::mix::track::TrackType;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn sample_mix() -> Mix {
        Mix {
            id: "offer-1".into(),
            name: "Bank A".into(),
            notes: Some("first meeting".into()),
            total_amount: dec!(900_000),
            tracks: vec![
                Track {
                    id: "fixed".into(),
                    name: "Fixed".into(),
                    track_type: TrackType::Fixed,
                    amount: dec!(300_000),
                    percentage: dec!(33.33),
                    interest_rate: dec!(4.8),
                    years: 25,
                },
                Track {
                    id: "prime".into(),
                    name: "Prime".into(),
                    track_type: TrackType::Prime,
                    amount: dec!(300_000),
                    percentage: dec!(33.33),
                    interest_rate: dec!(5.5),
                    years: 30,
                },
                Track {
                    id: "cpi".into(),
                    name: "CPI linked".into(),
                    track_type: TrackType::CpiLinked,
                    amount: dec!(300_000),
                    percentage: dec!(33.34),
                    interest_rate: dec!(3.2),
                    years: 20,
                },
            ],
            created_at: Utc.with_ymd_and_hms(2024, 5, 12, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_payment_envelope() {
        let input = MixAnalyticsInput::Payment(LoanTerms {
            principal: dec!(1_000_000),
            interest_rate: dec!(5),
            years: 25,
        });
        let out = analyze_mix(&input).unwrap();
        match out.result {
            MixAnalyticsOutput::Payment(p) => {
                assert!((p.monthly_payment - dec!(5845.90)).abs() < dec!(0.01));
                assert_eq!(p.total_months, 300);
            }
            other => panic!("unexpected output {other:?}"),
        }
        assert!(out.warnings.is_empty());
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_schedule_early_payoff_warns() {
        let input = MixAnalyticsInput::Schedule(ScheduleInput {
            terms: LoanTerms {
                principal: dec!(1_000_000),
                interest_rate: dec!(5),
                years: 25,
            },
            config: EngineConfig::with_balance_tolerance(dec!(6000)).unwrap(),
        });
        let out = analyze_mix(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("of 300 months"));
    }

    #[test]
    fn test_mix_envelope_has_no_warnings_when_consistent() {
        let input = MixAnalyticsInput::Mix(MixInput {
            mix: sample_mix(),
            config: EngineConfig::default(),
        });
        let out = analyze_mix(&input).unwrap();
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        match out.result {
            MixAnalyticsOutput::Mix(calc) => assert_eq!(calc.tracks.len(), 3),
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[cfg(feature = "comparison")]
    #[test]
    fn test_compare_empty_errors() {
        let input = MixAnalyticsInput::Compare(CompareInput {
            mixes: vec![],
            config: EngineConfig::default(),
        });
        assert!(matches!(
            analyze_mix(&input).unwrap_err(),
            MortgageMixError::EmptyComparison
        ));
    }

    #[cfg(feature = "series")]
    #[test]
    fn test_series_yearly_balance() {
        let input = MixAnalyticsInput::Series(SeriesInput {
            mix: sample_mix(),
            kind: SeriesKind::DebtBalance,
            yearly: Some(YearlyAggregation::Last),
            config: EngineConfig::default(),
        });
        let out = analyze_mix(&input).unwrap();
        match out.result {
            MixAnalyticsOutput::Series(SeriesOutput::Yearly(rows)) => {
                assert_eq!(rows.len(), 30);
                assert_eq!(rows.last().unwrap().total, Decimal::ZERO);
            }
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[cfg(feature = "series")]
    #[test]
    fn test_breakdown_ignores_yearly_with_warning() {
        let input = MixAnalyticsInput::Series(SeriesInput {
            mix: sample_mix(),
            kind: SeriesKind::PrincipalInterest,
            yearly: Some(YearlyAggregation::Sum),
            config: EngineConfig::default(),
        });
        let out = analyze_mix(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(matches!(
            out.result,
            MixAnalyticsOutput::Series(SeriesOutput::Breakdown(_))
        ));
    }

    #[test]
    fn test_input_parses_from_json() {
        let json = r#"{"Payment": {"principal": "250000", "interest_rate": "3.9", "years": 15}}"#;
        let input: MixAnalyticsInput = serde_json::from_str(json).unwrap();
        assert!(analyze_mix(&input).is_ok());
    }

    #[test]
    fn test_with_config_overrides_tolerance() {
        let json = r#"{"Schedule": {"principal": "1000000", "interest_rate": "5", "years": 25}}"#;
        let input: MixAnalyticsInput = serde_json::from_str(json).unwrap();
        let baseline = analyze_mix(&input).unwrap();
        assert!(baseline.warnings.is_empty());

        let config = EngineConfig::with_balance_tolerance(dec!(6000)).unwrap();
        let out = analyze_mix(&input.with_config(config)).unwrap();
        assert_eq!(out.warnings.len(), 1);
        match out.result {
            MixAnalyticsOutput::Schedule(s) => assert!(s.rows.len() < 300),
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[test]
    fn test_with_config_leaves_payment_untouched() {
        let terms = LoanTerms {
            principal: dec!(250_000),
            interest_rate: dec!(3.9),
            years: 15,
        };
        let config = EngineConfig::with_balance_tolerance(dec!(1)).unwrap();
        let input = MixAnalyticsInput::Payment(terms).with_config(config);
        assert!(matches!(input, MixAnalyticsInput::Payment(_)));
    }

    #[test]
    fn test_term_out_of_range_is_input_error() {
        let input = MixAnalyticsInput::Payment(LoanTerms {
            principal: dec!(100_000),
            interest_rate: dec!(4),
            years: 400_000_000,
        });
        assert!(matches!(
            analyze_mix(&input).unwrap_err(),
            MortgageMixError::InvalidInput { .. }
        ));
    }
}
