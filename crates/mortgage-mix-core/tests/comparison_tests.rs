#![cfg(feature = "comparison")]

use mortgage_mix_core::comparison::compare::compare_mixes;
use mortgage_mix_core::mix::aggregate::Mix;
use mortgage_mix_core::mix::track::{Track, TrackType};
use mortgage_mix_core::MortgageMixError;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn mix_with(id: &str, tracks: Vec<(Decimal, Decimal, u32)>) -> Mix {
    let total_amount = tracks.iter().map(|(amount, _, _)| *amount).sum();
    Mix {
        id: id.into(),
        name: format!("Offer {id}"),
        notes: None,
        total_amount,
        tracks: tracks
            .into_iter()
            .enumerate()
            .map(|(i, (amount, interest_rate, years))| Track {
                id: format!("{id}-{i}"),
                name: format!("Track {i}"),
                track_type: TrackType::Variable,
                amount,
                percentage: Decimal::ZERO,
                interest_rate,
                years,
            })
            .collect(),
        created_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
    }
}

#[test]
fn test_lowest_monthly_payment_selected() {
    // Zero-rate 10-year tracks: payments of exactly 5000, 4500 and 5200.
    let mixes = vec![
        mix_with("a", vec![(dec!(600_000), Decimal::ZERO, 10)]),
        mix_with("b", vec![(dec!(540_000), Decimal::ZERO, 10)]),
        mix_with("c", vec![(dec!(624_000), Decimal::ZERO, 10)]),
    ];
    let cmp = compare_mixes(&mixes).unwrap();

    let payments: Vec<Decimal> = cmp
        .per_mix_calculations
        .iter()
        .map(|c| c.summary.total_monthly_payment)
        .collect();
    assert_eq!(payments, vec![dec!(5000), dec!(4500), dec!(5200)]);
    assert_eq!(cmp.best_by_monthly_payment.index, 1);
    assert_eq!(cmp.best_by_monthly_payment.mix_id, "b");
    assert_eq!(cmp.best_by_monthly_payment.value, dec!(4500));
    assert_eq!(cmp.monthly_payment_spread, dec!(700));
}

#[test]
fn test_empty_comparison_rejected() {
    let err = compare_mixes(&[]).unwrap_err();
    assert!(matches!(err, MortgageMixError::EmptyComparison));
    assert_eq!(err.to_string(), "No mixes to compare");
}

#[test]
fn test_three_independent_winners() {
    let mixes = vec![
        // Long term, low payment, most interest.
        mix_with("stretch", vec![(dec!(1_000_000), dec!(4), 30)]),
        // Short term, high payment, least interest.
        mix_with("short", vec![(dec!(1_000_000), dec!(4), 12)]),
        // Balanced blend.
        mix_with(
            "blend",
            vec![(dec!(500_000), dec!(3.5), 20), (dec!(500_000), dec!(4.5), 25)],
        ),
    ];
    let cmp = compare_mixes(&mixes).unwrap();

    assert_eq!(cmp.best_by_monthly_payment.mix_id, "stretch");
    assert_eq!(cmp.best_by_total_cost.mix_id, "short");
    assert_eq!(cmp.best_by_total_interest.mix_id, "short");
    assert_eq!(cmp.per_mix_calculations.len(), 3);
}

#[test]
fn test_invalid_mix_fails_comparison() {
    let mixes = vec![
        mix_with("ok", vec![(dec!(100_000), dec!(4), 10)]),
        mix_with("bad", vec![(dec!(100_000), dec!(4), 0)]),
    ];
    assert!(matches!(
        compare_mixes(&mixes),
        Err(MortgageMixError::InvalidInput { .. })
    ));
}
