use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::collections::HashMap;

use salary_tax::intake::ProfileSubmission;
use salary_tax::profile::FinancialProfile;
use salary_tax::tax::{
    compare, compute_legacy_regime, compute_new_regime, Regime, NEW_REGIME_SLABS,
    OLD_REGIME_SLABS,
};

fn fields(value: Value) -> HashMap<String, Value> {
    serde_json::from_value(value).expect("fields must be a JSON object")
}

fn sample_profile() -> FinancialProfile {
    FinancialProfile::from_fields(&fields(json!({
        "gross_salary": "800000",
        "basic_salary": "400000",
        "hra_received": "160000",
        "rent_paid": "180000",
        "deduction_80c": "150000",
        "deduction_80d": "25000",
        "standard_deduction": "50000",
        "professional_tax": "2400",
        "tds": "0",
    })))
}

fn gross_only(gross: Decimal) -> FinancialProfile {
    FinancialProfile {
        gross_salary: gross,
        ..FinancialProfile::default()
    }
}

#[test]
fn test_legacy_regime_worked_example() {
    assert_eq!(compute_legacy_regime(&sample_profile()), dec!(9495.2));
}

#[test]
fn test_new_regime_worked_example() {
    let profile = sample_profile();
    assert_eq!(compute_new_regime(&profile), dec!(31200.0));

    let result = compare(&profile);
    assert_eq!(result.tax_old_regime, dec!(9495.2));
    assert_eq!(result.tax_new_regime, dec!(31200));
    assert_eq!(result.best_regime, Regime::Old);
}

#[test]
fn test_empty_profile_ties_to_new_regime() {
    let result = compare(&FinancialProfile::from_fields(&HashMap::new()));
    assert_eq!(result.tax_old_regime, Decimal::ZERO);
    assert_eq!(result.tax_new_regime, Decimal::ZERO);
    assert_eq!(result.best_regime, Regime::New);

    let zeros = FinancialProfile::from_fields(&fields(json!({
        "gross_salary": 0, "basic_salary": 0, "hra_received": 0, "rent_paid": 0,
        "deduction_80c": 0, "deduction_80d": 0, "standard_deduction": 0,
        "professional_tax": 0, "tds": 0,
    })));
    let result = compare(&zeros);
    assert_eq!(result.tax_old_regime, Decimal::ZERO);
    assert_eq!(result.tax_new_regime, Decimal::ZERO);
    assert_eq!(result.best_regime, Regime::New);
}

#[test]
fn test_garbage_values_never_fail() {
    let profile = FinancialProfile::from_fields(&fields(json!({
        "gross_salary": "twelve lakh",
        "basic_salary": [1, 2],
        "hra_received": {"monthly": 10},
        "rent_paid": true,
        "standard_deduction": "n/a",
        "tds": "-400",
    })));

    assert_eq!(profile, FinancialProfile::default());
    let result = compare(&profile);
    assert_eq!(result.best_regime, Regime::New);
}

#[test]
fn test_taxes_are_non_negative_and_monotonic_in_gross() {
    let mut previous_old = Decimal::ZERO;
    let mut previous_new = Decimal::ZERO;

    // 0 to 3M in 25k steps, crossing every slab boundary of both regimes
    for step in 0..=120u32 {
        let mut profile = sample_profile();
        profile.gross_salary = Decimal::from(step * 25_000);

        let old = compute_legacy_regime(&profile);
        let new = compute_new_regime(&profile);

        assert!(old >= Decimal::ZERO, "old regime negative at step {}", step);
        assert!(new >= Decimal::ZERO, "new regime negative at step {}", step);
        assert!(old >= previous_old, "old regime decreased at step {}", step);
        assert!(new >= previous_new, "new regime decreased at step {}", step);

        previous_old = old;
        previous_new = new;
    }
}

#[test]
fn test_income_on_slab_boundaries_does_not_spill_over() {
    // Taxable income = gross - 50k standard deduction
    let cases = [
        (dec!(300000), dec!(0), dec!(0)),
        (dec!(550000), dec!(12500), dec!(10000)),
        (dec!(650000), dec!(32500), dec!(15000)),
        (dec!(1050000), dec!(112500), dec!(60000)),
        (dec!(1250000), dec!(172500), dec!(90000)),
    ];

    for (gross, old_slab_tax, new_slab_tax) in cases {
        let profile = gross_only(gross);
        assert_eq!(
            compute_legacy_regime(&profile),
            (old_slab_tax * dec!(1.04)).round_dp(2),
            "old regime at gross {}",
            gross
        );
        assert_eq!(
            compute_new_regime(&profile),
            (new_slab_tax * dec!(1.04)).round_dp(2),
            "new regime at gross {}",
            gross
        );
    }
}

#[test]
fn test_slab_tables_are_ascending() {
    for table in [&OLD_REGIME_SLABS, &NEW_REGIME_SLABS] {
        let bounds: Vec<Decimal> = table.slabs().iter().filter_map(|s| s.upper).collect();
        assert!(bounds.windows(2).all(|w| w[0] < w[1]), "{} not ascending", table.name);
        assert_eq!(table.slabs().last().and_then(|s| s.upper), None);
    }
}

#[test]
fn test_high_income_favours_new_regime_without_deductions() {
    let result = compare(&gross_only(dec!(2500000)));
    // old: 112.5k + 30% of 1.45M = 547.5k; new: 150k + 30% of 950k = 435k
    assert_eq!(result.tax_old_regime, dec!(569400));
    assert_eq!(result.tax_new_regime, dec!(452400));
    assert_eq!(result.best_regime, Regime::New);
}

#[test]
fn test_compare_is_idempotent() {
    let profile = sample_profile();
    assert_eq!(compare(&profile), compare(&profile));
}

#[test]
fn test_monthly_submission_end_to_end() {
    // Monthly slip: 66,666.67 * 12 ~ 800k gross
    let submission = ProfileSubmission::from_form(&fields(json!({
        "gross_salary": "66,666.67",
        "basic_salary": "33,333.33",
        "salary_period": "monthly",
        "selected_regime": "old",
    })));

    let profile = submission.annualized_profile();
    assert_eq!(profile.gross_salary, dec!(800000.04));
    assert_eq!(profile.standard_deduction, dec!(50000));

    let result = compare(&profile);
    assert_eq!(submission.selected_regime, Regime::Old);
    assert_eq!(result.best_regime, Regime::New);
}

#[test]
fn test_oversized_amounts_fall_back_instead_of_overflowing() {
    let profile = FinancialProfile::from_fields(&fields(json!({
        "gross_salary": "1000000",
        "deduction_80c": "79228162514264337593543950335",
        "deduction_80d": "79228162514264337593543950335",
    })));
    assert_eq!(profile.deduction_80c, Decimal::ZERO);
    assert_eq!(profile.deduction_80d, Decimal::ZERO);

    let result = compare(&profile);
    assert_eq!(result.tax_old_regime, compute_legacy_regime(&gross_only(dec!(1000000))));

    let submission = ProfileSubmission::from_form(&fields(json!({
        "gross_salary": "1e28",
        "salary_period": "monthly",
    })));
    let annual = submission.annualized_profile();
    assert_eq!(annual.gross_salary, Decimal::ZERO);
    assert_eq!(compare(&annual).best_regime, Regime::New);
}

#[test]
fn test_hand_built_extreme_profile_saturates() {
    let profile = FinancialProfile {
        gross_salary: Decimal::MAX,
        deduction_80c: Decimal::MAX,
        deduction_80d: Decimal::MAX,
        ..FinancialProfile::default()
    };
    let result = compare(&profile);
    assert_eq!(result.tax_old_regime, Decimal::ZERO);
    assert!(result.tax_new_regime > Decimal::ZERO);
    assert_eq!(result.best_regime, Regime::Old);

    let submission = ProfileSubmission {
        profile: FinancialProfile {
            gross_salary: Decimal::MAX,
            ..FinancialProfile::default()
        },
        selected_regime: Regime::New,
        period: salary_tax::intake::SalaryPeriod::Monthly,
    };
    assert_eq!(submission.annualized_profile().gross_salary, Decimal::MAX);
}

#[test]
fn test_ceiling_amount_is_still_computed() {
    let submission = ProfileSubmission::from_form(&fields(json!({
        "gross_salary": "1e15",
        "deduction_80c": "1e15",
        "salary_period": "monthly",
    })));
    let annual = submission.annualized_profile();
    assert_eq!(annual.gross_salary, dec!(12000000000000000));
    assert!(compute_new_regime(&annual) > Decimal::ZERO);
    assert_eq!(compute_legacy_regime(&annual), Decimal::ZERO);
}
