use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::comparison::Regime;
use super::slabs::{SlabSlice, NEW_REGIME_SLABS, OLD_REGIME_SLABS};
use crate::profile::FinancialProfile;

/// Health and education cess (4%) applied on top of slab tax
pub const CESS_RATE: Decimal = Decimal::from_parts(4, 0, 0, false, 2);

/// HRA exemption cap as a share of basic salary (non-metro)
const HRA_BASIC_CAP: Decimal = Decimal::from_parts(40, 0, 0, false, 2);

/// Share of basic salary subtracted from rent paid
const RENT_BASIC_OFFSET: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// How a regime arrived at its tax figure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegimeBreakdown {
    pub regime: Regime,
    pub hra_exemption: Decimal,
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,
    pub slab_tax: Decimal,
    pub cess: Decimal,
    pub total_tax: Decimal,
    pub slices: Vec<SlabSlice>,
}

/// Exempt part of the house rent allowance.
///
/// Least of: HRA received, 40% of basic, rent paid in excess of 10% of basic
/// (never below zero).
pub fn hra_exemption(profile: &FinancialProfile) -> Decimal {
    let rent_excess = (profile.rent_paid - RENT_BASIC_OFFSET * profile.basic_salary).max(Decimal::ZERO);
    profile
        .hra_received
        .min(HRA_BASIC_CAP * profile.basic_salary)
        .min(rent_excess)
}

/// Legacy regime with HRA exemption and itemized deductions
pub fn compute_legacy_breakdown(profile: &FinancialProfile) -> RegimeBreakdown {
    let hra_exemption = hra_exemption(profile);
    // Saturates so hand-built profiles near Decimal::MAX cannot panic
    let total_deductions = [
        hra_exemption,
        profile.professional_tax,
        profile.deduction_80c,
        profile.deduction_80d,
    ]
    .into_iter()
    .fold(profile.standard_deduction, Decimal::saturating_add);

    finish(Regime::Old, profile, hra_exemption, total_deductions)
}

/// Simplified regime: only the standard deduction applies
pub fn compute_new_breakdown(profile: &FinancialProfile) -> RegimeBreakdown {
    finish(Regime::New, profile, Decimal::ZERO, profile.standard_deduction)
}

/// Tax payable under the legacy regime, cess included, rounded to 2 dp
pub fn compute_legacy_regime(profile: &FinancialProfile) -> Decimal {
    compute_legacy_breakdown(profile).total_tax
}

/// Tax payable under the simplified regime, cess included, rounded to 2 dp
pub fn compute_new_regime(profile: &FinancialProfile) -> Decimal {
    compute_new_breakdown(profile).total_tax
}

fn finish(
    regime: Regime,
    profile: &FinancialProfile,
    hra_exemption: Decimal,
    total_deductions: Decimal,
) -> RegimeBreakdown {
    let table = match regime {
        Regime::Old => &OLD_REGIME_SLABS,
        Regime::New => &NEW_REGIME_SLABS,
    };

    let taxable_income = (profile.gross_salary - total_deductions).max(Decimal::ZERO);
    let slices = table.breakdown(taxable_income);
    let slab_tax: Decimal = slices.iter().map(|s| s.tax).sum();
    let cess = slab_tax * CESS_RATE;

    RegimeBreakdown {
        regime,
        hra_exemption,
        total_deductions,
        taxable_income,
        slab_tax,
        cess,
        total_tax: round_currency(slab_tax + cess),
        slices,
    }
}

/// Round to 2 dp, ties to even
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_profile() -> FinancialProfile {
        FinancialProfile {
            gross_salary: dec!(800000),
            basic_salary: dec!(400000),
            hra_received: dec!(160000),
            rent_paid: dec!(180000),
            deduction_80c: dec!(150000),
            deduction_80d: dec!(25000),
            standard_deduction: dec!(50000),
            professional_tax: dec!(2400),
            tds: Decimal::ZERO,
        }
    }

    #[test]
    fn test_hra_exemption_takes_least_of_three() {
        // min(160000, 160000, 140000)
        assert_eq!(hra_exemption(&sample_profile()), dec!(140000));

        let mut profile = sample_profile();
        profile.hra_received = dec!(50000);
        assert_eq!(hra_exemption(&profile), dec!(50000));

        profile.hra_received = dec!(500000);
        profile.rent_paid = dec!(900000);
        assert_eq!(hra_exemption(&profile), dec!(160000));
    }

    #[test]
    fn test_hra_exemption_zero_when_rent_below_tenth_of_basic() {
        let mut profile = sample_profile();
        profile.rent_paid = dec!(30000);
        assert_eq!(hra_exemption(&profile), Decimal::ZERO);
    }

    #[test]
    fn test_legacy_breakdown_for_sample() {
        let breakdown = compute_legacy_breakdown(&sample_profile());
        assert_eq!(breakdown.regime, Regime::Old);
        assert_eq!(breakdown.total_deductions, dec!(367400));
        assert_eq!(breakdown.taxable_income, dec!(432600));
        assert_eq!(breakdown.slab_tax, dec!(9130));
        assert_eq!(breakdown.cess, dec!(365.2));
        assert_eq!(breakdown.total_tax, dec!(9495.2));
    }

    #[test]
    fn test_new_breakdown_for_sample() {
        let breakdown = compute_new_breakdown(&sample_profile());
        assert_eq!(breakdown.hra_exemption, Decimal::ZERO);
        assert_eq!(breakdown.taxable_income, dec!(750000));
        assert_eq!(breakdown.slab_tax, dec!(30000));
        assert_eq!(breakdown.total_tax, dec!(31200));
    }

    #[test]
    fn test_deductions_above_gross_floor_taxable_at_zero() {
        let profile = FinancialProfile {
            gross_salary: dec!(40000),
            ..FinancialProfile::default()
        };
        assert_eq!(compute_legacy_breakdown(&profile).taxable_income, Decimal::ZERO);
        assert_eq!(compute_new_regime(&profile), Decimal::ZERO);
    }

    #[test]
    fn test_total_is_rounded_to_two_places() {
        // 300001 - 50000 above 250k by 1 => 0.05 * 1.04 = 0.052
        let profile = FinancialProfile {
            gross_salary: dec!(300001),
            ..FinancialProfile::default()
        };
        let breakdown = compute_legacy_breakdown(&profile);
        assert_eq!(breakdown.slab_tax, dec!(0.05));
        assert_eq!(breakdown.total_tax, dec!(0.05));
    }

    #[test]
    fn test_round_currency_ties_to_even() {
        assert_eq!(round_currency(dec!(0.125)), dec!(0.12));
        assert_eq!(round_currency(dec!(0.135)), dec!(0.14));
        assert_eq!(round_currency(dec!(10.001)), dec!(10.00));
    }
}
