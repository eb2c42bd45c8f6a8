use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::regimes::{compute_legacy_breakdown, compute_new_breakdown, RegimeBreakdown};
use crate::profile::FinancialProfile;

/// Statutory regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Legacy regime with itemized deductions and exemptions
    Old,
    /// Simplified regime with only the standard deduction
    #[default]
    New,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Old => "old",
            Regime::New => "new",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Regime::Old => "Old regime",
            Regime::New => "New regime",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Regime {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "old" | "legacy" => Ok(Regime::Old),
            "new" | "simplified" => Ok(Regime::New),
            _ => Err(()),
        }
    }
}

/// Tax under both regimes and the cheaper one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparisonResult {
    pub tax_old_regime: Decimal,
    pub tax_new_regime: Decimal,
    pub best_regime: Regime,
}

impl RegimeComparisonResult {
    /// Build from two computed amounts. Equal amounts favour the new regime.
    pub fn from_amounts(tax_old_regime: Decimal, tax_new_regime: Decimal) -> Self {
        let best_regime = if tax_old_regime < tax_new_regime {
            Regime::Old
        } else {
            Regime::New
        };

        Self {
            tax_old_regime,
            tax_new_regime,
            best_regime,
        }
    }

    pub fn tax_for(&self, regime: Regime) -> Decimal {
        match regime {
            Regime::Old => self.tax_old_regime,
            Regime::New => self.tax_new_regime,
        }
    }

    /// Amount saved by choosing the best regime over the other one
    pub fn savings(&self) -> Decimal {
        (self.tax_old_regime - self.tax_new_regime).abs()
    }
}

/// Comparison plus the per-regime working
#[derive(Debug, Clone, Serialize)]
pub struct DetailedComparison {
    pub result: RegimeComparisonResult,
    pub old: RegimeBreakdown,
    pub new: RegimeBreakdown,
}

/// Compute both regimes and pick the cheaper one
pub fn compare(profile: &FinancialProfile) -> RegimeComparisonResult {
    compare_detailed(profile).result
}

pub fn compare_detailed(profile: &FinancialProfile) -> DetailedComparison {
    let old = compute_legacy_breakdown(profile);
    let new = compute_new_breakdown(profile);
    let result = RegimeComparisonResult::from_amounts(old.total_tax, new.total_tax);

    DetailedComparison { result, old, new }
}
