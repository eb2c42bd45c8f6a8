//! Turning user-facing input into engine input
//!
//! Salary slips are usually monthly while the tax engine only understands
//! annual amounts. This module owns that conversion together with the
//! informational `selected_regime` the user picks on the review form.

pub mod extraction;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::profile::{FinancialProfile, ProfileField};
use crate::tax::Regime;

pub const SELECTED_REGIME_KEY: &str = "selected_regime";
pub const SALARY_PERIOD_KEY: &str = "salary_period";

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// How often the submitted amounts recur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryPeriod {
    #[default]
    Monthly,
    Annual,
}

impl SalaryPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalaryPeriod::Monthly => "monthly",
            SalaryPeriod::Annual => "annual",
        }
    }
}

impl fmt::Display for SalaryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SalaryPeriod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" | "m" => Ok(SalaryPeriod::Monthly),
            "annual" | "annually" | "yearly" | "year" | "y" => Ok(SalaryPeriod::Annual),
            _ => Err(()),
        }
    }
}

/// A reviewed salary submission, before annualization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSubmission {
    /// Amounts as entered, in `period` units
    pub profile: FinancialProfile,
    /// Regime the user intends to file under; not used in computation
    pub selected_regime: Regime,
    pub period: SalaryPeriod,
}

impl ProfileSubmission {
    /// Read a submission from form-style key/value input.
    ///
    /// Unknown or unreadable `selected_regime` and `salary_period` values fall
    /// back to `new` and `monthly`.
    pub fn from_form(fields: &HashMap<String, Value>) -> Self {
        let selected_regime = fields
            .get(SELECTED_REGIME_KEY)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        let period = fields
            .get(SALARY_PERIOD_KEY)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Self {
            profile: FinancialProfile::from_fields(fields),
            selected_regime,
            period,
        }
    }

    /// Profile in annual amounts, ready for the tax engine.
    ///
    /// Monthly submissions have every amount multiplied by twelve except the
    /// standard deduction, which is always an annual figure.
    pub fn annualized_profile(&self) -> FinancialProfile {
        match self.period {
            SalaryPeriod::Annual => self.profile.clone(),
            SalaryPeriod::Monthly => {
                let mut annual = self.profile.clone();
                for field in ProfileField::ALL {
                    if field == ProfileField::StandardDeduction {
                        continue;
                    }
                    annual.set(field, self.profile.get(field).saturating_mul(MONTHS_PER_YEAR));
                }
                annual
            }
        }
    }
}
