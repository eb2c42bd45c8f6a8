//! Financial profile extracted from a salary slip
//!
//! A profile holds the nine annual amounts the tax engine reads. Raw input
//! (form fields, AI extraction replies, JSON files) never fails to become a
//! profile: anything that is missing or unreadable falls back to the field's
//! default.

pub mod coerce;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub use coerce::{amount_from_value, parse_amount};

/// Default standard deduction applied when the slip does not state one
pub const DEFAULT_STANDARD_DEDUCTION: Decimal = Decimal::from_parts(50_000, 0, 0, false, 0);

/// The named amounts of a financial profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    GrossSalary,
    BasicSalary,
    HraReceived,
    RentPaid,
    Deduction80C,
    Deduction80D,
    StandardDeduction,
    ProfessionalTax,
    Tds,
}

impl ProfileField {
    pub const ALL: [ProfileField; 9] = [
        ProfileField::GrossSalary,
        ProfileField::BasicSalary,
        ProfileField::HraReceived,
        ProfileField::RentPaid,
        ProfileField::Deduction80C,
        ProfileField::Deduction80D,
        ProfileField::StandardDeduction,
        ProfileField::ProfessionalTax,
        ProfileField::Tds,
    ];

    /// Key used in forms, JSON files and AI replies
    pub fn key(&self) -> &'static str {
        match self {
            ProfileField::GrossSalary => "gross_salary",
            ProfileField::BasicSalary => "basic_salary",
            ProfileField::HraReceived => "hra_received",
            ProfileField::RentPaid => "rent_paid",
            ProfileField::Deduction80C => "deduction_80c",
            ProfileField::Deduction80D => "deduction_80d",
            ProfileField::StandardDeduction => "standard_deduction",
            ProfileField::ProfessionalTax => "professional_tax",
            ProfileField::Tds => "tds",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::GrossSalary => "Gross salary",
            ProfileField::BasicSalary => "Basic salary",
            ProfileField::HraReceived => "HRA received",
            ProfileField::RentPaid => "Rent paid",
            ProfileField::Deduction80C => "Deduction 80C",
            ProfileField::Deduction80D => "Deduction 80D",
            ProfileField::StandardDeduction => "Standard deduction",
            ProfileField::ProfessionalTax => "Professional tax",
            ProfileField::Tds => "TDS",
        }
    }

    /// Value used when the field is absent, empty or unreadable
    pub fn default_amount(&self) -> Decimal {
        match self {
            ProfileField::StandardDeduction => DEFAULT_STANDARD_DEDUCTION,
            _ => Decimal::ZERO,
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProfileField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        ProfileField::ALL
            .iter()
            .copied()
            .find(|field| field.key() == key)
            .ok_or(())
    }
}

/// Annualized salary and deduction amounts for one person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub gross_salary: Decimal,
    pub basic_salary: Decimal,
    pub hra_received: Decimal,
    pub rent_paid: Decimal,
    pub deduction_80c: Decimal,
    pub deduction_80d: Decimal,
    pub standard_deduction: Decimal,
    pub professional_tax: Decimal,
    pub tds: Decimal,
}

impl Default for FinancialProfile {
    fn default() -> Self {
        Self {
            gross_salary: Decimal::ZERO,
            basic_salary: Decimal::ZERO,
            hra_received: Decimal::ZERO,
            rent_paid: Decimal::ZERO,
            deduction_80c: Decimal::ZERO,
            deduction_80d: Decimal::ZERO,
            standard_deduction: DEFAULT_STANDARD_DEDUCTION,
            professional_tax: Decimal::ZERO,
            tds: Decimal::ZERO,
        }
    }
}

impl FinancialProfile {
    /// Build a profile from loosely typed input.
    ///
    /// Strings, numbers and nulls are accepted for every field. Values that
    /// cannot be read as a non-negative amount are replaced by the field's
    /// default; unknown keys are ignored.
    pub fn from_fields(fields: &HashMap<String, Value>) -> Self {
        let mut profile = Self::default();
        for field in ProfileField::ALL {
            let amount = fields
                .get(field.key())
                .and_then(amount_from_value)
                .unwrap_or_else(|| field.default_amount());
            profile.set(field, amount);
        }
        profile
    }

    pub fn get(&self, field: ProfileField) -> Decimal {
        match field {
            ProfileField::GrossSalary => self.gross_salary,
            ProfileField::BasicSalary => self.basic_salary,
            ProfileField::HraReceived => self.hra_received,
            ProfileField::RentPaid => self.rent_paid,
            ProfileField::Deduction80C => self.deduction_80c,
            ProfileField::Deduction80D => self.deduction_80d,
            ProfileField::StandardDeduction => self.standard_deduction,
            ProfileField::ProfessionalTax => self.professional_tax,
            ProfileField::Tds => self.tds,
        }
    }

    pub fn set(&mut self, field: ProfileField, value: Decimal) {
        let slot = match field {
            ProfileField::GrossSalary => &mut self.gross_salary,
            ProfileField::BasicSalary => &mut self.basic_salary,
            ProfileField::HraReceived => &mut self.hra_received,
            ProfileField::RentPaid => &mut self.rent_paid,
            ProfileField::Deduction80C => &mut self.deduction_80c,
            ProfileField::Deduction80D => &mut self.deduction_80d,
            ProfileField::StandardDeduction => &mut self.standard_deduction,
            ProfileField::ProfessionalTax => &mut self.professional_tax,
            ProfileField::Tds => &mut self.tds,
        };
        *slot = value;
    }

    /// Field/amount pairs in display order
    pub fn entries(&self) -> Vec<(ProfileField, Decimal)> {
        ProfileField::ALL
            .iter()
            .map(|field| (*field, self.get(*field)))
            .collect()
    }
}
