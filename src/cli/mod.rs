use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use salary_tax::intake::{SALARY_PERIOD_KEY, SELECTED_REGIME_KEY};
use salary_tax::profile::ProfileField;
use serde_json::Value;
use std::collections::HashMap;

pub mod formatters;

#[derive(Parser)]
#[command(name = "salary-tax")]
#[command(
    version,
    about = "Salary slip tax calculator for the old and new Indian tax regimes"
)]
#[command(
    long_about = "Turn salary slip figures into a financial profile, compare income tax under the old regime (HRA exemption, 80C/80D deductions) and the new regime (standard deduction only), and get follow-up advice from a generative-AI advisor."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare tax under the old and new regimes
    Compare(CompareArgs),

    /// Extract salary fields from salary slip text with the AI advisor
    Extract {
        /// Plain-text file with the salary slip contents
        file: PathBuf,

        /// Also run the regime comparison on the extracted fields
        #[arg(short, long)]
        compare: bool,

        /// Period of the amounts on the slip
        #[arg(short, long, value_parser = ["monthly", "annual"])]
        period: Option<String>,
    },

    /// Ask the advisor about a saved comparison
    Advise {
        /// Session id printed by `compare --save`
        #[arg(short, long)]
        session: String,

        /// Your answer to the follow-up question; prints suggestions
        #[arg(short, long)]
        answer: Option<String>,

        /// The question being answered (asked again when omitted)
        #[arg(short, long, requires = "answer")]
        question: Option<String>,
    },

    /// List saved comparisons, newest first
    History {
        /// Maximum number of entries
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Show one saved comparison
    Show {
        /// Session id
        session_id: String,
    },

    /// Show the advisor conversation log
    Conversation,
}

#[derive(Args, Debug, Default)]
pub struct CompareArgs {
    #[command(flatten)]
    pub amounts: AmountArgs,

    /// JSON file with profile fields (flags override its values)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Period of the entered amounts
    #[arg(short, long, value_parser = ["monthly", "annual"])]
    pub period: Option<String>,

    /// Regime you intend to file under (recorded only)
    #[arg(short, long, value_parser = ["old", "new"])]
    pub regime: Option<String>,

    /// Save the profile and comparison
    #[arg(long)]
    pub save: bool,

    /// Session id to save under (generated when omitted)
    #[arg(long, requires = "save")]
    pub session: Option<String>,

    /// Show how each regime arrived at its figure
    #[arg(short, long)]
    pub breakdown: bool,
}

/// Raw amounts as typed; unreadable values become the field default
#[derive(Args, Debug, Default)]
pub struct AmountArgs {
    #[arg(long)]
    pub gross_salary: Option<String>,
    #[arg(long)]
    pub basic_salary: Option<String>,
    #[arg(long)]
    pub hra_received: Option<String>,
    #[arg(long)]
    pub rent_paid: Option<String>,
    #[arg(long = "deduction-80c")]
    pub deduction_80c: Option<String>,
    #[arg(long = "deduction-80d")]
    pub deduction_80d: Option<String>,
    #[arg(long)]
    pub standard_deduction: Option<String>,
    #[arg(long)]
    pub professional_tax: Option<String>,
    #[arg(long)]
    pub tds: Option<String>,
}

impl AmountArgs {
    fn value(&self, field: ProfileField) -> Option<&String> {
        match field {
            ProfileField::GrossSalary => self.gross_salary.as_ref(),
            ProfileField::BasicSalary => self.basic_salary.as_ref(),
            ProfileField::HraReceived => self.hra_received.as_ref(),
            ProfileField::RentPaid => self.rent_paid.as_ref(),
            ProfileField::Deduction80C => self.deduction_80c.as_ref(),
            ProfileField::Deduction80D => self.deduction_80d.as_ref(),
            ProfileField::StandardDeduction => self.standard_deduction.as_ref(),
            ProfileField::ProfessionalTax => self.professional_tax.as_ref(),
            ProfileField::Tds => self.tds.as_ref(),
        }
    }

    /// Write the given flags over `fields`
    pub fn apply_to(&self, fields: &mut HashMap<String, Value>) {
        for field in ProfileField::ALL {
            if let Some(raw) = self.value(field) {
                fields.insert(field.key().to_string(), Value::String(raw.clone()));
            }
        }
    }
}

impl CompareArgs {
    /// Write the period and regime flags over `fields`
    pub fn apply_choices_to(&self, fields: &mut HashMap<String, Value>) {
        if let Some(period) = &self.period {
            fields.insert(SALARY_PERIOD_KEY.to_string(), Value::String(period.clone()));
        }
        if let Some(regime) = &self.regime {
            fields.insert(SELECTED_REGIME_KEY.to_string(), Value::String(regime.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compare_flags_parse() {
        let cli = Cli::try_parse_from([
            "salary-tax",
            "compare",
            "--gross-salary",
            "800000",
            "--deduction-80c",
            "150000",
            "--period",
            "annual",
            "--regime",
            "old",
        ])
        .unwrap();

        let Commands::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        let mut fields = HashMap::new();
        args.amounts.apply_to(&mut fields);
        args.apply_choices_to(&mut fields);

        assert_eq!(fields["gross_salary"], Value::String("800000".into()));
        assert_eq!(fields["deduction_80c"], Value::String("150000".into()));
        assert_eq!(fields[SALARY_PERIOD_KEY], Value::String("annual".into()));
        assert_eq!(fields[SELECTED_REGIME_KEY], Value::String("old".into()));
        assert!(!fields.contains_key("tds"));
    }

    #[test]
    fn test_invalid_period_is_rejected() {
        assert!(Cli::try_parse_from(["salary-tax", "compare", "--period", "weekly"]).is_err());
    }

    #[test]
    fn test_session_requires_save() {
        assert!(Cli::try_parse_from(["salary-tax", "compare", "--session", "abc"]).is_err());
    }
}
