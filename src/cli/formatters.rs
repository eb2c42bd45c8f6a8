//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of tax calculation from presentation.

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use salary_tax::advisor::ConversationEntry;
use salary_tax::db::StoredSubmission;
use salary_tax::intake::SalaryPeriod;
use salary_tax::profile::FinancialProfile;
use salary_tax::tax::{DetailedComparison, Regime, RegimeBreakdown, RegimeComparisonResult};
use salary_tax::utils::{format_amount, format_currency, format_rate};

/// Everything `compare --json` prints
#[derive(Serialize)]
pub struct ComparisonReport<'a> {
    pub session_id: Option<&'a str>,
    pub selected_regime: Regime,
    pub salary_period: SalaryPeriod,
    pub profile: &'a FinancialProfile,
    pub comparison: &'a RegimeComparisonResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BreakdownReport<'a>>,
}

#[derive(Serialize)]
pub struct BreakdownReport<'a> {
    pub old: &'a RegimeBreakdown,
    pub new: &'a RegimeBreakdown,
}

impl<'a> BreakdownReport<'a> {
    pub fn from_detailed(detailed: &'a DetailedComparison) -> Self {
        Self {
            old: &detailed.old,
            new: &detailed.new,
        }
    }
}

/// Serialize any report for JSON output
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Annual profile as a two-column table
pub fn format_profile_table(profile: &FinancialProfile) -> String {
    #[derive(Tabled)]
    struct FieldRow {
        #[tabled(rename = "Field")]
        field: String,
        #[tabled(rename = "Annual amount")]
        amount: String,
    }

    let rows: Vec<FieldRow> = profile
        .entries()
        .into_iter()
        .map(|(field, amount)| FieldRow {
            field: field.label().to_string(),
            amount: format_amount(amount),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.modify(Columns::new(1..), Alignment::right());
    table.to_string()
}

/// Side-by-side regime totals with the recommendation
pub fn format_comparison(
    comparison: &RegimeComparisonResult,
    selected_regime: Regime,
    session_id: Option<&str>,
) -> String {
    #[derive(Tabled)]
    struct RegimeRow {
        #[tabled(rename = "Regime")]
        regime: String,
        #[tabled(rename = "Tax payable")]
        tax: String,
        #[tabled(rename = "Note")]
        marker: String,
    }

    let rows: Vec<RegimeRow> = [Regime::Old, Regime::New]
        .into_iter()
        .map(|regime| {
            let mut marker = Vec::new();
            if regime == comparison.best_regime {
                marker.push("best".green().bold().to_string());
            }
            if regime == selected_regime {
                marker.push("selected".cyan().to_string());
            }
            RegimeRow {
                regime: regime.label().to_string(),
                tax: format_currency(comparison.tax_for(regime)),
                marker: marker.join(", "),
            }
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.modify(Columns::new(1..2), Alignment::right());

    let mut output = format!("\n{} Tax regime comparison\n\n", "📊".cyan().bold());
    output.push_str(&table.to_string());
    output.push('\n');

    let best = comparison.best_regime;
    if comparison.savings() > Decimal::ZERO {
        output.push_str(&format!(
            "\n{} {} saves {}\n",
            "✓".green().bold(),
            best.label().bold(),
            format_currency(comparison.savings()).green()
        ));
    } else {
        output.push_str(&format!(
            "\n{} Both regimes cost the same; {} recommended\n",
            "ℹ".blue().bold(),
            best.label().bold()
        ));
    }

    if selected_regime != best {
        output.push_str(&format!(
            "{} You selected the {} but the {} is cheaper\n",
            "!".yellow().bold(),
            selected_regime.label().to_lowercase(),
            best.label().to_lowercase()
        ));
    }

    if let Some(id) = session_id {
        output.push_str(&format!("\nSaved as session {}\n", id.bold()));
    }

    output
}

/// Deductions and slab-by-slab working for one regime
pub fn format_breakdown(breakdown: &RegimeBreakdown) -> String {
    #[derive(Tabled)]
    struct SliceRow {
        #[tabled(rename = "Slab")]
        range: String,
        #[tabled(rename = "Rate")]
        rate: String,
        #[tabled(rename = "Taxed")]
        taxed: String,
        #[tabled(rename = "Tax")]
        tax: String,
    }

    let rows: Vec<SliceRow> = breakdown
        .slices
        .iter()
        .map(|slice| SliceRow {
            range: match slice.upper {
                Some(upper) => format!("{} - {}", format_amount(slice.lower), format_amount(upper)),
                None => format!("above {}", format_amount(slice.lower)),
            },
            rate: format_rate(slice.rate),
            taxed: format_amount(slice.taxed_amount),
            tax: format_amount(slice.tax),
        })
        .collect();

    let mut output = format!("\n{}\n", breakdown.regime.label().bold());
    if breakdown.regime == Regime::Old {
        output.push_str(&format!(
            "{:<20} {}\n",
            "HRA exemption:",
            format_currency(breakdown.hra_exemption)
        ));
    }
    output.push_str(&format!(
        "{:<20} {}\n",
        "Total deductions:",
        format_currency(breakdown.total_deductions)
    ));
    output.push_str(&format!(
        "{:<20} {}\n",
        "Taxable income:",
        format_currency(breakdown.taxable_income)
    ));

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());
    output.push_str(&table.to_string());

    output.push_str(&format!(
        "\n{:<20} {}\n{:<20} {}\n{:<20} {}\n",
        "Slab tax:",
        format_currency(breakdown.slab_tax),
        "Cess (4%):",
        format_currency(breakdown.cess),
        "Total:".bold(),
        format_currency(breakdown.total_tax).bold()
    ));

    output
}

/// Saved comparisons as a table
pub fn format_history(submissions: &[StoredSubmission]) -> String {
    if submissions.is_empty() {
        return format_empty_history();
    }

    #[derive(Tabled)]
    struct HistoryRow {
        #[tabled(rename = "Session")]
        session: String,
        #[tabled(rename = "Saved")]
        saved: String,
        #[tabled(rename = "Gross salary")]
        gross: String,
        #[tabled(rename = "Old regime")]
        old: String,
        #[tabled(rename = "New regime")]
        new: String,
        #[tabled(rename = "Best")]
        best: String,
        #[tabled(rename = "Selected")]
        selected: String,
    }

    let rows: Vec<HistoryRow> = submissions
        .iter()
        .map(|s| HistoryRow {
            session: s.session_id.clone(),
            saved: s.created_at.format("%d/%m/%Y %H:%M").to_string(),
            gross: format_amount(s.profile.gross_salary),
            old: format_amount(s.comparison.tax_old_regime),
            new: format_amount(s.comparison.tax_new_regime),
            best: s.comparison.best_regime.to_string(),
            selected: s.selected_regime.to_string(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(2..5), Alignment::right());
    table.to_string()
}

pub fn format_empty_history() -> String {
    format!(
        "{} No saved comparisons\nSave one with: {} compare --save ...\n",
        "ℹ".blue().bold(),
        "salary-tax".bold()
    )
}

/// Conversation log, oldest first
pub fn format_conversation(entries: &[ConversationEntry]) -> String {
    if entries.is_empty() {
        return format!("{} No advisor conversations yet\n", "ℹ".blue().bold());
    }

    let mut output = String::new();
    for (i, entry) in entries.iter().enumerate() {
        output.push_str(&format!(
            "\n{} {}\n{} {}\n{}\n{}\n",
            format!("#{} Q:", i + 1).cyan().bold(),
            entry.question,
            "A:".bold(),
            entry.user_answer,
            "Suggestions:".bold(),
            entry.suggestions
        ));
    }
    output
}
