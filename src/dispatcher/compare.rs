use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cli::formatters::{
    format_breakdown, format_comparison, format_profile_table, to_json, BreakdownReport,
    ComparisonReport,
};
use crate::cli::CompareArgs;
use crate::dispatcher::load_config;
use salary_tax::advisor::{is_missing_api_key, Advisor};
use salary_tax::config::AppConfig;
use salary_tax::db;
use salary_tax::intake::extraction::blank_fields;
use salary_tax::intake::{ProfileSubmission, SALARY_PERIOD_KEY};
use salary_tax::tax;

const MANUAL_ENTRY_NOTICE: &str =
    "Could not extract data from your salary slip automatically. Please fill in the fields manually.";

pub fn dispatch_compare(args: CompareArgs, json_output: bool) -> Result<()> {
    let mut fields = match &args.input {
        Some(path) => read_fields_file(path)?,
        None => HashMap::new(),
    };
    args.amounts.apply_to(&mut fields);
    args.apply_choices_to(&mut fields);

    let submission = ProfileSubmission::from_form(&fields);
    let session_id = if args.save {
        Some(args.session.clone().unwrap_or_else(|| Uuid::new_v4().to_string()))
    } else {
        None
    };

    let config = match &session_id {
        Some(_) => Some(load_config()?),
        None => None,
    };

    run_comparison(
        &submission,
        session_id.as_deref(),
        args.breakdown,
        json_output,
        config.as_ref(),
    )
}

/// Annualize, compare, print and optionally save.
///
/// `config` is required whenever `session_id` is set.
fn run_comparison(
    submission: &ProfileSubmission,
    session_id: Option<&str>,
    show_breakdown: bool,
    json_output: bool,
    config: Option<&AppConfig>,
) -> Result<()> {
    let profile = submission.annualized_profile();
    let detailed = tax::compare_detailed(&profile);
    info!(
        "Compared regimes: old={} new={} best={}",
        detailed.result.tax_old_regime, detailed.result.tax_new_regime, detailed.result.best_regime
    );

    if let Some(id) = session_id {
        let config = config.context("Saving a comparison needs the app config")?;
        db::init_database(config.db_path.clone())?;
        let mut conn = db::open_db(config.db_path.clone())?;
        db::save_submission(
            &mut conn,
            id,
            &profile,
            submission.period,
            &detailed.result,
            submission.selected_regime,
        )
        .with_context(|| format!("Failed to save session {}", id))?;
    }

    if json_output {
        let report = ComparisonReport {
            session_id,
            selected_regime: submission.selected_regime,
            salary_period: submission.period,
            profile: &profile,
            comparison: &detailed.result,
            breakdown: show_breakdown.then(|| BreakdownReport::from_detailed(&detailed)),
        };
        println!("{}", to_json(&report));
        return Ok(());
    }

    println!("\n{}", format_profile_table(&profile));
    print!(
        "{}",
        format_comparison(&detailed.result, submission.selected_regime, session_id)
    );

    if show_breakdown {
        print!("{}", format_breakdown(&detailed.old));
        print!("{}", format_breakdown(&detailed.new));
    }

    Ok(())
}

pub async fn dispatch_extract(
    file: &Path,
    then_compare: bool,
    period: Option<String>,
    json_output: bool,
    config: &AppConfig,
) -> Result<()> {
    let slip_text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read salary slip text {:?}", file))?;
    info!("Extracting salary fields from {:?}", file);

    let advisor = Advisor::from_config(config)?;
    let (mut fields, extracted) = match advisor.extract_fields(&slip_text).await {
        Ok(Some(fields)) => (fields, true),
        Ok(None) => (manual_entry_fallback(), false),
        Err(e) if is_missing_api_key(&e) => return Err(e),
        Err(e) => {
            warn!("Extraction failed: {:#}", e);
            (manual_entry_fallback(), false)
        }
    };

    if let Some(period) = period {
        fields.insert(SALARY_PERIOD_KEY.to_string(), Value::String(period));
    }

    if then_compare {
        let submission = ProfileSubmission::from_form(&fields);
        return run_comparison(&submission, None, false, json_output, None);
    }

    if json_output {
        println!(
            "{}",
            to_json(&json!({ "extracted": extracted, "fields": fields }))
        );
    } else {
        let submission = ProfileSubmission::from_form(&fields);
        println!(
            "\n{} Extracted fields ({} amounts, shown annualized)\n",
            "✓".green().bold(),
            submission.period
        );
        println!("{}", format_profile_table(&submission.annualized_profile()));
    }

    Ok(())
}

/// Notice goes to stderr so `--json` stdout stays parseable
fn manual_entry_fallback() -> HashMap<String, Value> {
    eprintln!("{} {}", "!".yellow().bold(), MANUAL_ENTRY_NOTICE);
    blank_fields()
}

/// Read profile fields from a JSON object file
fn read_fields_file(path: &Path) -> Result<HashMap<String, Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {:?}", path))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Input file {:?} is not valid JSON", path))?;

    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => bail!("Input file {:?} must contain a JSON object", path),
    }
}
