// Database module - SQLite connection and saved comparisons

pub mod models;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::AppError;
use crate::intake::SalaryPeriod;
use crate::profile::{FinancialProfile, ProfileField};
use crate::tax::{Regime, RegimeComparisonResult};
pub use models::StoredSubmission;

/// Get the default database path (~/.salary-tax/data.db)
pub fn get_default_db_path() -> Result<PathBuf> {
    let app_dir = crate::config::app_dir()?;

    // Create directory if it doesn't exist
    std::fs::create_dir_all(&app_dir).context("Failed to create .salary-tax directory")?;

    Ok(app_dir.join("data.db"))
}

/// Open database connection
pub fn open_db(db_path: Option<PathBuf>) -> Result<Connection> {
    let path = match db_path {
        Some(path) => path,
        None => get_default_db_path()?,
    };
    let conn = Connection::open(&path).context(format!("Failed to open database at {:?}", path))?;

    // Enable foreign keys
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("Failed to enable foreign keys")?;

    Ok(conn)
}

/// Initialize the database with schema
///
/// Creates the database file if needed and runs the idempotent schema SQL.
pub fn init_database(db_path: Option<PathBuf>) -> Result<()> {
    let path = match db_path {
        Some(path) => path,
        None => get_default_db_path()?,
    };

    info!("Initializing database at: {:?}", path);

    let conn = open_db(Some(path))?;
    apply_schema(&conn)?;

    info!("Database initialized successfully");
    Ok(())
}

/// Run the schema SQL on an open connection
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(include_str!("schema.sql"))
        .context("Failed to execute schema")
}

/// Insert or replace the profile and comparison stored for a session
pub fn save_submission(
    conn: &mut Connection,
    session_id: &str,
    profile: &FinancialProfile,
    salary_period: SalaryPeriod,
    comparison: &RegimeComparisonResult,
    selected_regime: Regime,
) -> Result<()> {
    let now = Utc::now();
    let tx = conn.transaction().context("Failed to start transaction")?;

    tx.execute(
        "INSERT INTO user_financials (
            session_id, gross_salary, basic_salary, hra_received, rent_paid,
            deduction_80c, deduction_80d, standard_deduction, professional_tax, tds,
            salary_period, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        ON CONFLICT(session_id) DO UPDATE SET
            gross_salary = excluded.gross_salary,
            basic_salary = excluded.basic_salary,
            hra_received = excluded.hra_received,
            rent_paid = excluded.rent_paid,
            deduction_80c = excluded.deduction_80c,
            deduction_80d = excluded.deduction_80d,
            standard_deduction = excluded.standard_deduction,
            professional_tax = excluded.professional_tax,
            tds = excluded.tds,
            salary_period = excluded.salary_period,
            created_at = excluded.created_at",
        params![
            session_id,
            profile.gross_salary.to_string(),
            profile.basic_salary.to_string(),
            profile.hra_received.to_string(),
            profile.rent_paid.to_string(),
            profile.deduction_80c.to_string(),
            profile.deduction_80d.to_string(),
            profile.standard_deduction.to_string(),
            profile.professional_tax.to_string(),
            profile.tds.to_string(),
            salary_period.as_str(),
            now,
        ],
    )
    .context("Failed to save user financials")?;

    tx.execute(
        "INSERT INTO tax_comparison (
            session_id, tax_old_regime, tax_new_regime, best_regime, selected_regime, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(session_id) DO UPDATE SET
            tax_old_regime = excluded.tax_old_regime,
            tax_new_regime = excluded.tax_new_regime,
            best_regime = excluded.best_regime,
            selected_regime = excluded.selected_regime,
            created_at = excluded.created_at",
        params![
            session_id,
            comparison.tax_old_regime.to_string(),
            comparison.tax_new_regime.to_string(),
            comparison.best_regime.as_str(),
            selected_regime.as_str(),
            now,
        ],
    )
    .context("Failed to save tax comparison")?;

    tx.commit().context("Failed to commit submission")?;
    debug!("Saved submission {}", session_id);
    Ok(())
}

const SUBMISSION_SELECT: &str = "SELECT f.session_id, f.gross_salary, f.basic_salary, f.hra_received,
            f.rent_paid, f.deduction_80c, f.deduction_80d, f.standard_deduction,
            f.professional_tax, f.tds, f.salary_period,
            c.tax_old_regime, c.tax_new_regime, c.best_regime, c.selected_regime, c.created_at
     FROM user_financials f
     JOIN tax_comparison c ON c.session_id = f.session_id";

/// Load the submission saved under `session_id`
pub fn load_submission(conn: &Connection, session_id: &str) -> Result<Option<StoredSubmission>> {
    let sql = format!("{} WHERE f.session_id = ?1", SUBMISSION_SELECT);
    conn.query_row(&sql, [session_id], submission_from_row)
        .optional()
        .context(format!("Failed to load submission {}", session_id))
}

/// Most recent submissions first
pub fn list_submissions(conn: &Connection, limit: usize) -> Result<Vec<StoredSubmission>> {
    let sql = format!(
        "{} ORDER BY c.created_at DESC, f.session_id ASC LIMIT ?1",
        SUBMISSION_SELECT
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([limit as i64], submission_from_row)?;

    let mut submissions = Vec::new();
    for row in rows {
        submissions.push(row.context("Failed to read submission row")?);
    }
    Ok(submissions)
}

fn submission_from_row(row: &rusqlite::Row) -> Result<StoredSubmission, rusqlite::Error> {
    let mut profile = FinancialProfile::default();
    for (i, field) in ProfileField::ALL.iter().enumerate() {
        profile.set(*field, get_decimal_value(row, i + 1)?);
    }

    Ok(StoredSubmission {
        session_id: row.get(0)?,
        profile,
        salary_period: get_parsed_text(row, 10)?,
        comparison: RegimeComparisonResult {
            tax_old_regime: get_decimal_value(row, 11)?,
            tax_new_regime: get_decimal_value(row, 12)?,
            best_regime: get_parsed_text(row, 13)?,
        },
        selected_regime: get_parsed_text(row, 14)?,
        created_at: row.get(15)?,
    })
}

/// Helper to read Decimal from SQLite (stored as TEXT)
pub fn get_decimal_value(row: &rusqlite::Row, idx: usize) -> Result<Decimal, rusqlite::Error> {
    use rusqlite::types::ValueRef;

    match row.get_ref(idx)? {
        ValueRef::Text(bytes) => {
            let s = std::str::from_utf8(bytes)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))?;
            Decimal::from_str(s)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
        }
        ValueRef::Integer(i) => Ok(Decimal::from(i)),
        ValueRef::Real(f) => Decimal::try_from(f)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Real, Box::new(e))),
        _ => Err(rusqlite::Error::InvalidColumnType(
            idx,
            "decimal".to_string(),
            Type::Null,
        )),
    }
}

/// Read a TEXT column through the type's `FromStr`
fn get_parsed_text<T: FromStr>(row: &rusqlite::Row, idx: usize) -> Result<T, rusqlite::Error> {
    let text: String = row.get(idx)?;
    text.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(AppError::Database(format!("unexpected value {:?}", text))),
        )
    })
}
