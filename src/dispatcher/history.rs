use anyhow::{anyhow, Result};

use crate::cli::formatters::{
    format_comparison, format_conversation, format_history, format_profile_table, to_json,
};
use salary_tax::advisor::ConversationLog;
use salary_tax::config::AppConfig;
use salary_tax::db;

pub fn dispatch_history(limit: usize, json_output: bool, config: &AppConfig) -> Result<()> {
    db::init_database(config.db_path.clone())?;
    let conn = db::open_db(config.db_path.clone())?;
    let submissions = db::list_submissions(&conn, limit)?;

    if json_output {
        println!("{}", to_json(&submissions));
    } else {
        println!("{}", format_history(&submissions));
    }
    Ok(())
}

pub fn dispatch_show(session_id: &str, json_output: bool, config: &AppConfig) -> Result<()> {
    db::init_database(config.db_path.clone())?;
    let conn = db::open_db(config.db_path.clone())?;
    let stored = db::load_submission(&conn, session_id)?
        .ok_or_else(|| anyhow!("No saved comparison for session {}", session_id))?;

    if json_output {
        println!("{}", to_json(&stored));
    } else {
        println!(
            "\nSession {} ({} input, saved {})\n",
            stored.session_id,
            stored.salary_period,
            stored.created_at.format("%d/%m/%Y %H:%M")
        );
        println!("{}", format_profile_table(&stored.profile));
        print!(
            "{}",
            format_comparison(&stored.comparison, stored.selected_regime, None)
        );
    }
    Ok(())
}

pub fn dispatch_conversation(json_output: bool, config: &AppConfig) -> Result<()> {
    let entries = ConversationLog::new(config.conversation_log.clone()).load();

    if json_output {
        println!("{}", to_json(&entries));
    } else {
        print!("{}", format_conversation(&entries));
    }
    Ok(())
}
