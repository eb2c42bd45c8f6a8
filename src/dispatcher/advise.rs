use anyhow::{anyhow, Result};
use colored::Colorize;
use serde_json::json;
use tracing::info;

use crate::cli::formatters::to_json;
use salary_tax::advisor::{Advisor, AdvisorContext, ConversationEntry, ConversationLog};
use salary_tax::config::AppConfig;
use salary_tax::db;

pub async fn dispatch_advise(
    session_id: &str,
    answer: Option<String>,
    question: Option<String>,
    json_output: bool,
    config: &AppConfig,
) -> Result<()> {
    db::init_database(config.db_path.clone())?;
    let conn = db::open_db(config.db_path.clone())?;
    let stored = db::load_submission(&conn, session_id)?.ok_or_else(|| {
        anyhow!(
            "No saved comparison for session {}. Run `salary-tax compare --save` first.",
            session_id
        )
    })?;

    let advisor = Advisor::from_config(config)?;
    let context = AdvisorContext {
        profile: &stored.profile,
        comparison: &stored.comparison,
        selected_regime: stored.selected_regime,
    };

    let Some(answer) = answer else {
        let question = advisor.followup_question(&context).await;
        if json_output {
            println!(
                "{}",
                to_json(&json!({ "session_id": session_id, "question": question }))
            );
        } else {
            println!("\n{} {}\n", "?".cyan().bold(), question);
            println!(
                "Answer with: {} advise --session {} --answer \"...\"",
                "salary-tax".bold(),
                session_id
            );
        }
        return Ok(());
    };

    let question = match question {
        Some(q) => q,
        None => advisor.followup_question(&context).await,
    };
    let suggestions = advisor.suggestions(&context, &answer).await;

    let log = ConversationLog::new(config.conversation_log.clone());
    let entry = ConversationEntry {
        question,
        user_answer: answer,
        suggestions,
    };
    log.append(entry.clone())?;
    info!("Appended advisor exchange to {:?}", log.path());

    if json_output {
        println!("{}", to_json(&entry));
    } else {
        println!("\n{} {}", "Q:".cyan().bold(), entry.question);
        println!("{} {}\n", "A:".bold(), entry.user_answer);
        println!("{}\n{}\n", "Suggestions:".green().bold(), entry.suggestions);
    }

    Ok(())
}
