//! Command dispatcher that routes parsed clap commands to their handlers.

mod advise;
mod compare;
mod history;

use anyhow::Result;
use tracing::debug;

use crate::cli::Commands;
use salary_tax::config::AppConfig;

/// Route a parsed command to its handler
pub async fn dispatch_command(command: Commands, json_output: bool) -> Result<()> {
    match command {
        Commands::Compare(args) => compare::dispatch_compare(args, json_output),
        Commands::Extract {
            file,
            compare,
            period,
        } => {
            let config = load_config()?;
            compare::dispatch_extract(&file, compare, period, json_output, &config).await
        }
        Commands::Advise {
            session,
            answer,
            question,
        } => {
            let config = load_config()?;
            advise::dispatch_advise(&session, answer, question, json_output, &config).await
        }
        Commands::History { limit } => {
            history::dispatch_history(limit, json_output, &load_config()?)
        }
        Commands::Show { session_id } => {
            history::dispatch_show(&session_id, json_output, &load_config()?)
        }
        Commands::Conversation => history::dispatch_conversation(json_output, &load_config()?),
    }
}

/// Config is only read by commands that touch the store or the advisor
pub(crate) fn load_config() -> Result<AppConfig> {
    let config = AppConfig::load()?;
    debug!("Loaded config: model={}, db={:?}", config.gemini_model, config.db_path);
    Ok(config)
}
