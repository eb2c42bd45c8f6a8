use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One question/answer/suggestions exchange with the advisor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub question: String,
    pub user_answer: String,
    pub suggestions: String,
}

/// Append-only JSON log of advisor exchanges
#[derive(Debug, Clone)]
pub struct ConversationLog {
    path: PathBuf,
}

impl ConversationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries; a missing or unreadable log is treated as empty
    pub fn load(&self) -> Vec<ConversationEntry> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                debug!("No conversation log at {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("Ignoring corrupt conversation log {:?}: {}", self.path, e);
            Vec::new()
        })
    }

    /// Add an entry and rewrite the file
    pub fn append(&self, entry: ConversationEntry) -> Result<()> {
        let mut entries = self.load();
        entries.push(entry);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(&entries)
            .context("Failed to serialize conversation log")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write conversation log {:?}", self.path))?;
        Ok(())
    }
}
