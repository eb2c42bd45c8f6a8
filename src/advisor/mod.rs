//! Generative-AI advisor
//!
//! Wraps a Gemini-style `generateContent` endpoint for three jobs: pulling
//! salary fields out of slip text, asking a follow-up question, and turning
//! the user's answer into suggestions. Advice never fails outright: any error
//! degrades to a fixed fallback text. No retries are attempted.

pub mod conversation;

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::intake::extraction::{extraction_prompt, parse_extraction_reply};
use crate::profile::FinancialProfile;
use crate::tax::{Regime, RegimeComparisonResult};

pub use conversation::{ConversationEntry, ConversationLog};

pub const FALLBACK_QUESTION: &str = "What are your main financial goals for this year?";
pub const FALLBACK_SUGGESTIONS: &str = "Could not generate suggestions.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: String,
}

/// Low-level client for the generateContent endpoint
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("salary-tax/0.1")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self) -> Result<Url> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        Url::parse_with_params(&url, &[("key", self.api_key.as_str())])
            .with_context(|| format!("Invalid Gemini URL {}", url))
    }

    /// Send a prompt and return the first candidate's text.
    ///
    /// `Ok(None)` means the service answered without any candidate.
    pub async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(self.endpoint()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Advisor(format!("request failed: {}", e)))?;

        let status = response.status();
        debug!("Gemini API status: {}", status);
        if !status.is_success() {
            return Err(AppError::Advisor(format!("service returned {}", status)).into());
        }

        let data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Advisor(format!("unreadable response: {}", e)))?;

        let text = data
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string());

        if text.is_none() {
            debug!("No candidates in Gemini response");
        }
        Ok(text)
    }
}

/// What the advisor knows about the user
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorContext<'a> {
    pub profile: &'a FinancialProfile,
    pub comparison: &'a RegimeComparisonResult,
    pub selected_regime: Regime,
}

impl AdvisorContext<'_> {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Prompting and fallbacks on top of [`GeminiClient`]
#[derive(Debug, Clone)]
pub struct Advisor {
    client: Option<GeminiClient>,
}

impl Advisor {
    /// Build from config; without an API key every call uses its fallback
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = match config.gemini_api_key.as_deref() {
            Some(key) => Some(GeminiClient::new(
                key,
                &config.gemini_model,
                &config.gemini_base_url,
            )?),
            None => {
                info!("No Gemini API key configured, advisor runs in offline mode");
                None
            }
        };
        Ok(Self { client })
    }

    pub fn with_client(client: GeminiClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn offline() -> Self {
        Self { client: None }
    }

    pub fn is_online(&self) -> bool {
        self.client.is_some()
    }

    /// Ask the model to read salary fields out of slip text.
    ///
    /// `Ok(None)` when the model answered with something that is not a JSON
    /// object; the caller should fall back to manual entry.
    pub async fn extract_fields(&self, slip_text: &str) -> Result<Option<HashMap<String, Value>>> {
        let client = self.client.as_ref().ok_or(AppError::MissingApiKey)?;
        let reply = client
            .generate(&extraction_prompt(slip_text))
            .await
            .context("Field extraction failed")?;

        Ok(reply.as_deref().and_then(parse_extraction_reply))
    }

    /// One contextual question that helps tailor the advice
    pub async fn followup_question(&self, context: &AdvisorContext<'_>) -> String {
        let prompt = format!(
            "Given the following user tax and salary data, generate a single, smart, contextual \
             follow-up question that will help you give better investment or tax-saving advice.\n\
             User data (JSON):\n{}\n\
             Return ONLY the question, no preamble.",
            context.to_json()
        );
        self.generate_or(&prompt, FALLBACK_QUESTION).await
    }

    /// Personalised suggestions given the user's answer to the follow-up
    pub async fn suggestions(&self, context: &AdvisorContext<'_>, user_answer: &str) -> String {
        let prompt = format!(
            "Given the following user tax and salary data, and their answer to your follow-up \
             question, provide personalized, actionable investment and tax-saving suggestions. \
             Format your response as a short, readable list or card.\n\
             User data (JSON):\n{}\n\
             User answer: {}\n\
             Suggestions:",
            context.to_json(),
            user_answer
        );
        self.generate_or(&prompt, FALLBACK_SUGGESTIONS).await
    }

    async fn generate_or(&self, prompt: &str, fallback: &str) -> String {
        let Some(client) = self.client.as_ref() else {
            return fallback.to_string();
        };

        match client.generate(prompt).await {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => fallback.to_string(),
            Err(e) => {
                warn!("Advisor request failed: {:#}", e);
                fallback.to_string()
            }
        }
    }
}

/// Convenience for callers holding an `anyhow::Error` from [`Advisor::extract_fields`]
pub fn is_missing_api_key(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<AppError>(), Some(AppError::MissingApiKey))
}
