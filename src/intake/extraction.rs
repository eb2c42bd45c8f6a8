use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::SELECTED_REGIME_KEY;
use crate::profile::ProfileField;

/// Instruction sent along with the salary slip text
pub fn extraction_prompt(slip_text: &str) -> String {
    let keys: Vec<&str> = ProfileField::ALL.iter().map(|f| f.key()).collect();
    format!(
        "Extract the following fields from this salary slip text. \
         Return ONLY a plain JSON object with these keys: {keys}. \
         If a value is not present, use an empty string. \
         Do NOT include any code block markers, preamble, or explanation.\n\
         Example: {{\"gross_salary\": \"100000\", \"basic_salary\": \"50000\", ...}}\n\n\
         Salary slip text:\n{slip_text}\n",
        keys = keys.join(", "),
    )
}

/// Remove a surrounding markdown code block, if any
pub fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest.trim();
    }
    if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest.trim();
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest.trim();
    }
    cleaned
}

/// Parse the model's reply into raw profile fields.
///
/// Returns `None` unless the reply is a JSON object once code fences are
/// removed. Values are left as-is; coercion happens when the profile is built.
pub fn parse_extraction_reply(reply: &str) -> Option<HashMap<String, Value>> {
    let cleaned = strip_code_fences(reply);
    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(map)) => {
            debug!("Parsed extraction reply with {} keys", map.len());
            Some(map.into_iter().collect())
        }
        Ok(other) => {
            warn!("Extraction reply was JSON but not an object: {}", other);
            None
        }
        Err(e) => {
            warn!("Could not parse extraction reply as JSON: {}", e);
            None
        }
    }
}

/// Empty form used when automatic extraction fails and the user must type
/// the amounts in
pub fn blank_fields() -> HashMap<String, Value> {
    let mut fields: HashMap<String, Value> = ProfileField::ALL
        .iter()
        .map(|f| (f.key().to_string(), Value::String(String::new())))
        .collect();
    fields.insert(SELECTED_REGIME_KEY.to_string(), Value::String("new".to_string()));
    fields
}
