//! Normalizes raw model output into exactly three labeled reply options.
//!
//! This is the safety net for upstream misbehavior: whatever the model
//! returns, the caller gets a well-formed three-option result. Parse
//! failures are absorbed here, never propagated.

use serde::Deserialize;

use crate::llm_client::GenerateContentResponse;
use crate::reply::models::ReplyOption;

const FILLER_LABEL: &str = "Friendly";
const FILLER_TEXT: &str = "Got it!";

/// Language assigned when neither the model nor the detector produced one.
const DEFAULT_LANGUAGE: &str = "en";

/// A normalized generation: a resolved language and exactly three options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedReply {
    pub language: String,
    pub options: Vec<ReplyOption>,
}

/// The model's expected output object. Every field is lenient: missing keys
/// become defaults rather than parse failures.
#[derive(Debug, Deserialize)]
struct RawReply {
    language: Option<String>,
    #[serde(default)]
    options: Vec<RawOption>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    label: Option<String>,
    text: Option<String>,
}

/// Extracts the model's text, interprets it as a JSON options object, and
/// always produces exactly three options. Total: any failure falls back to
/// the fixed triple. The final language is the model's guess, else the
/// detector's, else "en".
pub fn normalize_reply(
    response: &GenerateContentResponse,
    detected_language: Option<&str>,
) -> NormalizedReply {
    let text = response.concatenated_text();

    let (language, mut options) = match parse_options(&text) {
        Some((language, options)) => (language, options),
        None => (None, fallback_options()),
    };

    while options.len() < 3 {
        options.push(ReplyOption {
            label: FILLER_LABEL.to_string(),
            text: FILLER_TEXT.to_string(),
        });
    }
    options.truncate(3);

    let language = language
        .or_else(|| detected_language.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    NormalizedReply { language, options }
}

fn parse_options(text: &str) -> Option<(Option<String>, Vec<ReplyOption>)> {
    let cleaned = strip_json_fences(text.trim());
    let raw: RawReply = serde_json::from_str(cleaned).ok()?;

    let options = raw
        .options
        .into_iter()
        .take(3)
        .map(|option| ReplyOption {
            label: option.label.unwrap_or_else(|| "Option".to_string()),
            text: option.text.unwrap_or_default(),
        })
        .collect();

    Some((raw.language, options))
}

/// The hardcoded fallback triple used when the model's output cannot be
/// interpreted at all.
fn fallback_options() -> Vec<ReplyOption> {
    vec![
        ReplyOption {
            label: "Confident".to_string(),
            text: "I hear you. Let me make it right—can we talk tonight?".to_string(),
        },
        ReplyOption {
            label: "Friendly".to_string(),
            text: "Sorry for the delay! I do care—how about we fix this together?".to_string(),
        },
        ReplyOption {
            label: "Original".to_string(),
            text: "I owe you one. Coffee truce and we reset the tone?".to_string(),
        },
    ]
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
