/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Generative Language API
/// directly. All model interactions MUST go through `ModelGateway`.
///
/// Fallback strategy is endpoint rotation ONLY: the candidate models are
/// tried in priority order and the first 2xx response wins. There is no
/// retry-with-backoff within an endpoint — adding one would change the
/// observable timing behavior.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Candidate model endpoints, highest priority first. Fixed at startup.
pub const GEMINI_ENDPOINTS: &[&str] = &[
    "https://generativelanguage.googleapis.com/v1/models/gemini-2.5-flash:generateContent",
    "https://generativelanguage.googleapis.com/v1/models/gemini-2.0-flash-001:generateContent",
    "https://generativelanguage.googleapis.com/v1/models/gemini-2.0-flash-lite-001:generateContent",
    "https://generativelanguage.googleapis.com/v1/models/gemini-2.5-flash-lite:generateContent",
];

/// Hard bound on each endpoint attempt.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const TEMPERATURE: f64 = 0.9;
const TOP_P: f64 = 0.95;
const TOP_K: u32 = 40;
const MAX_OUTPUT_TOKENS: u32 = 512;

/// Harm categories blocked at medium-and-above severity unless safety
/// filtering is disabled via configuration.
const SAFETY_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_CIVIC_INTEGRITY",
];

const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("all candidate endpoints failed; last error: {last_error}")]
    AllEndpointsFailed { last_error: String },

    #[error("failed to decode response body: {0}")]
    Decode(#[from] reqwest::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (Generative Language API v1, camelCase)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    #[serde(rename = "safetySettings", skip_serializing_if = "Option::is_none")]
    safety_settings: Option<Vec<SafetySetting>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

/// Response shape: generated text lives in `candidates[0].content.parts[*].text`.
/// Every level is optional — the reply normalizer treats an absent structure
/// as empty output rather than an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenates the text of all parts under the first candidate with
    /// newlines. Absent or malformed structure yields an empty string.
    pub fn concatenated_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Gateway
// ────────────────────────────────────────────────────────────────────────────

/// Seam for the generative model so handlers can be exercised without the
/// network. The production implementation is `GeminiClient`.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, LlmError>;
}

/// Client for the Generative Language API with model-endpoint rotation.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    safety_enabled: bool,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, safety_enabled: bool) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            safety_enabled,
        }
    }

    fn build_request<'a>(&self, prompt: &'a str) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
            safety_settings: self.safety_enabled.then(|| {
                SAFETY_CATEGORIES
                    .iter()
                    .map(|category| SafetySetting {
                        category,
                        threshold: SAFETY_THRESHOLD,
                    })
                    .collect()
            }),
        }
    }
}

#[async_trait]
impl ModelGateway for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, LlmError> {
        // Fail fast before any network call when unconfigured.
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let body = self.build_request(prompt);
        let mut last_error = String::from("no endpoint attempted");

        for endpoint in GEMINI_ENDPOINTS {
            let url = format!("{endpoint}?key={api_key}");

            let response = match self.client.post(&url).json(&body).send().await {
                Ok(r) => r,
                Err(e) => {
                    warn!("Request to {endpoint} failed: {e}");
                    last_error = e.to_string();
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                debug!("Endpoint {endpoint} answered {status}");
                return response.json::<GenerateContentResponse>().await.map_err(LlmError::Decode);
            }

            let error_body = response.text().await.unwrap_or_default();
            warn!("Endpoint {endpoint} returned {status}: {error_body}");
            last_error = error_body;
        }

        Err(LlmError::AllEndpointsFailed { last_error })
    }
}
