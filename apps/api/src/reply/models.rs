//! Request/response models for the reply-suggestion API.
//!
//! All tag fields are closed enumerations: unknown wire values are rejected
//! at deserialization, before any core logic runs. Length and range rules
//! that serde cannot express live in `GenerateRequest::validate`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Upper bound on a single turn's text.
pub const MAX_TURN_CHARS: usize = 2000;

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The person asking for reply suggestions.
    #[serde(rename = "self")]
    User,
    /// The person they are talking to.
    Counterpart,
    Other,
}

impl TurnRole {
    /// Label used when rendering the dialog into the prompt.
    pub fn label(self) -> &'static str {
        match self {
            TurnRole::User => "You",
            TurnRole::Counterpart => "Partner",
            TurnRole::Other => "Other",
        }
    }
}

fn default_role() -> TurnRole {
    TurnRole::Other
}

/// One message of the conversation. Insertion order is chronological.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(default = "default_role")]
    pub role: TurnRole,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Girlfriend,
    Boyfriend,
    Friend,
    Coworker,
    Boss,
    Stranger,
    Family,
    #[default]
    Other,
}

impl Relationship {
    pub fn as_str(self) -> &'static str {
        match self {
            Relationship::Girlfriend => "girlfriend",
            Relationship::Boyfriend => "boyfriend",
            Relationship::Friend => "friend",
            Relationship::Coworker => "coworker",
            Relationship::Boss => "boss",
            Relationship::Stranger => "stranger",
            Relationship::Family => "family",
            Relationship::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    DefuseTension,
    Apologize,
    Flirt,
    AskOut,
    Schedule,
    Negotiate,
    FollowUp,
    RejectPolitely,
    SayNo,
    Clarify,
    Congratulate,
    Thank,
    #[default]
    Other,
}

impl Scenario {
    /// Wire name, also used as the by_scenario stats key.
    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::DefuseTension => "defuse_tension",
            Scenario::Apologize => "apologize",
            Scenario::Flirt => "flirt",
            Scenario::AskOut => "ask_out",
            Scenario::Schedule => "schedule",
            Scenario::Negotiate => "negotiate",
            Scenario::FollowUp => "follow_up",
            Scenario::RejectPolitely => "reject_politely",
            Scenario::SayNo => "say_no",
            Scenario::Clarify => "clarify",
            Scenario::Congratulate => "congratulate",
            Scenario::Thank => "thank",
            Scenario::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Confident,
    Friendly,
    #[default]
    Neutral,
    Apologetic,
    Playful,
    Flirty,
    Formal,
    Direct,
    Other,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Confident => "confident",
            Tone::Friendly => "friendly",
            Tone::Neutral => "neutral",
            Tone::Apologetic => "apologetic",
            Tone::Playful => "playful",
            Tone::Flirty => "flirty",
            Tone::Formal => "formal",
            Tone::Direct => "direct",
            Tone::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// Optional post-hoc steering toward softer or sharper phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Soften,
    Sharpen,
}

fn default_personalness() -> u8 {
    50
}

/// Request body for POST /generate_reply.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
    #[serde(default)]
    pub relationship: Relationship,
    #[serde(default)]
    pub scenario: Scenario,
    #[serde(default)]
    pub tone: Tone,
    /// Explicit target language (ISO code). None means auto-detect.
    pub language: Option<String>,
    pub target_gender: Option<Gender>,
    /// 0=formal, 100=very personal.
    #[serde(default = "default_personalness")]
    pub personalness: u8,
    pub intensify: Option<Intensity>,
}

impl GenerateRequest {
    /// Enforces the length/range rules serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.personalness > 100 {
            return Err(AppError::Validation(
                "personalness must be between 0 and 100".to_string(),
            ));
        }
        for turn in &self.messages {
            if turn.text.is_empty() {
                return Err(AppError::Validation(
                    "message text cannot be empty".to_string(),
                ));
            }
            if turn.text.chars().count() > MAX_TURN_CHARS {
                return Err(AppError::Validation(format!(
                    "message text cannot exceed {MAX_TURN_CHARS} characters"
                )));
            }
        }
        Ok(())
    }
}

/// One of exactly three generated reply candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyOption {
    pub label: String,
    pub text: String,
}

/// Response body for POST /generate_reply. Immutable once built; not stored.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub id: Uuid,
    pub language: Option<String>,
    pub options: Vec<ReplyOption>,
}

/// Request body for POST /feedback. Not linked back to any generation store;
/// only the aggregate counters are updated.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    #[allow(dead_code)]
    pub generation_id: String,
    #[allow(dead_code)]
    pub chosen_label: Option<String>,
    pub chosen_text: Option<String>,
    #[allow(dead_code)]
    pub dismissed_labels: Option<Vec<String>>,
    #[allow(dead_code)]
    pub liked: Option<bool>,
}
