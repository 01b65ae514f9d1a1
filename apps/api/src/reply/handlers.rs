//! Axum route handlers for reply generation, feedback, and stats.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ModelGateway;
use crate::reply::language::detect_language;
use crate::reply::models::{FeedbackRequest, GenerateRequest, GenerateResponse};
use crate::reply::normalize::normalize_reply;
use crate::reply::prompts::build_prompt;
use crate::state::AppState;
use crate::stats::{StatsSnapshot, StatsStore};

/// POST /generate_reply
///
/// Pipeline: validate → detect language (when none given) → build prompt →
/// model gateway → normalize → record stats → respond.
///
/// Stats are recorded only after the gateway call succeeds, so upstream
/// failures leave every counter untouched.
pub async fn handle_generate_reply(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    request.validate()?;

    let detected = detect_language(&request.messages);
    let target_language = request.language.as_deref().or(detected);

    let prompt = build_prompt(&request, target_language);
    let raw = state.gateway.generate(&prompt).await?;

    let normalized = normalize_reply(&raw, detected);

    state
        .stats
        .record_generation(&normalized.language, request.scenario.as_str());
    info!(
        language = %normalized.language,
        scenario = request.scenario.as_str(),
        "Generated reply options"
    );

    Ok(Json(GenerateResponse {
        id: Uuid::new_v4(),
        language: Some(normalized.language),
        options: normalized.options,
    }))
}

/// POST /feedback
///
/// Always answers `{"ok": true}`; a non-empty chosen text is the only
/// signal that feeds the conversion counter.
pub async fn handle_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Json<Value> {
    if request.chosen_text.as_deref().is_some_and(|text| !text.is_empty()) {
        state.stats.record_chosen();
    }

    Json(json!({"ok": true}))
}

/// GET /stats
pub async fn handle_stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.stats.snapshot())
}
