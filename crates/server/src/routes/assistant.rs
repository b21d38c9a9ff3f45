//! Styling assistant handlers (Gemini).
//!
//! Chat history is kept in the session. Structured answers come back as
//! JSON; an unusable answer is a `502`.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::models::assistant::{
    ProofSubmission, ProofVerdict, RepairGuide, RepairShopResults, ShopSearch, StylingTip,
    UpcyclingProject,
};
use crate::models::{ChatMessage, LoopSession};
use crate::services::assistant::{CHAT_FALLBACK, CHAT_GREETING, ImageData};
use crate::state::AppState;

/// Greeting plus the conversation so far.
#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    pub greeting: &'static str,
    pub messages: Vec<ChatMessage>,
}

/// Chat request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Chat reply.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct OutfitRequest {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct OutfitResponse {
    pub success: bool,
    pub suggestions: Vec<StylingTip>,
}

#[derive(Debug, Deserialize)]
pub struct RepairRequest {
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub fabric: String,
}

#[derive(Debug, Serialize)]
pub struct RepairResponse {
    pub success: bool,
    pub guide: RepairGuide,
}

#[derive(Debug, Deserialize)]
pub struct UpcycleRequest {
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct UpcycleResponse {
    pub success: bool,
    pub projects: Vec<UpcyclingProject>,
}

fn required<'a>(value: &'a str, message: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(message.to_string()));
    }
    Ok(value)
}

fn image(upload: &str) -> Result<ImageData> {
    ImageData::from_upload(upload)
        .map_err(|_| AppError::BadRequest("Please upload a valid image".to_string()))
}

/// The greeting and the stored conversation.
pub async fn history(session: Session) -> Result<Json<ChatHistoryResponse>> {
    let state = LoopSession::load(&session).await?;
    Ok(Json(ChatHistoryResponse {
        greeting: CHAT_GREETING,
        messages: state.chat,
    }))
}

/// Send a message. A failed call answers with the fallback line and leaves
/// the history untouched.
pub async fn chat(
    State(app): State<AppState>,
    session: Session,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let message = required(&request.message, "Message is required")?;
    let assistant = app.assistant()?;
    let mut state = LoopSession::load(&session).await?;

    let reply = match assistant.chat(&state.chat, message).await {
        Ok(reply) => {
            state.push_exchange(message, &reply);
            state.save(&session).await?;
            reply
        }
        Err(e) => {
            tracing::error!(error = %e, "Chat error");
            CHAT_FALLBACK.to_string()
        }
    };

    Ok(Json(ChatResponse { reply }))
}

/// Three outfit ideas for a garment description.
pub async fn outfits(
    State(app): State<AppState>,
    Json(request): Json<OutfitRequest>,
) -> Result<Json<OutfitResponse>> {
    let description = required(&request.description, "Describe the garment first")?;
    let suggestions = app
        .assistant()?
        .outfit_suggestions(description)
        .await
        .ok_or(AppError::AssistantFailed("Could not come up with outfits right now"))?;

    Ok(Json(OutfitResponse {
        success: true,
        suggestions,
    }))
}

/// Repair guide for an issue on a fabric.
pub async fn repair(
    State(app): State<AppState>,
    Json(request): Json<RepairRequest>,
) -> Result<Json<RepairResponse>> {
    let issue = required(&request.issue, "Describe the issue first")?;
    let guide = app
        .assistant()?
        .repair_advice(issue, request.fabric.trim())
        .await
        .ok_or(AppError::AssistantFailed("Could not find repair advice right now"))?;

    Ok(Json(RepairResponse {
        success: true,
        guide,
    }))
}

/// Upcycling projects for the garment in a photo.
pub async fn upcycle(
    State(app): State<AppState>,
    Json(request): Json<UpcycleRequest>,
) -> Result<Json<UpcycleResponse>> {
    let image = image(&request.image)?;
    let projects = app
        .assistant()?
        .upcycling_ideas(&image)
        .await
        .ok_or(AppError::AssistantFailed("Could not come up with projects right now"))?;

    Ok(Json(UpcycleResponse {
        success: true,
        projects,
    }))
}

/// Check a photo against the claimed action. Failures come back as an
/// invalid verdict, not an error.
pub async fn verify(
    State(app): State<AppState>,
    Json(submission): Json<ProofSubmission>,
) -> Result<Json<ProofVerdict>> {
    let image = image(&submission.image)?;
    let verdict = app
        .assistant()?
        .verify_action_proof(&image, submission.action)
        .await;

    tracing::info!(action = ?submission.action, valid = verdict.valid, "Proof checked");
    Ok(Json(verdict))
}

/// Nearby repair, thrift and fabric shops.
pub async fn shops(
    State(app): State<AppState>,
    Json(search): Json<ShopSearch>,
) -> Result<Json<RepairShopResults>> {
    let results = app.assistant()?.find_local_repair_shops(&search).await?;
    Ok(Json(results))
}
