//! AI advisor handlers: insights, categorization, Q&A and backend health

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{read_json, records::require_user};
use crate::{audit_actor, AppError, AppState};
use vittam_core::{AIBackend, AIInsight, Category};

/// Request body for POST /api/categorize
#[derive(Debug, Deserialize)]
pub struct CategorizeRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CategorizeResponse {
    pub category: Category,
}

/// Request body for POST /api/ask
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Response for GET /api/ai/health
#[derive(Debug, Serialize)]
pub struct AIHealthResponse {
    pub configured: bool,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// GET /api/insights - AI insights over the current user's records
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<AIInsight>>, AppError> {
    let user = require_user(request.headers(), &state.config)?;

    let records = state.db.list_records(&user)?;
    let insights = state.advisor.generate_insights(&records).await;

    // Audit log - read access
    state.db.log_audit(
        &user,
        "generate",
        Some("insights"),
        None,
        Some(&format!("records={}, insights={}", records.len(), insights.len())),
    )?;

    Ok(Json(insights))
}

/// POST /api/categorize - Suggest a category for a description
pub async fn categorize(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<CategorizeResponse>, AppError> {
    let (headers, req) = read_json::<CategorizeRequest>(request).await?;

    let category = state.advisor.categorize(req.description.trim()).await;

    state.db.log_audit(
        &audit_actor(&headers, &state.config),
        "categorize",
        Some("record"),
        None,
        Some(&format!("category={}", category)),
    )?;

    Ok(Json(CategorizeResponse { category }))
}

/// POST /api/ask - Answer a question about the current user's records
pub async fn ask(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<AskResponse>, AppError> {
    let (headers, req) = read_json::<AskRequest>(request).await?;

    let question = req.question.trim();
    if question.is_empty() {
        return Err(AppError::bad_request("Question is required"));
    }
    let user = require_user(&headers, &state.config)?;

    let records = state.db.list_records(&user)?;
    let answer = state.advisor.answer(question, &records).await;

    state.db.log_audit(
        &user,
        "ask",
        Some("insights"),
        None,
        Some(&format!("records={}", records.len())),
    )?;

    Ok(Json(AskResponse { answer }))
}

/// GET /api/ai/health - AI backend configuration and reachability
pub async fn ai_health(State(state): State<Arc<AppState>>) -> Json<AIHealthResponse> {
    let response = match state.advisor.ai() {
        Some(client) => AIHealthResponse {
            configured: true,
            healthy: client.health_check().await,
            model: Some(client.model().to_string()),
            host: Some(client.host().to_string()),
        },
        None => AIHealthResponse {
            configured: false,
            healthy: false,
            model: None,
            host: None,
        },
    };

    Json(response)
}
