//! Expense record handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::read_json;
use crate::{audit_actor, current_user, AppError, AppState, ServerConfig};
use vittam_core::summary::{user_summary, UserSummary, USER_NOT_FOUND};
use vittam_core::{Category, ExpenseLevel, ExpenseRecord, NewExpenseRecord};

/// A record as returned by the API, with its spending level
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    #[serde(flatten)]
    pub record: ExpenseRecord,
    pub level: ExpenseLevel,
}

impl From<ExpenseRecord> for RecordResponse {
    fn from(record: ExpenseRecord) -> Self {
        let level = record.level();
        Self { record, level }
    }
}

/// Request body for creating a record
#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    pub description: String,
    pub amount: f64,
    /// Suggested by the categorizer when absent
    pub category: Option<String>,
    /// Defaults to today (UTC)
    pub date: Option<NaiveDate>,
}

/// The current user, or 401 "User not found"
pub(crate) fn require_user(
    headers: &axum::http::HeaderMap,
    config: &ServerConfig,
) -> Result<String, AppError> {
    current_user(headers, config)
        .0
        .ok_or_else(|| AppError::unauthorized(USER_NOT_FOUND))
}

/// GET /api/records - List the current user's records
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<RecordResponse>>, AppError> {
    let user = require_user(request.headers(), &state.config)?;

    let records = state.db.list_records(&user)?;

    // Audit log - read access
    state.db.log_audit(
        &user,
        "list",
        Some("record"),
        None,
        Some(&format!("count={}", records.len())),
    )?;

    Ok(Json(records.into_iter().map(RecordResponse::from).collect()))
}

/// POST /api/records - Create a record
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<RecordResponse>, AppError> {
    let (headers, req) = read_json::<CreateRecordRequest>(request).await?;
    let user = require_user(&headers, &state.config)?;

    let description = req.description.trim();
    if description.is_empty() {
        return Err(AppError::bad_request("Description is required"));
    }
    if !req.amount.is_finite() {
        return Err(AppError::bad_request("Amount must be a number"));
    }

    let category = match req.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(label) => label
            .parse::<Category>()
            .map_err(|_| AppError::bad_request(&format!("Unknown category: {}", label)))?,
        None => state.advisor.categorize(description).await,
    };

    let new_record = NewExpenseRecord {
        amount: req.amount,
        category,
        description: description.to_string(),
        date: req.date.unwrap_or_else(|| Utc::now().date_naive()),
    };
    let id = state.db.insert_record(&user, &new_record)?;

    // Audit log
    state.db.log_audit(
        &user,
        "create",
        Some("record"),
        Some(id),
        Some(&format!("amount={}, category={}", new_record.amount, category)),
    )?;

    let record = state
        .db
        .get_record(id)?
        .ok_or_else(|| AppError::internal("Record not found after creation"))?;

    Ok(Json(record.into()))
}

/// DELETE /api/records/:id - Delete one of the current user's records
///
/// Returns an empty object on success.
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = require_user(request.headers(), &state.config)?;

    if !state.db.delete_record(&user, id)? {
        return Err(AppError::not_found("Record not found"));
    }

    // Audit log
    state
        .db
        .log_audit(&user, "delete", Some("record"), Some(id), None)?;

    Ok(Json(serde_json::json!({})))
}

/// GET /api/records/summary - Total and active-day count for the current user
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<UserSummary>), AppError> {
    let (user, _) = current_user(request.headers(), &state.config);
    let summary = user_summary(&state.db, user.as_deref());

    let status = match &summary {
        UserSummary::Summary(_) => StatusCode::OK,
        UserSummary::Error { error } if error == USER_NOT_FOUND => StatusCode::UNAUTHORIZED,
        UserSummary::Error { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    // Audit log - read access; the summary is returned even if this fails
    let actor = audit_actor(request.headers(), &state.config);
    if let Err(e) = state.db.log_audit(
        &actor,
        "view",
        Some("summary"),
        None,
        Some(&format!("status={}", status.as_u16())),
    ) {
        warn!(error = %e, "Failed to write summary audit entry");
    }

    Ok((status, Json(summary)))
}
