//! Authentication-related handlers

use axum::extract::Request;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{current_user, AppState};

/// Response for the /api/me endpoint
#[derive(Serialize)]
pub struct MeResponse {
    /// The current user's identifier, if one was asserted
    pub user: Option<String>,
    /// How the user was identified
    pub auth_method: String,
}

/// Get the current user
pub async fn get_me(State(state): State<Arc<AppState>>, request: Request) -> Json<MeResponse> {
    let (user, method) = current_user(request.headers(), &state.config);

    Json(MeResponse {
        user,
        auth_method: method.as_str().to_string(),
    })
}
