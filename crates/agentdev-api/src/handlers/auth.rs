//! Login, refresh and logout handlers.

use axum::{extract::State, Json};
use tracing::{info, warn};

use agentdev_models::User;

use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, AuthUser};
use crate::state::AppState;
use crate::types::{LoginRequest, LoginResponse, MessageResponse, RefreshRequest};

/// POST /api/v1/auth/login - Exchange credentials for a token pair.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    req.validate()?;

    let Some(user) = state.users.verify(&req.email, &req.password) else {
        warn!(email = %req.email, "Login failed");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };

    let tokens = state.sessions.login(user.clone());
    info!(user_id = %user.user_id, "User logged in");
    Ok(Json(LoginResponse::new(tokens, user)))
}

/// POST /api/v1/auth/refresh - Rotate a refresh token into a new pair.
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> Result<Json<LoginResponse>> {
    let (tokens, user) = state
        .sessions
        .refresh(&req.refresh_token)
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired refresh token".to_string()))?;

    info!(user_id = %user.user_id, "Session refreshed");
    Ok(Json(LoginResponse::new(tokens, user)))
}

/// POST /api/v1/auth/logout - Revoke the caller's session.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> Json<MessageResponse> {
    state.sessions.revoke(&auth.token);
    info!(user_id = %auth.user.user_id, "User logged out");
    Json(MessageResponse::new("Successfully logged out"))
}

/// GET /api/v1/auth/me - The authenticated user.
pub async fn me(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}
