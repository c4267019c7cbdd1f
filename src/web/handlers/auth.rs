//! Authentication handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::{self, Credentials, LogoutOutcome};
use crate::web::dto::{MessageResponse, RegisterResponse};
use crate::web::error::ApiError;
use crate::web::state::AppState;

fn credentials(payload: Result<Json<Credentials>, JsonRejection>) -> Result<Credentials, ApiError> {
    payload
        .map(|Json(credentials)| credentials)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// POST /api/auth/register - Create an account.
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let credentials = credentials(payload)?;
    let user = auth::register(state.users.as_ref(), &state.hasher, credentials).await?;
    Ok(Json(user.into()))
}

/// POST /api/auth/login - Authenticate and start a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    let credentials = credentials(payload)?;
    let current_token = state.cookie.token(&jar);

    let success = auth::login(
        state.users.as_ref(),
        &state.hasher,
        &state.sessions,
        current_token.as_deref(),
        credentials,
    )
    .await?;

    let jar = jar.add(state.cookie.issue(success.token));
    Ok((jar, Json(MessageResponse::new(success.message))))
}

/// GET /api/auth/logout - End the current session.
///
/// Always 200; the message says what happened.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let token = state.cookie.token(&jar);
    let outcome = state.sessions.logout(token.as_deref()).await;

    let jar = match outcome {
        LogoutOutcome::Failed => jar,
        _ if token.is_some() => jar.remove(state.cookie.removal()),
        _ => jar,
    };

    (jar, Json(MessageResponse::new(outcome.message())))
}
