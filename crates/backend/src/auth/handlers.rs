//! Authentication HTTP handlers.

use axum::extract::Query;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use shared_types::NewUser;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

use super::cookies::{
    build_session_cookie, build_state_cookie, clear_session_cookie, extract_cookie,
    extract_session_token,
};
use super::types::{AuthUserResponse, CallbackParams, CallbackRequest, STATE_COOKIE_NAME};

/// Start Google OAuth login flow.
///
/// Redirects the browser to Google's consent screen, always asking for
/// consent and offline access, and remembers the `state` in a cookie.
pub async fn google_login(State(state): State<AppState>) -> Response {
    let redirect = state
        .sso
        .authorization_redirect(&[("prompt", "consent"), ("access_type", "offline")]);

    let state_cookie = build_state_cookie(&state.auth_config, &redirect.state);

    (
        StatusCode::FOUND,
        [
            (header::LOCATION, redirect.url),
            (header::SET_COOKIE, state_cookie),
        ],
    )
        .into_response()
}

/// Handle Google OAuth callback.
///
/// Verifies the response, finds or registers the local user, and sends the
/// browser home with a fresh session cookie.
pub async fn google_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let request = CallbackRequest {
        params,
        state_cookie: extract_cookie(&headers, STATE_COOKIE_NAME),
    };

    let identity = state.sso.verify_callback(&request).await?;
    tracing::info!(
        "OAuth login from {} via {}",
        identity.email,
        identity.provider
    );

    let user = match state.users.find_by_email(&identity.email).await? {
        Some(user) => user,
        None => {
            tracing::info!("Registering new user: {}", identity.email);
            state
                .users
                .create(NewUser {
                    email: identity.email,
                    full_name: identity.display_name,
                    provider: identity.provider,
                })
                .await?
        }
    };

    let token = state.tokens.issue(&user.email)?;
    let cookie = build_session_cookie(&state.auth_config, &token);

    tracing::info!("Successful login for: {}", user.email);

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, "/".to_string()),
            (header::SET_COOKIE, cookie),
        ],
    )
        .into_response())
}

/// Get current authenticated user info.
pub async fn auth_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<AuthUserResponse>> {
    let token = extract_session_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing authentication".to_string()))?;

    let claims = state
        .tokens
        .verify(&token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let user = state
        .users
        .find_by_email(&claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("User".to_string()))?;

    Ok(Json(user.into()))
}

/// Logout - clear session cookie.
pub async fn auth_logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_session_cookie(&state.auth_config);

    (
        StatusCode::FOUND,
        [
            (header::LOCATION, "/".to_string()),
            (header::SET_COOKIE, cookie),
        ],
    )
}
