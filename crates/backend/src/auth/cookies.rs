//! Cookie and credential helpers shared by the auth handlers.

use axum::http::{header, HeaderMap};

use super::types::{AuthConfig, SESSION_COOKIE_NAME, STATE_COOKIE_MAX_AGE_SECS, STATE_COOKIE_NAME};

fn build_cookie(name: &str, value: &str, max_age: i64, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        name, value, max_age, secure
    )
}

/// `Set-Cookie` value carrying a freshly issued session token.
pub fn build_session_cookie(config: &AuthConfig, token: &str) -> String {
    build_cookie(
        SESSION_COOKIE_NAME,
        token,
        config.token_max_age_secs(),
        config.secure_cookies,
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(config: &AuthConfig) -> String {
    build_cookie(SESSION_COOKIE_NAME, "", 0, config.secure_cookies)
}

/// `Set-Cookie` value remembering the login `state` until the callback.
pub fn build_state_cookie(config: &AuthConfig, state: &str) -> String {
    build_cookie(
        STATE_COOKIE_NAME,
        state,
        STATE_COOKIE_MAX_AGE_SECS,
        config.secure_cookies,
    )
}

pub fn extract_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(cookie_header) = value.to_str() else {
            continue;
        };
        for cookie_str in cookie_header.split(';') {
            if let Ok(cookie) = cookie::Cookie::parse(cookie_str.trim()) {
                if cookie.name() == cookie_name {
                    return Some(cookie.value().to_string());
                }
            }
        }
    }

    None
}

fn extract_token_from_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Session token from the session cookie, falling back to a bearer header.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    extract_cookie(headers, SESSION_COOKIE_NAME)
        .filter(|t| !t.is_empty())
        .or_else(|| extract_token_from_header(headers))
}
