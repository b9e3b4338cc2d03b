//! Session middleware
//!
//! Resolves the session token of every request into a `Principal`, and
//! guards login-only pages.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::access::{require_login, Principal};
use crate::AppState;

pub const SESSION_COOKIE: &str = "sessionid";

/// Extract the session token from `Authorization: Bearer` or the session cookie
pub fn extract_session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .find_map(|pair| {
            pair.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` value carrying a fresh session token
pub fn session_cookie(token: &str, max_age_seconds: i64) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token, max_age_seconds
    )
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
        SESSION_COOKIE
    )
}

/// Session middleware
///
/// Looks up the session token and injects the `Principal` into request
/// extensions. Never rejects: unknown or expired tokens are anonymous.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = extract_session_token(request.headers()).map(str::to_owned);

    let principal = match token {
        Some(token) => match state.user_service.authenticate(&token).await {
            Ok(Some(user)) => Principal::Authenticated(user),
            Ok(None) => Principal::Anonymous,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to resolve session");
                Principal::Anonymous
            }
        },
        None => Principal::Anonymous,
    };

    request.extensions_mut().insert(principal);
    next.run(request).await
}

/// Login-required middleware
///
/// Redirects anonymous requests to the login page and injects the `User`
/// into request extensions for handlers behind it.
pub async fn login_required(mut request: Request<Body>, next: Next) -> Response {
    let principal = request
        .extensions()
        .get::<Principal>()
        .cloned()
        .unwrap_or_default();

    let requested = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| request.uri().path())
        .to_string();

    match require_login(&principal, &requested) {
        Ok(user) => {
            let user = user.clone();
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
