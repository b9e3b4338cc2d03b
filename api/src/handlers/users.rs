//! Account handlers
//!
//! Signup, login and logout. All of these pages are public.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};

use super::forms::{redirect, with_cookie, FormView};
use crate::app::SignupInput;
use crate::auth::{clear_session_cookie, extract_session_token, session_cookie, Principal};
use crate::error::AppError;
use crate::routes::RouteName;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginFormData {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SignupFormData {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password1: String,
    #[serde(default, skip_serializing)]
    pub password2: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutPage {
    pub page: &'static str,
    pub message: &'static str,
}

/// Only same-site absolute paths are followed after login
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") && !n.contains('\\') => n,
        _ => RouteName::NotesHome.path(),
    }
}

/// GET /auth/login/
pub async fn login_form(Query(query): Query<NextQuery>) -> Response {
    FormView::new(
        "login",
        LoginFormData {
            next: query.next,
            ..Default::default()
        },
    )
    .into_response()
}

/// POST /auth/login/
///
/// Opens a session, sets the session cookie and follows `next`.
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
    Form(data): Form<LoginFormData>,
) -> Result<Response, AppError> {
    let result = state
        .user_service
        .login(&data.username, &data.password)
        .await;

    let (user, token) = match result {
        Ok(ok) => ok,
        Err(e) => {
            let next = data.next.or(query.next);
            let form = FormView::new(
                "login",
                LoginFormData {
                    username: data.username,
                    password: String::new(),
                    next,
                },
            );
            return form.rerender_on(e);
        }
    };

    let next = data.next.as_deref().or(query.next.as_deref());
    let target = safe_next(next);
    tracing::debug!(user_id = %user.id, target, "Login redirect");

    let max_age = state.config.session_ttl_hours * 3600;
    with_cookie(redirect(target), &session_cookie(&token, max_age))
}

/// GET or POST /auth/logout/
///
/// Revokes the current session, if any, and clears the cookie.
pub async fn logout(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = extract_session_token(&headers) {
        state.user_service.logout(token).await?;
        if let Some(user) = principal.user() {
            tracing::info!(user_id = %user.id, "Logged out");
        }
    }

    let page = Json(LogoutPage {
        page: "logout",
        message: "You have been logged out.",
    })
    .into_response();
    with_cookie(page, &clear_session_cookie())
}

/// GET /auth/signup/
pub async fn signup_form() -> Response {
    FormView::new("signup", SignupFormData::default()).into_response()
}

/// POST /auth/signup/
///
/// Creates the account and sends the new user to the login page.
pub async fn signup(
    State(state): State<AppState>,
    Form(data): Form<SignupFormData>,
) -> Result<Response, AppError> {
    let input = SignupInput {
        username: data.username.clone(),
        password1: data.password1.clone(),
        password2: data.password2.clone(),
    };

    match state.user_service.signup(&input).await {
        Ok(_) => Ok(redirect(RouteName::UsersLogin.path())),
        Err(e) => FormView::new("signup", data).rerender_on(e),
    }
}
