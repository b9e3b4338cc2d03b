//! HTTP harness
//!
//! Drives the full router (session middleware, access control, handlers)
//! against in-memory repositories. Each `TestClient` carries an optional
//! session cookie, so tests can act as the author, another reader or an
//! anonymous visitor.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;

use super::mocks::{InMemoryNoteRepository, InMemorySessionRepository, InMemoryUserRepository};
use crate::app::{NoteService, UserService};
use crate::auth::session::SESSION_COOKIE;
use crate::config::Config;
use crate::domain::entities::User;
use crate::domain::ports::{NoteRepository, SessionRepository, UserRepository};
use crate::routes::build_router;
use crate::AppState;

pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub notes: Arc<InMemoryNoteRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        let notes = Arc::new(InMemoryNoteRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let sessions = Arc::new(InMemorySessionRepository::new());
        let config = Config::for_tests();

        let note_repo: Arc<dyn NoteRepository> = notes.clone();
        let user_repo: Arc<dyn UserRepository> = users.clone();
        let session_repo: Arc<dyn SessionRepository> = sessions.clone();

        let state = AppState {
            note_service: Arc::new(NoteService::new(note_repo)),
            user_service: Arc::new(UserService::new(
                user_repo,
                session_repo,
                config.secret_key.clone(),
                Duration::hours(config.session_ttl_hours),
            )),
            config,
        };

        Self {
            router: build_router(state.clone()),
            state,
            notes,
            users,
            sessions,
        }
    }

    /// Client without a session
    pub fn anonymous(&self) -> TestClient<'_> {
        TestClient {
            app: self,
            token: None,
        }
    }

    /// Client signed in as `user`, bypassing the login form
    pub async fn force_login(&self, user: &User) -> TestClient<'_> {
        self.users.insert(user.clone());
        let token = self
            .state
            .user_service
            .open_session(user)
            .await
            .expect("Failed to open session");

        TestClient {
            app: self,
            token: Some(token),
        }
    }

    /// Client presenting a token obtained some other way, e.g. from the login page
    pub fn with_session(&self, token: String) -> TestClient<'_> {
        TestClient {
            app: self,
            token: Some(token),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

pub struct TestClient<'a> {
    app: &'a TestApp,
    token: Option<String>,
}

impl TestClient<'_> {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn request(&self, method: Method, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.token {
            Some(token) => builder.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token)),
            None => builder,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = self.request(Method::GET, uri).body(Body::empty()).unwrap();
        self.app.send(request).await
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = self
            .request(Method::POST, uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.app.send(request).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        let request = self
            .request(Method::DELETE, uri)
            .body(Body::empty())
            .unwrap();
        self.app.send(request).await
    }
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Value of the session cookie set by this response, if any
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|c| c.split(';').next())
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, value)| value.to_string())
    }
}
