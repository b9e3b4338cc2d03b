//! Route table
//!
//! Every page has a stable name (`notes:add`, `users:login`, ...), a path
//! pattern, and an access level. The router is assembled from this table, and
//! `reverse` turns a name plus arguments back into a URL.

use std::sync::Arc;

use anyhow::Context;
use axum::{middleware, routing::get, routing::MethodRouter, Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{login_required, session_middleware, Access};
use crate::handlers;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    NotesHome,
    NotesList,
    NotesAdd,
    NotesDetail,
    NotesEdit,
    NotesDelete,
    NotesSuccess,
    UsersLogin,
    UsersLogout,
    UsersSignup,
}

impl RouteName {
    pub const ALL: [RouteName; 10] = [
        RouteName::NotesHome,
        RouteName::NotesList,
        RouteName::NotesAdd,
        RouteName::NotesDetail,
        RouteName::NotesEdit,
        RouteName::NotesDelete,
        RouteName::NotesSuccess,
        RouteName::UsersLogin,
        RouteName::UsersLogout,
        RouteName::UsersSignup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RouteName::NotesHome => "notes:home",
            RouteName::NotesList => "notes:list",
            RouteName::NotesAdd => "notes:add",
            RouteName::NotesDetail => "notes:detail",
            RouteName::NotesEdit => "notes:edit",
            RouteName::NotesDelete => "notes:delete",
            RouteName::NotesSuccess => "notes:success",
            RouteName::UsersLogin => "users:login",
            RouteName::UsersLogout => "users:logout",
            RouteName::UsersSignup => "users:signup",
        }
    }

    /// Axum path pattern. For routes without arguments this is also the URL.
    pub fn path(self) -> &'static str {
        match self {
            RouteName::NotesHome => "/",
            RouteName::NotesList => "/notes/",
            RouteName::NotesAdd => "/add/",
            RouteName::NotesDetail => "/note/:slug/",
            RouteName::NotesEdit => "/edit/:slug/",
            RouteName::NotesDelete => "/delete/:slug/",
            RouteName::NotesSuccess => "/done/",
            RouteName::UsersLogin => "/auth/login/",
            RouteName::UsersLogout => "/auth/logout/",
            RouteName::UsersSignup => "/auth/signup/",
        }
    }

    pub fn access(self) -> Access {
        match self {
            RouteName::NotesHome
            | RouteName::UsersLogin
            | RouteName::UsersLogout
            | RouteName::UsersSignup => Access::Public,
            RouteName::NotesList
            | RouteName::NotesAdd
            | RouteName::NotesDetail
            | RouteName::NotesEdit
            | RouteName::NotesDelete
            | RouteName::NotesSuccess => Access::LoginRequired,
        }
    }

    fn is_account_route(self) -> bool {
        self.as_str().starts_with("users:")
    }

    /// URL for this route, filling `:param` segments from `args` in order.
    /// `None` when the number of arguments does not match.
    pub fn reverse(self, args: &[&str]) -> Option<String> {
        let mut remaining = args.iter();
        let mut url = String::new();

        for segment in self.path().split_inclusive('/') {
            match segment.strip_prefix(':') {
                Some(param) => {
                    let value = remaining.next()?;
                    url.push_str(&urlencoding::encode(value));
                    if param.ends_with('/') {
                        url.push('/');
                    }
                }
                None => url.push_str(segment),
            }
        }

        match remaining.next() {
            Some(_) => None,
            None => Some(url),
        }
    }

    /// URL of a route that takes a single slug
    pub fn with_slug(self, slug: &str) -> String {
        self.reverse(&[slug])
            .unwrap_or_else(|| self.path().to_string())
    }

    fn handler(self) -> MethodRouter<AppState> {
        match self {
            RouteName::NotesHome => get(handlers::home),
            RouteName::NotesList => get(handlers::list_notes),
            RouteName::NotesAdd => get(handlers::add_form).post(handlers::create_note),
            RouteName::NotesDetail => get(handlers::note_detail),
            RouteName::NotesEdit => get(handlers::edit_form).post(handlers::update_note),
            RouteName::NotesDelete => get(handlers::delete_confirm)
                .post(handlers::delete_note)
                .delete(handlers::delete_note),
            RouteName::NotesSuccess => get(handlers::success),
            RouteName::UsersLogin => get(handlers::login_form).post(handlers::login),
            RouteName::UsersLogout => get(handlers::logout).post(handlers::logout),
            RouteName::UsersSignup => get(handlers::signup_form).post(handlers::signup),
        }
    }
}

impl std::fmt::Display for RouteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RouteName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RouteName::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("Unknown route: {}", s))
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Full application router without rate limiting
pub fn build_router(state: AppState) -> Router {
    assemble(state, |accounts| accounts)
}

/// Full application router with per-IP rate limiting on the account pages.
///
/// Must be served with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn build_rate_limited_router(state: AppState) -> anyhow::Result<Router> {
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(state.config.auth_rate_per_second)
            .burst_size(state.config.auth_rate_burst)
            .finish()
            .context("Invalid auth rate limit configuration")?,
    );

    Ok(assemble(state, move |accounts| {
        accounts.layer(GovernorLayer {
            config: governor_config,
        })
    }))
}

fn assemble<F>(state: AppState, wrap_accounts: F) -> Router
where
    F: FnOnce(Router<AppState>) -> Router<AppState>,
{
    let mut public = Router::new();
    let mut accounts = Router::new();
    let mut protected = Router::new();

    for name in RouteName::ALL {
        if name.is_account_route() {
            accounts = accounts.route(name.path(), name.handler());
            continue;
        }
        match name.access() {
            Access::Public => public = public.route(name.path(), name.handler()),
            Access::LoginRequired => protected = protected.route(name.path(), name.handler()),
        }
    }

    Router::new()
        .route("/health", get(health))
        .merge(public)
        .merge(wrap_accounts(accounts))
        .merge(protected.route_layer(middleware::from_fn(login_required)))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    session_middleware,
                )),
        )
        .with_state(state)
}
