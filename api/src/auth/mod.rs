//! Authentication and access control
//!
//! - `session`: resolves the request's principal from its session token
//! - `access`: who may reach which page

pub mod access;
pub mod session;

pub use access::{Access, Principal};
pub use session::{
    clear_session_cookie, extract_session_token, login_required, session_cookie,
    session_middleware,
};
