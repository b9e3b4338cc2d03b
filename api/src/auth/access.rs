//! Access control
//!
//! A request is made either anonymously or by a signed-in user. Pages are
//! public or need a login; anonymous visitors to the latter are sent to the
//! login page with a `next` parameter pointing back. Ownership of individual
//! notes is not decided here: the note store answers "not found" for notes
//! the user does not own.

use crate::domain::entities::User;
use crate::error::AppError;
use crate::routes::RouteName;

/// The acting identity of a request
#[derive(Debug, Clone, Default)]
pub enum Principal {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl Principal {
    pub fn user(&self) -> Option<&User> {
        match self {
            Principal::Anonymous => None,
            Principal::Authenticated(user) => Some(user),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    LoginRequired,
}

/// Login page URL that returns to `requested` afterwards
pub fn login_redirect(requested: &str) -> String {
    format!(
        "{}?next={}",
        RouteName::UsersLogin.path(),
        urlencoding::encode(requested).replace("%2F", "/")
    )
}

/// The signed-in user, or a redirect to the login page that returns to
/// `requested` (the path and query being visited).
pub fn require_login<'a>(principal: &'a Principal, requested: &str) -> Result<&'a User, AppError> {
    principal.user().ok_or_else(|| AppError::Unauthenticated {
        login_url: login_redirect(requested),
    })
}
