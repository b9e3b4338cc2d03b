//! Form pages
//!
//! A form page echoes the submitted values back with per-field errors, the
//! way an HTML form would be re-rendered after a failed POST.

use std::collections::BTreeMap;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, DomainError};

/// Key for errors that belong to the form as a whole
pub const NON_FIELD_ERRORS: &str = "__all__";

#[derive(Debug, Serialize)]
pub struct FormView<T: Serialize> {
    /// `note`, `login` or `signup`
    pub kind: &'static str,
    pub values: T,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl<T: Serialize> FormView<T> {
    pub fn new(kind: &'static str, values: T) -> Self {
        Self {
            kind,
            values,
            errors: BTreeMap::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Re-render with the error attached when it is something the user can
    /// fix in the form; other errors propagate unchanged.
    pub fn rerender_on(mut self, err: AppError) -> Result<Response, AppError> {
        match err {
            AppError::Domain(DomainError::DuplicateSlug(slug)) => {
                let message = DomainError::DuplicateSlug(slug).to_string();
                self.add_error("slug", message);
            }
            AppError::Domain(DomainError::InvalidField { field, message }) => {
                self.add_error(field, message);
            }
            AppError::Domain(DomainError::InvalidCredentials) => {
                self.add_error(
                    NON_FIELD_ERRORS,
                    "Please enter a correct username and password.",
                );
            }
            other => return Err(other),
        }
        Ok(self.into_response())
    }
}

#[derive(Serialize)]
struct FormPage<T: Serialize> {
    form: FormView<T>,
}

impl<T: Serialize> IntoResponse for FormView<T> {
    fn into_response(self) -> Response {
        Json(FormPage { form: self }).into_response()
    }
}

/// `302 Found` to `location`
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Attach a `Set-Cookie` header to a response
pub fn with_cookie(mut response: Response, cookie: &str) -> Result<Response, AppError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| AppError::Internal(format!("Invalid cookie value: {}", e)))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(response)
}
