//! Server-rendered HTML screens.
//!
//! Each record type gets list, detail, create, update and delete handlers.
//! Successful writes answer `303 See Other`; invalid input re-renders the
//! form with `422`; missing records render a `404` page.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use sea_orm::DbErr;

use crate::errors::ApiError;

pub mod dives;
pub mod equipment;
pub mod home;
pub mod html;
pub mod members;

/// An [`ApiError`] rendered as an HTML page.
#[derive(Debug)]
pub struct PageError(pub ApiError);

pub type PageResult = Result<Response, PageError>;

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let error = self.0;
        error.log_internal();

        let status = error.status_code();
        let title = status.canonical_reason().unwrap_or("Error");
        let body = format!("<p>{}</p>", html::escape(&error.user_message()));
        (status, Html(html::document(title, &body))).into_response()
    }
}

impl From<ApiError> for PageError {
    fn from(error: ApiError) -> Self {
        Self(error)
    }
}

impl From<DbErr> for PageError {
    fn from(error: DbErr) -> Self {
        Self(error.into())
    }
}

/// Parse an id path segment. Anything that is not a positive integer cannot
/// name a record, so it is a 404 rather than a 400.
pub(crate) fn parse_id(raw: &str, resource: &str) -> Result<i32, PageError> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| PageError(ApiError::not_found(resource, Some(raw.to_string()))))
}

/// A full page with status 200.
pub(crate) fn render(title: &str, body: &str) -> Response {
    Html(html::document(title, body)).into_response()
}

/// A form page re-rendered after failed validation.
pub(crate) fn render_invalid(title: &str, body: &str) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Html(html::document(title, body))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "Member").unwrap(), 42);
        assert!(parse_id("0", "Member").is_err());
        assert!(parse_id("-3", "Member").is_err());
        assert!(parse_id("abc", "Member").is_err());
        assert!(parse_id("99999999999", "Member").is_err());
    }

    #[test]
    fn test_page_error_status() {
        let response = PageError(ApiError::not_found("Dive", Some("7".to_string()))).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
