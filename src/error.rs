//! Application error types.
//!
//! Lower layers return a distinguished condition (not-found vs. generic
//! failure); handlers decide the HTTP-visible consequence. Anything in the
//! 5xx class is logged here with its diagnostic detail, while the response
//! body stays generic so no internal state leaks to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Application error type that converts to appropriate HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No live row matched the request. Expected, maps to 404, never
    /// logged as a fault.
    #[error("not found")]
    NotFound,

    /// The request payload could not be parsed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A handler asked for a page name the template cache does not
    /// contain. A deployment defect, not a user-facing 404.
    #[error("template {0:?} does not exist")]
    TemplateMissing(String),

    /// Template rendering failed.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// SQLite query error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(msg) => {
                tracing::debug!(error = %msg, "bad request");
                StatusCode::BAD_REQUEST
            }
            Self::TemplateMissing(name) => {
                tracing::error!(template = %name, "template missing from cache");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Template(err) => {
                tracing::error!(error = %err, "template render failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Database(err) => {
                tracing::error!(error = %err, "database error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = status.canonical_reason().unwrap_or("Error");
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_not_found() {
        assert_eq!(AppError::NotFound.to_string(), "not found");
    }

    #[test]
    fn error_display_template_missing() {
        let err = AppError::TemplateMissing("about".to_string());
        assert_eq!(err.to_string(), "template \"about\" does not exist");
    }

    #[test]
    fn error_into_response_not_found() {
        let response = AppError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_into_response_bad_request() {
        let response = AppError::BadRequest("unparseable form".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_into_response_template_missing() {
        // A missing page name is a deployment defect, never a 404.
        let response = AppError::TemplateMissing("about".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_into_response_internal() {
        let response = AppError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
