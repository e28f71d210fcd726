use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::crypto::token::TokenError;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// An I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Email/password pair did not match a user. A single variant for both
    /// causes so the response cannot reveal which part was wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, expired, or tampered access token.
    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    /// The authenticated user lacks the required role.
    #[error("Forbidden")]
    Forbidden,

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// A uniqueness conflict (e.g. duplicate email on sign-up).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A password hashing error.
    #[error("Hash error: {0}")]
    Hash(String),

    /// A token issuing error.
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Location of the login form, used when an unauthenticated request is
/// bounced.
pub const LOGIN_PATH: &str = "/users/log-in";
/// Non-privileged landing page, used when a role check fails.
pub const HOME_PATH: &str = "/users/";

/// Builds a 303 redirect. Auth failures are always expressed to the client
/// as a redirect, never as a bare 401/403 body.
fn see_other(location: &str) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::Pool(ref e) => {
                tracing::error!("Pool error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "File system error".to_string())
            }

            AppError::InvalidCredentials => {
                tracing::warn!("Login failed: invalid credentials");
                (StatusCode::UNAUTHORIZED, "Invalid email or password.".to_string())
            }

            AppError::Unauthenticated(ref msg) => {
                tracing::warn!("Unauthenticated request: {}", msg);
                return see_other(LOGIN_PATH);
            }

            AppError::Forbidden => {
                tracing::warn!("Role check failed, redirecting to landing page");
                return see_other(HOME_PATH);
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }

            AppError::Conflict(ref msg) => {
                tracing::debug!("Conflict: {}", msg);
                (StatusCode::CONFLICT, msg.clone())
            }

            AppError::Hash(ref msg) => {
                tracing::error!("Hash error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }

            AppError::Token(ref e) => {
                tracing::error!("Token error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "message": message
        }))
        .unwrap_or_else(|_| r#"{"message":"Internal server error"}"#.to_string());

        (status, body).into_response()
    }
}
