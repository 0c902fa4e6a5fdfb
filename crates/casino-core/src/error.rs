//! Layered error types for the casino event enrichment pipeline.
//!
//! - [`DomainError`] - enrichment-path errors, recoverable or fatal-to-the-event
//! - [`InfraError`] - store/bus/upstream failures
//! - [`AppError`] - the umbrella `Result` alias used everywhere
//! - [`ApiError`] - HTTP API errors with status codes
//!
//! Recoverable errors (player not found, description stage failure) never
//! reach these types — they are handled inline and only bump a counter
//! (§7). What reaches `AppError` is, by construction, something that drops
//! the event or fails startup.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// DOMAIN ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Enrichment-path errors that cause a stage-1 abort (§4.4).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DomainError {
    /// No rate could be obtained for a non-base currency after a refresh
    /// attempt (§4.1 step 4).
    #[error("rate unavailable for currency: {0}")]
    RateUnavailable(String),

    /// The upstream quote set could not be fetched.
    #[error("upstream rate provider error: {0}")]
    UpstreamError(String),

    /// The upstream response could not be decoded.
    #[error("failed to decode upstream rate response: {0}")]
    DecodeError(String),

    /// The upstream response reported `success: false`.
    #[error("upstream rate provider reported failure")]
    ProviderError,

    /// The player store returned an error (not to be confused with a
    /// not-found result, which is `Ok(None)`).
    #[error("player lookup failed for player_id {player_id}: {source}")]
    PlayerLookupError {
        player_id: i64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

// ═══════════════════════════════════════════════════════════════════════════════
// INFRASTRUCTURE ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Infrastructure-level errors from external systems.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InfraError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("bus error: {0}")]
    Bus(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("resource not found")]
    NotFound,

    #[error("operation timed out: {0}")]
    Timeout(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

// ═══════════════════════════════════════════════════════════════════════════════
// APPLICATION ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// The primary error type used throughout the application.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("initialization error: {0}")]
    Initialization(String),

    #[error("shutdown requested")]
    ShutdownRequested,
}

/// Type alias for application `Result`s.
pub type Result<T> = std::result::Result<T, AppError>;

// ═══════════════════════════════════════════════════════════════════════════════
// API ERRORS (HTTP-specific)
// ═══════════════════════════════════════════════════════════════════════════════

/// API-level errors with HTTP status codes, converted via [`IntoResponse`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("internal error")]
    Internal(#[source] eyre::Report),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::App(AppError::Domain(DomainError::RateUnavailable(_))) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "RATE_UNAVAILABLE",
                self.to_string(),
            ),

            Self::App(
                AppError::Infra(_)
                | AppError::Config(_)
                | AppError::Initialization(_)
                | AppError::ShutdownRequested
                | AppError::Domain(_),
            )
            | Self::Internal(_) => {
                tracing::error!(error = ?self, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal error".into(),
                )
            }
        };

        (
            status,
            Json(json!({
                "error": {
                    "code": code,
                    "message": message
                }
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_display() {
        let err = DomainError::RateUnavailable("BTC".into());
        assert!(err.to_string().contains("BTC"));
    }

    #[test]
    fn app_error_from_domain() {
        let domain = DomainError::ProviderError;
        let app: AppError = domain.into();
        assert!(matches!(
            app,
            AppError::Domain(DomainError::ProviderError)
        ));
    }

    #[test]
    fn app_error_from_infra() {
        let infra = InfraError::NotFound;
        let app: AppError = infra.into();
        assert!(matches!(app, AppError::Infra(InfraError::NotFound)));
    }
}
