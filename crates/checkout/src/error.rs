//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::orders::OrderApiError;
use crate::payment::{BankDetailsError, GatewayError};
use crate::rates::RateError;

/// Application-level error type for the checkout service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog service operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Charge-plan rate operation failed.
    #[error("Rate error: {0}")]
    Rates(#[from] RateError),

    /// Payment gateway operation failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Bank-details operation failed.
    #[error("Bank details error: {0}")]
    BankDetails(#[from] BankDetailsError),

    /// Order-completion operation failed.
    #[error("Order error: {0}")]
    Orders(#[from] OrderApiError),

    /// Checkout validation or payment failure.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-class errors to Sentry
        if matches!(
            self,
            Self::Internal(_) | Self::Catalog(_) | Self::Gateway(_) | Self::Orders(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Catalog(_) | Self::Gateway(_) | Self::BankDetails(_) | Self::Rates(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Orders(_) => StatusCode::BAD_GATEWAY,
            Self::Checkout(err) => match err {
                CheckoutError::MissingAddress
                | CheckoutError::MissingNetbankingMode
                | CheckoutError::EmptyCart => StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutError::ModeNotAllowed => StatusCode::FORBIDDEN,
                CheckoutError::VerificationFailed => StatusCode::PAYMENT_REQUIRED,
                CheckoutError::Gateway(_) | CheckoutError::Orders(_) => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose upstream error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Catalog(_) => "Product catalog is unavailable".to_string(),
            Self::Rates(_) => "Rate service is unavailable".to_string(),
            Self::Gateway(_) => "Payment gateway is unavailable".to_string(),
            Self::BankDetails(_) => "Bank details are unavailable".to_string(),
            Self::Orders(_) => "Order service is unavailable".to_string(),
            Self::Checkout(err) => match err {
                CheckoutError::MissingAddress => "Please add a delivery address".to_string(),
                CheckoutError::MissingNetbankingMode => {
                    "Please choose UPI or bank transfer".to_string()
                }
                CheckoutError::EmptyCart => "Your cart is empty".to_string(),
                CheckoutError::ModeNotAllowed => {
                    "This payment option is not available for your cart".to_string()
                }
                CheckoutError::VerificationFailed => {
                    "Payment could not be verified".to_string()
                }
                CheckoutError::Gateway(_) => "Payment gateway is unavailable".to_string(),
                CheckoutError::Orders(_) => "Order service is unavailable".to_string(),
            },
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
