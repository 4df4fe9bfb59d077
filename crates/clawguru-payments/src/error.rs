//! Payment Error Types

use thiserror::Error;

use crate::product::{BillingMode, ProductTier};

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Diagnostic shown when a subscription tier is backed by a one-time price.
pub const RECURRING_EXPECTED_MESSAGE: &str = "Dein Stripe-Preis ist ONE-TIME, aber PRO/TEAM erwartet ein Abo (Recurring). \
     Erstelle in Stripe einen Recurring Monthly Price und trage dessen price_... ID ein.";

/// Diagnostic shown when the day pass is backed by a recurring price.
pub const ONE_TIME_EXPECTED_MESSAGE: &str = "Dein Stripe-Preis ist RECURRING, aber DAYPASS erwartet ONE-TIME. \
     Erstelle einen One-time Price für den Day Pass und trage dessen price_... ID ein.";

/// Checkout-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Request body was not a JSON object
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Product tier missing or not one of pro/team/daypass
    #[error("Invalid product: {0:?}")]
    InvalidProduct(Option<String>),

    /// Configured price bills differently from what the tier expects
    #[error("Price {price} for {tier} is {actual}, expected {expected}")]
    ModeMismatch {
        tier: ProductTier,
        price: String,
        expected: BillingMode,
        actual: BillingMode,
    },

    /// Stripe API error (unreachable, unknown price, rejected session)
    #[error("Stripe error: {0}")]
    Provider(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Whether the caller sent something we refuse, as opposed to a server-side failure
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedBody(_) | Self::InvalidProduct(_) | Self::ModeMismatch { .. }
        )
    }

    /// Get user-facing message. Never includes provider detail.
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::MalformedBody(_) | Self::InvalidProduct(_) => "Invalid product",
            Self::ModeMismatch {
                expected: BillingMode::Subscription,
                ..
            } => RECURRING_EXPECTED_MESSAGE,
            Self::ModeMismatch {
                expected: BillingMode::OneTime,
                ..
            } => ONE_TIME_EXPECTED_MESSAGE,
            Self::Provider(_) | Self::Config(_) => "Checkout failed",
        }
    }
}

impl From<stripe::StripeError> for PaymentError {
    fn from(err: stripe::StripeError) -> Self {
        Self::Provider(err.to_string())
    }
}

#[cfg(feature = "axum-handlers")]
mod http {
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
        Json,
    };
    use serde::Serialize;

    use super::PaymentError;

    #[derive(Serialize)]
    struct ErrorBody {
        error: &'static str,
    }

    impl PaymentError {
        /// HTTP status for this error
        pub const fn status_code(&self) -> StatusCode {
            if self.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    impl IntoResponse for PaymentError {
        fn into_response(self) -> Response {
            let body = ErrorBody {
                error: self.user_message(),
            };
            (self.status_code(), Json(body)).into_response()
        }
    }
}
