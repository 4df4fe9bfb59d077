//! # clawguru-payments
//!
//! Checkout orchestration and configuration diagnostics for the ClawGuru
//! storefront.
//!
//! ## Checkout flow
//!
//! ```text
//! ┌─────────────┐   ┌───────────────┐   ┌──────────────────┐   ┌───────────────┐
//! │  Pricing    │──▶│  Checkout     │──▶│ Price Classifier │──▶│ Stripe Hosted │
//! │  page (POST)│   │  Service      │   │ (recurring?)     │   │ Checkout Page │
//! └─────────────┘   └───────────────┘   └──────────────────┘   └───────────────┘
//!                          │ mismatch
//!                          ▼
//!                   400 + diagnostic
//! ```
//!
//! Pro and Team are subscriptions, the Day Pass is a one-time charge. The
//! configured Stripe price for each tier is looked up before the session is
//! created; if Stripe says it bills the other way, no session is created.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use clawguru_payments::{CheckoutRequest, CheckoutService, StorefrontConfig, StripeClient};
//!
//! let config = Arc::new(StorefrontConfig::from_env());
//! let stripe = StripeClient::from_config(&config)?;
//! let checkout = CheckoutService::new(config, Some(Arc::new(stripe)));
//!
//! let redirect = checkout
//!     .create_checkout(CheckoutRequest::for_product("daypass"))
//!     .await?;
//!
//! // Redirect user to: redirect.url
//! ```

mod checkout;
mod classifier;
mod config;
mod diagnostics;
mod error;
pub mod mock;
mod product;
mod provider;
mod stripe_client;

pub use checkout::{CheckoutRedirect, CheckoutRequest, CheckoutService};
pub use classifier::PriceClassifier;
pub use config::{LOCAL_ORIGIN, PriceSetting, PriceTable, StorefrontConfig};
pub use diagnostics::{DiagnosticsReporter, DiagnosticsSnapshot, KeyMode};
pub use error::{
    ONE_TIME_EXPECTED_MESSAGE, PaymentError, RECURRING_EXPECTED_MESSAGE, Result,
};
pub use mock::MockPaymentProvider;
pub use product::{BillingMode, ProductTier};
pub use provider::{HostedSession, PaymentProvider, PriceInfo, SessionParams};
pub use stripe_client::StripeClient;
