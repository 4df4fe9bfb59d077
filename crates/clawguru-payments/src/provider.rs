//! Payment Provider Strategy Pattern
//!
//! The two calls the checkout path makes against the payment provider,
//! behind a trait so the orchestrator can run against Stripe or a fixture.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::product::BillingMode;

/// Price as seen by the provider's catalog
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceInfo {
    pub id: String,
    /// Price carries a recurring component
    pub recurring: bool,
}

/// Everything needed to open a hosted checkout session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionParams {
    pub mode: BillingMode,
    pub price_id: String,
    pub quantity: u64,
    pub success_url: String,
    pub cancel_url: String,
    pub allow_promotion_codes: bool,
    /// Tagged on the session itself
    pub metadata: HashMap<String, String>,
    /// Tagged on the subscription or payment intent, depending on `mode`
    pub sub_resource_metadata: HashMap<String, String>,
    pub idempotency_key: Option<String>,
}

/// Session returned by the provider
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostedSession {
    pub id: String,
    pub url: Option<String>,
}

/// Payment provider trait
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Look up a price by ID
    async fn retrieve_price(&self, price_id: &str) -> Result<PriceInfo>;

    /// Create a hosted checkout session
    async fn create_checkout_session(&self, params: SessionParams) -> Result<HostedSession>;

    /// Provider name, for logs
    fn name(&self) -> &str;
}
