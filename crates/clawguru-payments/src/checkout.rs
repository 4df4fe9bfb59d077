//! Checkout Orchestration
//!
//! Turns a product request into a hosted Stripe Checkout URL. The configured
//! price is classified first; a price whose billing nature disagrees with
//! the tier (one-time for pro/team, recurring for the day pass) is refused
//! before any session is opened.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::classifier::PriceClassifier;
use crate::config::StorefrontConfig;
use crate::error::{PaymentError, Result};
use crate::product::ProductTier;
use crate::provider::{PaymentProvider, SessionParams};

/// Request to create a checkout session
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CheckoutRequest {
    /// Raw product value from the client, validated by the orchestrator
    #[serde(default)]
    pub product: Option<String>,

    /// `Origin` header of the request
    #[serde(skip)]
    pub origin: Option<String>,

    /// Client-supplied `Idempotency-Key` header
    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

impl CheckoutRequest {
    pub fn for_product(product: impl Into<String>) -> Self {
        Self {
            product: Some(product.into()),
            ..Default::default()
        }
    }

    /// Parse a JSON request body. A body that does not deserialize, including
    /// a non-string `product`, fails here rather than as an invalid product.
    pub fn parse(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| PaymentError::MalformedBody(e.to_string()))
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Option<String>) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_idempotency_key(mut self, key: Option<String>) -> Self {
        self.idempotency_key = key.filter(|k| !k.is_empty());
        self
    }
}

/// Where to send the buyer
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckoutRedirect {
    pub url: String,
}

/// Checkout orchestrator
pub struct CheckoutService {
    config: Arc<StorefrontConfig>,
    provider: Option<Arc<dyn PaymentProvider>>,
}

impl CheckoutService {
    /// `provider` is `None` when Stripe is not configured; every valid
    /// request then fails as an internal error.
    pub fn new(config: Arc<StorefrontConfig>, provider: Option<Arc<dyn PaymentProvider>>) -> Self {
        Self { config, provider }
    }

    pub const fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Create a hosted checkout session for the requested tier
    pub async fn create_checkout(&self, request: CheckoutRequest) -> Result<CheckoutRedirect> {
        let tier = ProductTier::parse(request.product.as_deref())?;

        let provider = self
            .provider
            .clone()
            .ok_or_else(|| PaymentError::Config("Stripe is not configured".into()))?;

        let price_id = self.config.price_for(tier);
        let expected = tier.billing_mode();

        let actual = PriceClassifier::new(provider.clone())
            .classify(price_id)
            .await?;

        if actual != expected {
            tracing::warn!(
                product = %tier,
                price_id,
                expected = %expected,
                actual = %actual,
                "Configured price does not match product billing mode"
            );
            return Err(PaymentError::ModeMismatch {
                tier,
                price: price_id.to_owned(),
                expected,
                actual,
            });
        }

        let origin = self.config.redirect_origin(request.origin.as_deref());
        let params = session_params(
            tier,
            price_id,
            origin,
            request.idempotency_key.as_deref(),
        );

        let session = provider.create_checkout_session(params).await?;
        let url = session
            .url
            .ok_or_else(|| PaymentError::Provider("No checkout URL returned".into()))?;

        tracing::info!(
            provider = provider.name(),
            session_id = %session.id,
            product = %tier,
            mode = %expected,
            "Created checkout session"
        );

        Ok(CheckoutRedirect { url })
    }
}

fn session_params(
    tier: ProductTier,
    price_id: &str,
    origin: &str,
    idempotency_key: Option<&str>,
) -> SessionParams {
    let metadata: HashMap<String, String> =
        HashMap::from([("product".to_string(), tier.as_str().to_string())]);

    SessionParams {
        mode: tier.billing_mode(),
        price_id: price_id.to_owned(),
        quantity: 1,
        success_url: format!("{origin}/success?session_id={{CHECKOUT_SESSION_ID}}"),
        cancel_url: format!("{origin}/pricing?canceled=1"),
        allow_promotion_codes: true,
        sub_resource_metadata: metadata.clone(),
        metadata,
        idempotency_key: idempotency_key.map(|key| format!("checkout:{tier}:{key}")),
    }
}
