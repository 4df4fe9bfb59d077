//! Stripe Integration
//!
//! `PaymentProvider` backed by the Stripe API: price lookup and hosted
//! Checkout session creation.

use async_trait::async_trait;
use stripe::{
    CheckoutSession, CheckoutSessionCustomerCreation, CheckoutSessionMode, Client,
    CreateCheckoutSession, CreateCheckoutSessionLineItems, CreateCheckoutSessionPaymentIntentData,
    CreateCheckoutSessionSubscriptionData, Price, PriceId, RequestStrategy,
};

use crate::config::StorefrontConfig;
use crate::error::{PaymentError, Result};
use crate::product::BillingMode;
use crate::provider::{HostedSession, PaymentProvider, PriceInfo, SessionParams};

/// Stripe client wrapper
pub struct StripeClient {
    client: Client,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }

    /// Create from the storefront configuration
    pub fn from_config(config: &StorefrontConfig) -> Result<Self> {
        let secret_key = config
            .stripe_key()
            .ok_or_else(|| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;

        Ok(Self::new(secret_key))
    }
}

const fn checkout_mode(mode: BillingMode) -> CheckoutSessionMode {
    match mode {
        BillingMode::Subscription => CheckoutSessionMode::Subscription,
        BillingMode::OneTime => CheckoutSessionMode::Payment,
    }
}

/// Stripe request for a hosted session. Metadata goes on the session and on
/// the subscription or payment intent, whichever `mode` creates.
fn build_session_request(params: &SessionParams) -> CreateCheckoutSession<'_> {
    let mut request = CreateCheckoutSession::new();
    request.mode = Some(checkout_mode(params.mode));
    request.allow_promotion_codes = Some(params.allow_promotion_codes);
    request.customer_creation = Some(CheckoutSessionCustomerCreation::Always);
    request.success_url = Some(&params.success_url);
    request.cancel_url = Some(&params.cancel_url);
    request.metadata = Some(params.metadata.clone());
    request.line_items = Some(vec![CreateCheckoutSessionLineItems {
        price: Some(params.price_id.clone()),
        quantity: Some(params.quantity),
        ..Default::default()
    }]);

    let sub_metadata = Some(params.sub_resource_metadata.clone());
    match params.mode {
        BillingMode::Subscription => {
            request.subscription_data = Some(CreateCheckoutSessionSubscriptionData {
                metadata: sub_metadata,
                ..Default::default()
            });
        }
        BillingMode::OneTime => {
            request.payment_intent_data = Some(CreateCheckoutSessionPaymentIntentData {
                metadata: sub_metadata,
                ..Default::default()
            });
        }
    }

    request
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn retrieve_price(&self, price_id: &str) -> Result<PriceInfo> {
        let id = price_id
            .parse::<PriceId>()
            .map_err(|e| PaymentError::Provider(format!("Invalid price ID {price_id}: {e}")))?;

        let price = Price::retrieve(&self.client, &id, &[]).await?;

        Ok(PriceInfo {
            id: price.id.to_string(),
            recurring: price.recurring.is_some(),
        })
    }

    async fn create_checkout_session(&self, params: SessionParams) -> Result<HostedSession> {
        let request = build_session_request(&params);

        let session = match &params.idempotency_key {
            Some(key) => {
                let client = self
                    .client
                    .clone()
                    .with_strategy(RequestStrategy::Idempotent(key.clone()));
                CheckoutSession::create(&client, request).await?
            }
            None => CheckoutSession::create(&self.client, request).await?,
        };

        Ok(HostedSession {
            id: session.id.to_string(),
            url: session.url,
        })
    }

    fn name(&self) -> &str {
        "Stripe"
    }
}
