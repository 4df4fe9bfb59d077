//! Price Classifier
//!
//! Asks the provider whether a price recurs.

use std::sync::Arc;

use crate::error::Result;
use crate::product::BillingMode;
use crate::provider::PaymentProvider;

pub struct PriceClassifier {
    provider: Arc<dyn PaymentProvider>,
}

impl PriceClassifier {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    /// Billing nature of a price. Provider errors pass through untouched.
    pub async fn classify(&self, price_id: &str) -> Result<BillingMode> {
        let price = self.provider.retrieve_price(price_id).await?;
        let mode = BillingMode::from_recurring(price.recurring);

        tracing::debug!(
            provider = self.provider.name(),
            price_id = %price.id,
            mode = %mode,
            "Classified price"
        );

        Ok(mode)
    }
}
