//! Application State

use std::sync::Arc;

use clawguru_payments::{CheckoutService, DiagnosticsReporter, PaymentProvider, StorefrontConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Resolved once at start-up
    pub config: Arc<StorefrontConfig>,

    pub checkout: Arc<CheckoutService>,

    pub diagnostics: Arc<DiagnosticsReporter>,
}

impl AppState {
    /// `provider` is `None` when no Stripe key is configured
    pub fn new(config: StorefrontConfig, provider: Option<Arc<dyn PaymentProvider>>) -> Self {
        let config = Arc::new(config);

        Self {
            checkout: Arc::new(CheckoutService::new(config.clone(), provider)),
            diagnostics: Arc::new(DiagnosticsReporter::new(config.clone())),
            config,
        }
    }
}
