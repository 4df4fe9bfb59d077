//! Mock Payment Provider
//!
//! For tests and local demos. Serves a fixed price catalog, hands out a fixed
//! session URL, and counts every call so tests can assert what was reached.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{PaymentError, Result};
use crate::provider::{HostedSession, PaymentProvider, PriceInfo, SessionParams};

const DEFAULT_SESSION_URL: &str = "https://checkout.example/session";

/// In-memory provider with a static price catalog
pub struct MockPaymentProvider {
    prices: HashMap<String, bool>,
    session_url: Option<String>,
    fail_sessions: bool,
    price_lookups: AtomicUsize,
    sessions_created: AtomicUsize,
    last_session: Mutex<Option<SessionParams>>,
}

impl Default for MockPaymentProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
            session_url: Some(DEFAULT_SESSION_URL.into()),
            fail_sessions: false,
            price_lookups: AtomicUsize::new(0),
            sessions_created: AtomicUsize::new(0),
            last_session: Mutex::new(None),
        }
    }

    /// Add a price to the catalog
    #[must_use]
    pub fn with_price(mut self, price_id: impl Into<String>, recurring: bool) -> Self {
        self.prices.insert(price_id.into(), recurring);
        self
    }

    /// URL returned by session creation (`None` simulates a session without one)
    #[must_use]
    pub fn with_session_url(mut self, url: Option<&str>) -> Self {
        self.session_url = url.map(str::to_owned);
        self
    }

    /// Make every session creation fail as if Stripe rejected it
    #[must_use]
    pub fn failing_sessions(mut self) -> Self {
        self.fail_sessions = true;
        self
    }

    pub fn price_lookups(&self) -> usize {
        self.price_lookups.load(Ordering::SeqCst)
    }

    pub fn sessions_created(&self) -> usize {
        self.sessions_created.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.price_lookups() + self.sessions_created()
    }

    /// Parameters of the most recent session request
    pub fn last_session(&self) -> Option<SessionParams> {
        self.last_session
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn retrieve_price(&self, price_id: &str) -> Result<PriceInfo> {
        self.price_lookups.fetch_add(1, Ordering::SeqCst);

        let recurring = self
            .prices
            .get(price_id)
            .copied()
            .ok_or_else(|| PaymentError::Provider(format!("No such price: '{price_id}'")))?;

        Ok(PriceInfo {
            id: price_id.to_owned(),
            recurring,
        })
    }

    async fn create_checkout_session(&self, params: SessionParams) -> Result<HostedSession> {
        let n = self.sessions_created.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut last) = self.last_session.lock() {
            *last = Some(params);
        }

        if self.fail_sessions {
            return Err(PaymentError::Provider(
                "Invalid API Key provided: sk_test_****".into(),
            ));
        }

        Ok(HostedSession {
            id: format!("cs_test_{n}"),
            url: self.session_url.clone(),
        })
    }

    fn name(&self) -> &str {
        "MockStripe"
    }
}
