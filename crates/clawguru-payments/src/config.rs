//! Storefront Configuration
//!
//! Everything the checkout and diagnostics paths read from the environment,
//! resolved once at start-up. A variable that is set but empty counts as unset.

use secrecy::{ExposeSecret, SecretString};

use crate::product::ProductTier;

/// Origin used for redirects when neither the request nor the config supplies one
pub const LOCAL_ORIGIN: &str = "http://localhost:3000";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_STATIC_DIR: &str = "static";

/// Seed price IDs used when no `STRIPE_PRICE_*` override is set
const FALLBACK_PRICE_PRO: &str = "price_1SyY02INFtiy8u5xA9v6IeVA";
const FALLBACK_PRICE_TEAM: &str = "price_1SyY1FINFtiy8u5xGhxFTkEe";
const FALLBACK_PRICE_DAYPASS: &str = "price_1SyZiaINFtiy8u5xSuvtlste";

/// A price ID and whether it came from the environment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceSetting {
    pub id: String,
    pub overridden: bool,
}

impl PriceSetting {
    fn fallback(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            overridden: false,
        }
    }

    fn resolve(override_id: Option<String>, fallback: Self) -> Self {
        override_id.map_or(fallback, |id| Self {
            id,
            overridden: true,
        })
    }
}

/// One price per product tier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceTable {
    pub pro: PriceSetting,
    pub team: PriceSetting,
    pub daypass: PriceSetting,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            pro: PriceSetting::fallback(FALLBACK_PRICE_PRO),
            team: PriceSetting::fallback(FALLBACK_PRICE_TEAM),
            daypass: PriceSetting::fallback(FALLBACK_PRICE_DAYPASS),
        }
    }
}

impl PriceTable {
    pub const fn get(&self, tier: ProductTier) -> &PriceSetting {
        match tier {
            ProductTier::Pro => &self.pro,
            ProductTier::Team => &self.team,
            ProductTier::Daypass => &self.daypass,
        }
    }
}

/// Storefront configuration
#[derive(Debug)]
pub struct StorefrontConfig {
    /// Public base URL of the site
    pub site_url: Option<String>,

    /// Stripe secret API key
    pub stripe_secret_key: Option<SecretString>,

    /// Price IDs per tier
    pub prices: PriceTable,

    pub stripe_webhook_secret: Option<SecretString>,
    pub openai_api_key: Option<SecretString>,
    pub gemini_api_key: Option<SecretString>,
    pub admin_username: Option<String>,
    pub admin_password: Option<SecretString>,
    pub admin_session_secret: Option<SecretString>,
    pub access_token_secret: Option<SecretString>,

    /// Listen address for the HTTP server
    pub bind_addr: String,

    /// Directory holding the prebuilt front-end
    pub static_dir: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            site_url: None,
            stripe_secret_key: None,
            prices: PriceTable::default(),
            stripe_webhook_secret: None,
            openai_api_key: None,
            gemini_api_key: None,
            admin_username: None,
            admin_password: None,
            admin_session_secret: None,
            access_token_secret: None,
            bind_addr: DEFAULT_BIND_ADDR.into(),
            static_dir: DEFAULT_STATIC_DIR.into(),
        }
    }
}

impl StorefrontConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let secret = |name: &str| var(name).map(SecretString::new);
        let defaults = PriceTable::default();

        Self {
            site_url: var("NEXT_PUBLIC_SITE_URL").or_else(|| var("SITE_URL")),
            stripe_secret_key: secret("STRIPE_SECRET_KEY"),
            prices: PriceTable {
                pro: PriceSetting::resolve(var("STRIPE_PRICE_PRO"), defaults.pro),
                team: PriceSetting::resolve(var("STRIPE_PRICE_TEAM"), defaults.team),
                daypass: PriceSetting::resolve(var("STRIPE_PRICE_DAYPASS"), defaults.daypass),
            },
            stripe_webhook_secret: secret("STRIPE_WEBHOOK_SECRET"),
            openai_api_key: secret("OPENAI_API_KEY"),
            gemini_api_key: secret("GEMINI_API_KEY"),
            admin_username: var("ADMIN_USERNAME"),
            admin_password: secret("ADMIN_PASSWORD"),
            admin_session_secret: secret("ADMIN_SESSION_SECRET"),
            access_token_secret: secret("ACCESS_TOKEN_SECRET")
                .or_else(|| secret("NEXTAUTH_SECRET")),
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            static_dir: var("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.into()),
        }
    }

    /// Price ID to charge for a tier. Existence is not checked here.
    pub fn price_for(&self, tier: ProductTier) -> &str {
        &self.prices.get(tier).id
    }

    /// Base URL for checkout redirects: request origin, then site URL, then localhost
    pub fn redirect_origin<'a>(&'a self, request_origin: Option<&'a str>) -> &'a str {
        request_origin
            .filter(|o| !o.is_empty())
            .or(self.site_url.as_deref())
            .unwrap_or(LOCAL_ORIGIN)
    }

    pub fn stripe_key(&self) -> Option<&str> {
        self.stripe_secret_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
    }
}
