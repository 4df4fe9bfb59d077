//! Configuration Diagnostics
//!
//! Presence report for the deployment's configuration. Reports whether each
//! secret is set and which Stripe environment the key belongs to; values are
//! never copied into the snapshot.

use chrono::{SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::sync::Arc;

use crate::config::StorefrontConfig;

/// Stripe environment implied by the secret key prefix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    Missing,
    Live,
    Test,
    /// Set, but not a recognised `sk_` key
    Present,
}

impl KeyMode {
    pub fn detect(key: Option<&str>) -> Self {
        match key {
            None | Some("") => Self::Missing,
            Some(k) if k.starts_with("sk_live_") => Self::Live,
            Some(k) if k.starts_with("sk_test_") => Self::Test,
            Some(_) => Self::Present,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeFlags {
    pub key_mode: KeyMode,
    pub has_price_pro: bool,
    pub has_price_team: bool,
    pub has_price_daypass: bool,
    pub has_webhook_secret: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct CopilotFlags {
    #[serde(rename = "hasOpenAIKey")]
    pub has_openai_key: bool,
    #[serde(rename = "hasGeminiKey")]
    pub has_gemini_key: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminFlags {
    pub has_admin_user: bool,
    pub has_admin_password: bool,
    pub has_admin_session_secret: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenFlags {
    pub has_access_token_secret: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvFlags {
    pub stripe: StripeFlags,
    pub copilot: CopilotFlags,
    pub admin: AdminFlags,
    pub access_token: AccessTokenFlags,
}

/// Body of the health probe
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsSnapshot {
    pub ok: bool,
    /// RFC 3339, UTC, millisecond precision
    pub now: String,
    pub site_url: Option<String>,
    pub env: EnvFlags,
}

/// Builds a fresh snapshot on each call
pub struct DiagnosticsReporter {
    config: Arc<StorefrontConfig>,
}

impl DiagnosticsReporter {
    pub fn new(config: Arc<StorefrontConfig>) -> Self {
        Self { config }
    }

    pub fn report(&self) -> DiagnosticsSnapshot {
        let c = &self.config;

        DiagnosticsSnapshot {
            ok: true,
            now: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            site_url: c.site_url.clone(),
            env: EnvFlags {
                stripe: StripeFlags {
                    key_mode: KeyMode::detect(c.stripe_key()),
                    has_price_pro: c.prices.pro.overridden,
                    has_price_team: c.prices.team.overridden,
                    has_price_daypass: c.prices.daypass.overridden,
                    has_webhook_secret: is_set(c.stripe_webhook_secret.as_ref()),
                },
                copilot: CopilotFlags {
                    has_openai_key: is_set(c.openai_api_key.as_ref()),
                    has_gemini_key: is_set(c.gemini_api_key.as_ref()),
                },
                admin: AdminFlags {
                    has_admin_user: c.admin_username.as_deref().is_some_and(|u| !u.is_empty()),
                    has_admin_password: is_set(c.admin_password.as_ref()),
                    has_admin_session_secret: is_set(c.admin_session_secret.as_ref()),
                },
                access_token: AccessTokenFlags {
                    has_access_token_secret: is_set(c.access_token_secret.as_ref()),
                },
            },
        }
    }
}

fn is_set(secret: Option<&SecretString>) -> bool {
    secret.is_some_and(|s| !s.expose_secret().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn reporter(vars: &[(&str, &str)]) -> DiagnosticsReporter {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let config = StorefrontConfig::from_lookup(|name| vars.get(name).cloned());
        DiagnosticsReporter::new(Arc::new(config))
    }

    #[test]
    fn test_key_mode_detection() {
        assert_eq!(KeyMode::detect(Some("sk_live_xxx")), KeyMode::Live);
        assert_eq!(KeyMode::detect(Some("sk_test_xxx")), KeyMode::Test);
        assert_eq!(KeyMode::detect(Some("rk_live_xxx")), KeyMode::Present);
        assert_eq!(KeyMode::detect(Some("")), KeyMode::Missing);
        assert_eq!(KeyMode::detect(None), KeyMode::Missing);
    }

    #[test]
    fn test_empty_environment() {
        let json = serde_json::to_value(reporter(&[]).report()).unwrap();

        assert_eq!(json["ok"], true);
        assert!(json["siteUrl"].is_null());
        assert_eq!(json["env"]["stripe"]["keyMode"], "missing");
        assert_eq!(json["env"]["stripe"]["hasPricePro"], false);
        assert_eq!(json["env"]["copilot"]["hasOpenAIKey"], false);
        assert_eq!(json["env"]["admin"]["hasAdminSessionSecret"], false);
        assert_eq!(json["env"]["accessToken"]["hasAccessTokenSecret"], false);
    }

    #[test]
    fn test_full_environment_never_leaks_values() {
        let secrets = [
            ("STRIPE_SECRET_KEY", "sk_live_topsecret1"),
            ("STRIPE_WEBHOOK_SECRET", "whsec_topsecret2"),
            ("OPENAI_API_KEY", "sk-proj-topsecret3"),
            ("GEMINI_API_KEY", "topsecret4"),
            ("ADMIN_USERNAME", "topsecret5"),
            ("ADMIN_PASSWORD", "topsecret6"),
            ("ADMIN_SESSION_SECRET", "topsecret7"),
            ("NEXTAUTH_SECRET", "topsecret8"),
            ("STRIPE_PRICE_PRO", "price_topsecret9"),
        ];
        let mut vars = secrets.to_vec();
        vars.push(("SITE_URL", "https://clawguru.example"));

        let snapshot = reporter(&vars).report();
        let body = serde_json::to_string(&snapshot).unwrap();

        for (_, value) in secrets {
            assert!(!body.contains(value), "leaked {value}");
        }

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["siteUrl"], "https://clawguru.example");
        assert_eq!(json["env"]["stripe"]["keyMode"], "live");
        assert_eq!(json["env"]["stripe"]["hasPricePro"], true);
        assert_eq!(json["env"]["stripe"]["hasPriceTeam"], false);
        assert_eq!(json["env"]["stripe"]["hasWebhookSecret"], true);
        assert_eq!(json["env"]["copilot"]["hasGeminiKey"], true);
        assert_eq!(json["env"]["admin"]["hasAdminUser"], true);
        assert_eq!(json["env"]["accessToken"]["hasAccessTokenSecret"], true);
    }

    #[test]
    fn test_timestamp_format() {
        let snapshot = reporter(&[]).report();
        assert!(snapshot.now.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&snapshot.now).is_ok());
        // yyyy-mm-ddThh:mm:ss.mmmZ
        assert_eq!(snapshot.now.len(), 24);
    }
}
