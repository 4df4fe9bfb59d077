//! HTTP Handlers

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};

use clawguru_payments::{CheckoutRedirect, CheckoutRequest, DiagnosticsSnapshot, PaymentError};

use crate::state::AppState;

const IDEMPOTENCY_KEY: &str = "idempotency-key";

fn header_value(headers: &HeaderMap, name: impl header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Health and configuration probe. Always 200.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<DiagnosticsSnapshot>) {
    (StatusCode::OK, Json(state.diagnostics.report()))
}

/// Create Stripe checkout session
pub async fn create_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CheckoutRedirect>, PaymentError> {
    let request = CheckoutRequest::parse(&body)
        .inspect_err(|e| tracing::debug!("Rejected checkout body: {}", e))?
        .with_origin(header_value(&headers, header::ORIGIN))
        .with_idempotency_key(header_value(&headers, IDEMPOTENCY_KEY));

    let redirect = state.checkout.create_checkout(request).await.map_err(|e| {
        if e.is_client_error() {
            tracing::warn!("Checkout refused: {}", e);
        } else {
            tracing::error!("Checkout error: {}", e);
        }
        e
    })?;

    Ok(Json(redirect))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, Response},
    };
    use clawguru_payments::{
        MockPaymentProvider, PaymentProvider, StorefrontConfig, RECURRING_EXPECTED_MESSAGE,
    };
    use tower::ServiceExt;

    use super::*;

    const PRO: &str = "price_pro_fixture";
    const TEAM: &str = "price_team_fixture";
    const DAYPASS: &str = "price_daypass_fixture";

    fn test_config(extra: &[(&'static str, &'static str)]) -> StorefrontConfig {
        let mut vars = vec![
            ("STRIPE_PRICE_PRO", PRO),
            ("STRIPE_PRICE_TEAM", TEAM),
            ("STRIPE_PRICE_DAYPASS", DAYPASS),
        ];
        vars.extend_from_slice(extra);
        StorefrontConfig::from_lookup(|name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        })
    }

    fn app_with(provider: &Arc<MockPaymentProvider>) -> axum::Router {
        let provider: Arc<dyn PaymentProvider> = provider.clone();
        crate::build_router(AppState::new(test_config(&[]), Some(provider)))
    }

    async fn post_checkout(app: axum::Router, body: &'static str) -> Response<Body> {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/checkout")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn json_body(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn checkout_daypass_returns_session_url() {
        let provider = Arc::new(
            MockPaymentProvider::new()
                .with_price(DAYPASS, false)
                .with_session_url(Some("https://checkout.example/abc")),
        );

        let response = post_checkout(app_with(&provider), r#"{"product":"daypass"}"#).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "url": "https://checkout.example/abc" })
        );
        assert_eq!(provider.sessions_created(), 1);
    }

    #[tokio::test]
    async fn checkout_empty_object_is_invalid_product() {
        let provider = Arc::new(MockPaymentProvider::new().with_price(PRO, true));

        let response = post_checkout(app_with(&provider), "{}").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Invalid product");
        assert_eq!(provider.total_calls(), 0);
    }

    #[tokio::test]
    async fn checkout_malformed_body_is_invalid_product() {
        let provider = Arc::new(MockPaymentProvider::new());

        for body in ["", "product=pro", "[1,2]", r#"{"product":null"#] {
            let response = post_checkout(app_with(&provider), body).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");
            assert_eq!(json_body(response).await["error"], "Invalid product");
        }
        assert_eq!(provider.total_calls(), 0);
    }

    #[tokio::test]
    async fn checkout_pro_with_one_time_price_is_mismatch() {
        let provider = Arc::new(MockPaymentProvider::new().with_price(PRO, false));

        let response = post_checkout(app_with(&provider), r#"{"product":"pro"}"#).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], RECURRING_EXPECTED_MESSAGE);
        assert_eq!(provider.sessions_created(), 0);
    }

    #[tokio::test]
    async fn checkout_provider_failure_is_generic() {
        let provider = Arc::new(
            MockPaymentProvider::new()
                .with_price(TEAM, true)
                .failing_sessions(),
        );

        let response = post_checkout(app_with(&provider), r#"{"product":"team"}"#).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Checkout failed" }));
    }

    #[tokio::test]
    async fn checkout_without_stripe_is_internal_error() {
        let app = crate::build_router(AppState::new(test_config(&[]), None));

        let response = post_checkout(app, r#"{"product":"pro"}"#).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn checkout_uses_origin_and_idempotency_headers() {
        let provider = Arc::new(MockPaymentProvider::new().with_price(TEAM, true));

        let response = app_with(&provider)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/stripe/checkout")
                    .header("origin", "https://clawguru.example")
                    .header("idempotency-key", "abc-123")
                    .body(Body::from(r#"{"product":"team"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let params = provider.last_session().unwrap();
        assert_eq!(
            params.success_url,
            "https://clawguru.example/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(params.idempotency_key.as_deref(), Some("checkout:team:abc-123"));
    }

    #[tokio::test]
    async fn health_is_ok_with_nothing_configured() {
        let app = crate::build_router(AppState::new(StorefrontConfig::default(), None));

        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["env"]["stripe"]["keyMode"], "missing");
        assert!(body["siteUrl"].is_null());
    }

    #[tokio::test]
    async fn health_never_echoes_secrets() {
        let config = test_config(&[
            ("STRIPE_SECRET_KEY", "sk_test_fixture_secret"),
            ("ADMIN_PASSWORD", "hunter2-fixture"),
            ("ACCESS_TOKEN_SECRET", "token-fixture-secret"),
        ]);
        let app = crate::build_router(AppState::new(config, None));

        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        for secret in ["sk_test_fixture_secret", "hunter2-fixture", "token-fixture-secret"] {
            assert!(!text.contains(secret));
        }
        assert!(text.contains(r#""keyMode":"test""#));
    }
}
