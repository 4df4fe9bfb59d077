//! ClawGuru storefront HTTP Server
//!
//! Axum-based server exposing the checkout and health endpoints. Everything
//! else is served from the prebuilt front-end directory.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clawguru_payments::{KeyMode, PaymentProvider, ProductTier, StorefrontConfig, StripeClient};

use crate::handlers::{create_checkout, health_check};
use crate::state::AppState;

fn build_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/checkout", post(create_checkout))
        // Legacy path still called by the front-end build
        .route("/api/stripe/checkout", post(create_checkout))
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::from_env();

    let provider: Option<Arc<dyn PaymentProvider>> = match StripeClient::from_config(&config) {
        Ok(client) => {
            let mode = KeyMode::detect(config.stripe_key());
            tracing::info!(key_mode = ?mode, "✓ Stripe configured");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!("⚠ Stripe not configured - checkout disabled: {}", e);
            tracing::warn!("  Set STRIPE_SECRET_KEY in .env");
            None
        }
    };

    for tier in ProductTier::ALL {
        let price = config.prices.get(tier);
        if !price.overridden {
            tracing::info!(product = %tier, price_id = %price.id, "Using fallback price");
        }
    }

    let addr = config.bind_addr.clone();
    let app = build_router(AppState::new(config, provider));

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 clawguru server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /api/health   - Health and configuration probe");
    tracing::info!("  POST /api/checkout - Create Stripe checkout");

    axum::serve(listener, app).await?;

    Ok(())
}
