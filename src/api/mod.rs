mod handlers;
mod https;

use crate::{
    config::{Config, Environment},
    media::{ApiExtractor, MediaService},
    payment::{PaymentService, StripeClient},
};
use anyhow::{Context, Result};
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub media: Arc<MediaService>,
    pub payments: Arc<PaymentService>,
    pub environment: Environment,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let extractor = ApiExtractor::new(
            &config.extractor_api_base,
            Duration::from_secs(config.extractor_timeout_secs),
        )
        .context("Failed to initialize extractor")?;

        if config.stripe_secret_key.is_none() {
            warn!(
                "No Stripe secret key configured for {} environment; payment endpoints will fail",
                config.environment
            );
        }

        let stripe = StripeClient::new(&config.stripe_api_base, config.stripe_secret_key.clone())
            .context("Failed to initialize Stripe client")?;

        Ok(Self {
            media: Arc::new(MediaService::new(Arc::new(extractor))),
            payments: Arc::new(PaymentService::new(
                Arc::new(stripe),
                config.redirect_urls(),
            )),
            environment: config.environment,
        })
    }
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health).post(handlers::health))
        .route("/api/download", post(handlers::download))
        .route("/api/checkout", post(handlers::checkout))
        .route("/api/verify", post(handlers::verify))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            https::redirect_to_https,
        ))
        .layer(cors())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let base_url = format!("http://localhost:{}", config.port);
    match config.environment {
        Environment::Production => info!("App running in PRODUCTION at {}", base_url),
        Environment::Test => info!("App running in TEST mode at {}", base_url),
        Environment::Development => info!("App running in DEVELOPMENT at {}", base_url),
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
