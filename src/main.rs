mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod config;
mod error;

use std::net::SocketAddr;
use axum::{Router, routing::get, response::Html};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;
use crate::api_docs::ApiDoc;
use crate::config::Config;
use crate::routes::api_routes::api_routes;
use crate::shared_state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,solar_estimator=debug")),
        )
        .init();

    // 1. Load configuration
    let config = match Config::load_from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    // 2. Initialize shared state
    let state = AppState::from_config(&config);
    tracing::info!(
        regions = state.tables.regions.len(),
        offline_mode = state.is_offline(),
        "reference data loaded"
    );

    // 3. Start Axum HTTP server
    let app = Router::new()
        .nest("/api", api_routes(state))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = match format!("{}:{}", config.server.host, config.server.port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(error = %e, host = %config.server.host, "invalid listen address");
            std::process::exit(1);
        }
    };
    tracing::info!("API server listening on http://{addr}");
    tracing::info!("Scalar UI: http://{addr}/scalar");

    if let Err(e) = axum_server::bind(addr).serve(app.into_make_service()).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
