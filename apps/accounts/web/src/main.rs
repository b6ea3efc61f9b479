use axum::middleware;
use axum_helpers::{create_app, health_router, security_headers};
use core_config::tracing::{init_tracing, install_color_eyre};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

mod client;
mod config;
mod controllers;
mod forms;
mod views;

use client::ApiClient;
use config::Config;
use views::Views;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let client = ApiClient::new(config.api_base_url.clone(), config.api_timeout)
        .map_err(|e| eyre::eyre!("Failed to build API client: {}", e))?;

    info!(api = %config.api_base_url, "Using accounts API");

    let views = Views::new()?;

    let app = controllers::router(client, views)
        .merge(health_router(config.app.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    create_app(app, &config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Accounts web shutdown complete");
    Ok(())
}
