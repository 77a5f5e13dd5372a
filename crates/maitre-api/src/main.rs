//! maitre-server: chat front-end for the restaurant booking API.

use std::path::PathBuf;

use tracing::info;

use maitre_api::{create_router, AppState};
use maitre_client::RestBookingApi;
use maitre_core::config::BookingApiConfig;
use maitre_core::{MaitreConfig, MaitreError};
use maitre_dialog::DialogEngine;

#[tokio::main]
async fn main() -> Result<(), MaitreError> {
    let config_path = std::env::var("MAITRE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("maitre.toml"));
    let config = MaitreConfig::load_or_default(&config_path);

    tracing_subscriber::fmt()
        .with_max_level(parse_level(&config.general.log_level))
        .init();

    let token = BookingApiConfig::token_from_env()?;
    let api = RestBookingApi::new(&config.api, token)?;
    let engine = DialogEngine::new(api, config.general.max_message_length);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(%addr, api_url = %config.api.base_url(), "starting maitre-server");

    let state = AppState::new(engine, config);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .await
        .map_err(MaitreError::Io)?;
    Ok(())
}

fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
