//! Application state shared across route handlers.

use std::sync::Arc;

use maitre_client::RestBookingApi;
use maitre_core::MaitreConfig;
use maitre_dialog::DialogEngine;

/// Shared state, cheap to clone into each handler task.
#[derive(Clone)]
pub struct AppState {
    /// The dialogue engine, wired to the live booking API.
    pub engine: Arc<DialogEngine<RestBookingApi>>,
    /// Application configuration (read-only after startup).
    pub config: Arc<MaitreConfig>,
    /// Client used by the upstream status probe.
    pub probe: reqwest::Client,
}

impl AppState {
    pub fn new(engine: DialogEngine<RestBookingApi>, config: MaitreConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            config: Arc::new(config),
            probe: reqwest::Client::new(),
        }
    }
}
