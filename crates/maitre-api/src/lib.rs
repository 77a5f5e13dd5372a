//! Inbound chat surface for the booking assistant.
//!
//! A thin axum layer over the dialogue engine: one chat endpoint plus
//! health and upstream-status probes. All conversational behavior lives in
//! `maitre-dialog`; this crate only translates between HTTP and replies.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
