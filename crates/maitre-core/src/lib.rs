pub mod config;
pub mod error;
pub mod types;

pub use config::MaitreConfig;
pub use error::{MaitreError, Result};
pub use types::*;
