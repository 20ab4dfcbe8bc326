//! Error types for agrosense.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing environment variables: {}", .missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("telemetry error: {0}")]
    Telemetry(String),
}

pub type Result<T> = std::result::Result<T, Error>;
