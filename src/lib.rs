//! # agrosense
//!
//! Request handler for the AgroSense farmer assistant, shaped for an
//! Azure Functions deployment.
//!
//! Resolves configuration from environment variables, validates a JSON
//! query, and answers it in either Azure or demo mode. Search, model and
//! database backends are not connected yet; both modes echo the query.

pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod telemetry;
