//! Message handler.
//!
//! A single linear pipeline: check the payload shape, read the typed request,
//! reject empty text, then echo the query back for the configured mode.
//! Everything that goes wrong along the way is a [`HandlerError`], and the
//! outer edge turns it into a failure [`MessageResponse`]. Nothing escapes
//! [`handle`].

use std::time::Instant;

use opentelemetry::KeyValue;
use serde::Deserialize;
use serde_json::Value;
use serde_json::error::Category;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::model::{DEFAULT_LANGUAGE, MessageRequest, MessageResponse, Mode};
use crate::telemetry::{invocation, metrics};

/// Message reported for failures that are not a validation rejection.
pub const PROCESSING_ERROR_MESSAGE: &str = "Error processing request";

/// Reasons a request could not be answered.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Invalid payload: expected JSON object")]
    InvalidPayload,

    #[error("Empty query text")]
    EmptyText,

    /// The payload was an object but a field had the wrong shape, or the
    /// raw body was not JSON at all.
    #[error("{0}")]
    Malformed(#[from] serde_json::Error),
}

impl HandlerError {
    /// Machine-readable code reported in the response `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            HandlerError::InvalidPayload => "INVALID_PAYLOAD",
            HandlerError::EmptyText => "EMPTY_TEXT",
            HandlerError::Malformed(e) => match e.classify() {
                Category::Io => "IO_ERROR",
                Category::Syntax => "SYNTAX_ERROR",
                Category::Data => "DATA_ERROR",
                Category::Eof => "EOF_ERROR",
            },
        }
    }

    /// Convert into the failure response shape.
    ///
    /// Failure text is only attached as `details` in development.
    pub fn into_response(self, config: &Config) -> MessageResponse {
        let code = self.code();
        match self {
            HandlerError::InvalidPayload | HandlerError::EmptyText => {
                MessageResponse::failure(code, self.to_string(), None)
            }
            HandlerError::Malformed(e) => {
                let details = config.is_development().then(|| e.to_string());
                MessageResponse::failure(code, PROCESSING_ERROR_MESSAGE, details)
            }
        }
    }
}

/// Handle a decoded JSON payload.
pub fn handle(payload: &Value, config: &Config) -> MessageResponse {
    respond(config, || process(payload, config))
}

/// Handle a raw request body. A body that is not valid JSON is reported
/// like any other processing failure.
pub fn handle_str(body: &str, config: &Config) -> MessageResponse {
    respond(config, || {
        let payload: Value = serde_json::from_str(body)?;
        process(&payload, config)
    })
}

/// Outer boundary: runs one invocation inside its span and converts any
/// error into a failure response.
fn respond<F>(config: &Config, f: F) -> MessageResponse
where
    F: FnOnce() -> Result<MessageResponse, HandlerError>,
{
    let mode = config.mode();
    let invocation_id = Uuid::new_v4();
    let span = invocation::start_invocation_span(&invocation_id, mode);
    let _entered = span.enter();
    let started = Instant::now();

    let response = match f() {
        Ok(response) => response,
        Err(e) => {
            warn!(error = e.code(), "request rejected");
            if config.is_development() {
                debug!(reason = %e, "rejection reason");
            }
            e.into_response(config)
        }
    };

    let outcome = response.error.as_deref().unwrap_or(invocation::OUTCOME_OK);
    invocation::record_outcome(&span, outcome);

    let labels = [
        KeyValue::new("mode", mode.to_string()),
        KeyValue::new("outcome", outcome.to_string()),
    ];
    metrics::requests_handled().add(1, &labels);
    metrics::request_duration_ms().record(started.elapsed().as_secs_f64() * 1000.0, &labels);

    response
}

fn process(payload: &Value, config: &Config) -> Result<MessageResponse, HandlerError> {
    if !payload.is_object() {
        return Err(HandlerError::InvalidPayload);
    }

    let request = MessageRequest::deserialize(payload)?;

    let text = request.text.as_deref().unwrap_or_default().trim();
    if text.is_empty() {
        return Err(HandlerError::EmptyText);
    }

    let language = request
        .language
        .as_deref()
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_lowercase();
    let farmer_id = request.farmer_id.unwrap_or_default();

    let mode = config.mode();
    let message = match mode {
        Mode::Azure => {
            // Search and completion backends are not connected yet.
            debug!(
                deployment = %config.azure_openai_deployment,
                "azure backend not connected, echoing query"
            );
            format!("[Azure Mode] Processing query: {text}")
        }
        Mode::Demo => format!("[Demo Mode] Received query from farmer {farmer_id}: {text}"),
    };

    info!(%language, farmer_id = %farmer_id, "query accepted");

    Ok(MessageResponse::success(message, language, farmer_id, mode))
}
