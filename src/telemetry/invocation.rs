//! Invocation span helpers.
//!
//! One span per handled request, tagged with a fresh invocation id and the
//! operating mode. The outcome is recorded once the response is built.

use tracing::Span;
use uuid::Uuid;

use crate::model::Mode;

/// Outcome recorded for a successful invocation. Failures record their
/// error code instead.
pub const OUTCOME_OK: &str = "ok";

/// Start a span for a single handler invocation.
///
/// The `invocation.outcome` field is declared empty and filled in via
/// [`record_outcome`].
pub fn start_invocation_span(invocation_id: &Uuid, mode: Mode) -> Span {
    tracing::info_span!(
        "agrosense.handle",
        "invocation.id" = %invocation_id,
        "invocation.mode" = %mode,
        "invocation.outcome" = tracing::field::Empty,
    )
}

/// Record the invocation outcome on the span.
pub fn record_outcome(span: &Span, outcome: &str) {
    span.record("invocation.outcome", outcome);
}
