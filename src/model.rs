//! Request and response shapes.
//!
//! A request is a farmer's query: free text plus an optional language and
//! farmer identifier. A response reports success or failure and echoes the
//! normalized request back alongside the operating mode.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_FARMER_ID: &str = "anonymous";

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Which code path a query is routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// External Azure services. Integration is not wired up yet.
    Azure,
    /// Local echo, needs no credentials.
    Demo,
}

impl Mode {
    /// Wire value, as serialized in responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Azure => "azure",
            Mode::Demo => "demo",
        }
    }

    /// Capitalized wire value, as printed by the CLI.
    pub fn label(self) -> String {
        let mut chars = self.as_str().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Incoming query. Every field is optional at the schema level; the handler
/// applies defaults and rejects empty text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub text: Option<String>,
    pub language: Option<String>,
    pub farmer_id: Option<FarmerId>,
}

/// Farmer identifier. Usually a string, but any JSON value is accepted
/// and echoed back in the shape it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FarmerId {
    Text(String),
    Other(serde_json::Value),
}

impl Default for FarmerId {
    fn default() -> Self {
        FarmerId::Text(DEFAULT_FARMER_ID.to_string())
    }
}

impl std::fmt::Display for FarmerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FarmerId::Text(s) => write!(f, "{s}"),
            FarmerId::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for FarmerId {
    fn from(s: &str) -> Self {
        FarmerId::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Outgoing response. Failure responses carry `error` (and `details` in
/// development); success responses carry the normalized request fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer_id: Option<FarmerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
}

impl MessageResponse {
    pub fn success(
        message: impl Into<String>,
        language: impl Into<String>,
        farmer_id: FarmerId,
        mode: Mode,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            details: None,
            language: Some(language.into()),
            farmer_id: Some(farmer_id),
            mode: Some(mode),
        }
    }

    pub fn failure(
        error: impl Into<String>,
        message: impl Into<String>,
        details: Option<String>,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.into()),
            details,
            language: None,
            farmer_id: None,
            mode: None,
        }
    }
}
