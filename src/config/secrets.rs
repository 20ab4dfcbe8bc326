//! Secret handling utilities.
//!
//! Re-exports secrecy types and provides helpers for showing secrets
//! to an operator without printing them in full.

pub use secrecy::{ExposeSecret, SecretString};

/// Render a secret for display.
///
/// Empty secrets show as `(unset)`. Values longer than eight characters
/// keep their last four characters; anything shorter is fully masked.
pub fn mask(secret: &SecretString) -> String {
    let value = secret.expose_secret();
    if value.is_empty() {
        return "(unset)".to_string();
    }

    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }

    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

/// True when the secret holds a non-empty value.
pub fn is_set(secret: &SecretString) -> bool {
    !secret.expose_secret().is_empty()
}
