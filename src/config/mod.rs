//! Typed configuration from environment variables.
//!
//! Loads once at startup and never fails: every setting has a default, so
//! downstream code can treat each field as present. Credentials are wrapped
//! in secrecy::SecretString to prevent log leaks.

pub mod secrets;

use crate::error::{Error, Result};
use crate::model::Mode;
use secrecy::SecretString;

pub const ENV_AZURE_OPENAI_KEY: &str = "AZURE_OPENAI_KEY";
pub const ENV_AZURE_OPENAI_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_AZURE_OPENAI_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";
pub const ENV_AZURE_SEARCH_KEY: &str = "AZURE_SEARCH_KEY";
pub const ENV_AZURE_SEARCH_ENDPOINT: &str = "AZURE_SEARCH_ENDPOINT";
pub const ENV_COSMOSDB_CONNECTION: &str = "COSMOSDB_CONNECTION_STRING";
pub const ENV_USE_AZURE: &str = "USE_AZURE";
pub const ENV_ENVIRONMENT: &str = "NODE_ENV";
pub const ENV_OTEL_ENDPOINT: &str = "OTEL_ENDPOINT";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

pub const DEFAULT_DEPLOYMENT: &str = "gpt-35-turbo";
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug)]
pub struct Config {
    pub azure_openai_key: SecretString,
    pub azure_openai_endpoint: SecretString,
    pub azure_openai_deployment: String,
    pub azure_search_key: SecretString,
    pub azure_search_endpoint: SecretString,
    pub cosmosdb_connection: SecretString,
    /// Route queries through the Azure code path instead of the local echo.
    pub use_azure: bool,
    /// Deployment stage label. Failure details are only exposed in `development`.
    pub environment: String,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    /// In Azure, App Settings provide the vars.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration against an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
        let secret = |name: &str| SecretString::from(lookup(name).unwrap_or_default());

        Self {
            azure_openai_key: secret(ENV_AZURE_OPENAI_KEY),
            azure_openai_endpoint: secret(ENV_AZURE_OPENAI_ENDPOINT),
            azure_openai_deployment: var_or(ENV_AZURE_OPENAI_DEPLOYMENT, DEFAULT_DEPLOYMENT),
            azure_search_key: secret(ENV_AZURE_SEARCH_KEY),
            azure_search_endpoint: secret(ENV_AZURE_SEARCH_ENDPOINT),
            cosmosdb_connection: secret(ENV_COSMOSDB_CONNECTION),
            use_azure: var_or(ENV_USE_AZURE, "false").to_lowercase() == "true",
            environment: var_or(ENV_ENVIRONMENT, DEFAULT_ENVIRONMENT),
            otel_endpoint: lookup(ENV_OTEL_ENDPOINT).filter(|s| !s.is_empty()),
            log_level: var_or(ENV_LOG_LEVEL, DEFAULT_LOG_LEVEL),
        }
    }

    /// Check that the credentials needed by the current mode are present.
    ///
    /// Only strict validation in Azure mode can fail; demo mode needs no
    /// credentials. Missing names are reported in the order they are checked.
    pub fn validate(&self, strict: bool) -> Result<()> {
        if !(strict && self.use_azure) {
            return Ok(());
        }

        let required = [
            (ENV_AZURE_OPENAI_KEY, &self.azure_openai_key),
            (ENV_AZURE_OPENAI_ENDPOINT, &self.azure_openai_endpoint),
            (ENV_AZURE_SEARCH_KEY, &self.azure_search_key),
            (ENV_AZURE_SEARCH_ENDPOINT, &self.azure_search_endpoint),
        ];
        let missing: Vec<&'static str> = required
            .into_iter()
            .filter(|(_, value)| !secrets::is_set(value))
            .map(|(name, _)| name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingCredentials { missing })
        }
    }

    pub fn mode(&self) -> Mode {
        if self.use_azure { Mode::Azure } else { Mode::Demo }
    }

    pub fn is_development(&self) -> bool {
        self.environment == DEFAULT_ENVIRONMENT
    }
}
