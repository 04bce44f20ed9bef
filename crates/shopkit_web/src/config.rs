//! Shared service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `AUTHENTICATION_KEY` - HMAC signing key for bearer tokens (min 32 bytes)
//! - `AUTHENTICATION_ISSUER` - Expected token issuer
//! - `AUTHENTICATION_AUDIENCE` - Expected token audience
//!
//! ## Optional
//! - `AUTHENTICATION_VALIDATE_LIFETIME` - Check token expiry (default: true)
//! - `SERVICE_LOG_FILE` - File name prefix of the daily rolling log (default: console only)
//! - `SERVICE_LOG_DIR` - Directory of the rolling log (default: logs)
//! - `API_GATEWAY_HEADER` - Header the gateway stamps on forwarded requests (default: Api-Gateway)
//! - `API_GATEWAY_GUARD_ENABLED` - Reject requests without the gateway header (default: false)
//! - `REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderName;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_AUTHENTICATION_KEY_LENGTH: usize = 32;

const C_LOG_DIR_DEFAULT: &str = "logs";
const C_LOG_FILTER_DEFAULT: &str = "info";
const C_GATEWAY_HEADER_DEFAULT: &str = "Api-Gateway";
const N_REQUEST_TIMEOUT_SECS_DEFAULT: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Bearer token validation settings.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    /// Symmetric signing key.
    pub key: SecretString,
    /// Accepted `iss` claim.
    pub issuer: String,
    /// Accepted `aud` claim.
    pub audience: String,
    /// Reject expired tokens and tokens without `exp`.
    pub validate_lifetime: bool,
}

/// Console and rolling-file log settings.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// File name prefix; `None` logs to the console only.
    pub file_prefix: Option<String>,
    /// Directory of the rolling log files.
    pub dir: PathBuf,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_prefix: None,
            dir: PathBuf::from(C_LOG_DIR_DEFAULT),
            default_filter: C_LOG_FILTER_DEFAULT.to_string(),
        }
    }
}

/// Gateway-only access settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Header whose presence marks a request as forwarded by the gateway.
    pub header_name: HeaderName,
    /// Whether the guard is installed.
    pub enabled: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            header_name: HeaderName::from_static("api-gateway"),
            enabled: false,
        }
    }
}

/// Configuration shared by every service built on this library.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    pub jwt: JwtSettings,
    pub logging: LoggingConfig,
    pub gateway: GatewayConfig,
    pub request_timeout: Duration,
}

impl SharedConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the signing key is too short.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvSource(lookup);

        let key = env.required_secret("AUTHENTICATION_KEY")?;
        validate_authentication_key(&key, "AUTHENTICATION_KEY")?;
        let jwt = JwtSettings {
            key,
            issuer: env.required("AUTHENTICATION_ISSUER")?,
            audience: env.required("AUTHENTICATION_AUDIENCE")?,
            validate_lifetime: env.bool_or("AUTHENTICATION_VALIDATE_LIFETIME", true)?,
        };

        let logging = LoggingConfig {
            file_prefix: env.optional("SERVICE_LOG_FILE"),
            dir: env
                .optional("SERVICE_LOG_DIR")
                .map_or_else(|| PathBuf::from(C_LOG_DIR_DEFAULT), PathBuf::from),
            default_filter: C_LOG_FILTER_DEFAULT.to_string(),
        };

        let c_header = env.or_default("API_GATEWAY_HEADER", C_GATEWAY_HEADER_DEFAULT);
        let header_name = HeaderName::from_bytes(c_header.as_bytes()).map_err(|e| {
            ConfigError::InvalidEnvVar("API_GATEWAY_HEADER".to_string(), e.to_string())
        })?;
        let gateway = GatewayConfig {
            header_name,
            enabled: env.bool_or("API_GATEWAY_GUARD_ENABLED", false)?,
        };

        let n_timeout_secs = env
            .or_default(
                "REQUEST_TIMEOUT_SECS",
                &N_REQUEST_TIMEOUT_SECS_DEFAULT.to_string(),
            )
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        if n_timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "REQUEST_TIMEOUT_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            jwt,
            logging,
            gateway,
            request_timeout: Duration::from_secs(n_timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct EnvSource<F>(F);

impl<F> EnvSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn required_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        self.required(key).map(SecretString::from)
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        let Some(value) = self.optional(key) else {
            return Ok(default);
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got {other:?}"),
            )),
        }
    }
}

/// Validate that the signing key meets the HS256 minimum length.
fn validate_authentication_key(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_AUTHENTICATION_KEY_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} bytes (got {})",
                MIN_AUTHENTICATION_KEY_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}
