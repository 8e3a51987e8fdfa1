//! Application configuration

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// How the receiver answers deliveries that fail verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationMode {
    /// Reject unauthenticated deliveries with 401
    #[default]
    Enforce,
    /// Accept every delivery and log full signature detail
    Diagnostic,
}

impl VerificationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationMode::Enforce => "enforce",
            VerificationMode::Diagnostic => "diagnostic",
        }
    }
}

impl FromStr for VerificationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enforce" => Ok(VerificationMode::Enforce),
            "diagnostic" => Ok(VerificationMode::Diagnostic),
            other => Err(Error::Config(format!(
                "WEBHOOK_MODE must be 'enforce' or 'diagnostic', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for VerificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main application configuration
#[derive(Clone)]
pub struct Config {
    /// Shared HMAC secret, the `webhookSecret` of the alert subscription
    pub webhook_secret: String,
    pub mode: VerificationMode,
    pub host: String,
    pub port: u16,
    /// Emit logs as JSON lines instead of the human-readable format
    pub log_json: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("webhook_secret", &"<redacted>")
            .field("mode", &self.mode)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_json", &self.log_json)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let webhook_secret = lookup("KLINE_WEBHOOK_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::Config("KLINE_WEBHOOK_SECRET must be set to a non-empty value".to_string())
            })?;

        let mode = match lookup("WEBHOOK_MODE") {
            Some(m) => m.parse()?,
            None => VerificationMode::default(),
        };

        let port = match lookup("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| Error::Config(format!("PORT must be a port number, got '{}'", p)))?,
            None => 8000,
        };

        Ok(Self {
            webhook_secret,
            mode,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            log_json: lookup("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}
