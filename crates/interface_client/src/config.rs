//! Client configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use core_kernel::{Currency, DateLocale, Timezone};

use crate::error::ClientError;

/// Client configuration
///
/// Every field can be set from an `LMS_`-prefixed environment variable,
/// e.g. `LMS_API_BASE_URL`; unset fields keep their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the LMS REST API
    pub api_base_url: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// File the login session is persisted to
    pub session_path: PathBuf,
    /// IANA timezone used for "today"
    pub timezone: String,
    /// BCP-47 locale used to render dates
    pub locale: String,
    /// ISO 4217 currency of all fees
    pub currency: String,
    /// Log level
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            request_timeout_secs: 30,
            session_path: PathBuf::from(".fee-desk/session.json"),
            timezone: "Asia/Kolkata".to_string(),
            locale: "en-IN".to_string(),
            currency: "INR".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("LMS"))
            .build()?
            .try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parses the configured timezone
    pub fn business_timezone(&self) -> Result<Timezone, ClientError> {
        Ok(self.timezone.parse()?)
    }

    /// Parses the configured display locale
    pub fn date_locale(&self) -> Result<DateLocale, ClientError> {
        Ok(DateLocale::parse(&self.locale)?)
    }

    /// Parses the configured currency
    pub fn fee_currency(&self) -> Result<Currency, ClientError> {
        Ok(self.currency.parse()?)
    }
}
