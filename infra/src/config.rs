//! Configuration management for infrastructure services
//!
//! Handles:
//! - Store backend selection and its connection settings
//! - SMS provider credentials
//! - Email provider settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use vf_shared::config::{CacheConfig, DatabaseConfig};

use crate::InfrastructureError;

/// Where verification requests are stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Redis,
    #[serde(rename = "mysql")]
    MySql,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Redis => write!(f, "redis"),
            StoreBackend::MySql => write!(f, "mysql"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = InfrastructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis),
            "mysql" => Ok(StoreBackend::MySql),
            other => Err(InfrastructureError::Config(format!(
                "Unknown store backend: {}",
                other
            ))),
        }
    }
}

/// SMS service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    /// SMS service provider ("mock", "aws-sns", "twilio")
    pub provider: String,
    /// Account SID (Twilio) or access key ID (AWS)
    pub api_key: String,
    /// Auth token (Twilio) or secret access key (AWS)
    pub api_secret: String,
    /// Sending number (Twilio) or sender ID (AWS, optional)
    pub from_number: String,
    /// AWS region
    pub region: String,
    /// "Transactional" or "Promotional" (AWS)
    pub sms_type: String,
    /// Timeout for provider requests in seconds
    pub request_timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            api_key: String::new(),
            api_secret: String::new(),
            from_number: String::new(),
            region: "us-east-1".to_string(),
            sms_type: "Transactional".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Email service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Email provider ("mock", "smtp", "aws-ses")
    pub provider: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    /// Use STARTTLS; disable only for local relays
    pub use_tls: bool,
    /// Sender used when a request carries none
    pub from_address: String,
    /// Timeout for SMTP sessions and SES requests in seconds
    pub timeout_secs: u64,
    /// AWS access key ID (SES)
    pub access_key_id: String,
    /// AWS secret access key (SES)
    pub secret_access_key: String,
    /// AWS region (SES)
    pub region: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            use_tls: true,
            from_address: String::new(),
            timeout_secs: 30,
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: "us-east-1".to_string(),
        }
    }
}

/// Infrastructure configuration settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfrastructureConfig {
    pub store: StoreBackend,
    /// MySQL settings, used by the `mysql` store
    pub database: DatabaseConfig,
    /// Redis settings, used by the `redis` store
    pub cache: CacheConfig,
    pub sms: SmsConfig,
    pub email: EmailConfig,
}

impl InfrastructureConfig {
    /// Backends that lose data or never deliver, named for startup warnings
    pub fn development_backends(&self) -> Vec<&'static str> {
        let mut backends = Vec::new();
        if self.store == StoreBackend::Memory {
            backends.push("memory store");
        }
        if self.email.provider == "mock" {
            backends.push("mock email channel");
        }
        if self.sms.provider == "mock" {
            backends.push("mock mobile channel");
        }
        backends
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl SmsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env_or("SMS_PROVIDER", defaults.provider),
            api_key: env_or("SMS_API_KEY", defaults.api_key),
            api_secret: env_or("SMS_API_SECRET", defaults.api_secret),
            from_number: env_or("SMS_FROM_NUMBER", defaults.from_number),
            region: env_or("AWS_REGION", defaults.region),
            sms_type: env_or("AWS_SNS_SMS_TYPE", defaults.sms_type),
            request_timeout_secs: env_parse("SMS_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
        }
    }
}

impl EmailConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env_or("EMAIL_PROVIDER", defaults.provider),
            smtp_host: env_or("SMTP_HOST", defaults.smtp_host),
            smtp_port: env_parse("SMTP_PORT", defaults.smtp_port),
            smtp_username: env_or("SMTP_USERNAME", defaults.smtp_username),
            smtp_password: env_or("SMTP_PASSWORD", defaults.smtp_password),
            use_tls: env_parse("SMTP_USE_TLS", defaults.use_tls),
            from_address: env_or("EMAIL_FROM_ADDRESS", defaults.from_address),
            timeout_secs: env_parse("SMTP_TIMEOUT_SECS", defaults.timeout_secs),
            access_key_id: env_or("EMAIL_API_KEY", defaults.access_key_id),
            secret_access_key: env_or("EMAIL_API_SECRET", defaults.secret_access_key),
            region: env_or("AWS_REGION", defaults.region),
        }
    }
}

/// Load infrastructure configuration from the environment
///
/// A `.env` file is read first if present.
pub fn load_config() -> Result<InfrastructureConfig, InfrastructureError> {
    dotenvy::dotenv().ok();

    let store = match std::env::var("STORE_BACKEND") {
        Ok(value) => value.parse()?,
        Err(_) => StoreBackend::default(),
    };

    Ok(InfrastructureConfig {
        store,
        database: DatabaseConfig::from_env(),
        cache: CacheConfig::from_env(),
        sms: SmsConfig::from_env(),
        email: EmailConfig::from_env(),
    })
}
