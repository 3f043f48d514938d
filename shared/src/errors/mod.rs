//! Shared error response structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Error body returned by every API endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (field errors, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Error codes used by the HTTP surface
pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INVALID_EMAIL: &str = "INVALID_EMAIL";
    pub const INVALID_MOBILE_NUMBER: &str = "INVALID_MOBILE_NUMBER";
    pub const EMPTY_BODY: &str = "EMPTY_BODY";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INVALID_SECRET: &str = "INVALID_SECRET";
    pub const SECRET_EXPIRED: &str = "SECRET_EXPIRED";
    pub const MAXIMUM_ATTEMPTS_EXCEEDED: &str = "MAXIMUM_ATTEMPTS_EXCEEDED";
    pub const DISPATCH_FAILED: &str = "DISPATCH_FAILED";
    pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}
