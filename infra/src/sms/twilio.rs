//! Twilio SMS Service Implementation

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};
use twilio::{Client, OutboundMessage};

use vf_core::{ChannelError, MobileChannel};
use vf_shared::mask_phone_number;

use super::MAX_SMS_LENGTH;
use crate::InfrastructureError;

const PROVIDER: &str = "twilio";

/// Twilio SMS service configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// From phone number (must be a Twilio phone number)
    pub from_number: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl TwilioConfig {
    pub fn validate(&self) -> Result<(), InfrastructureError> {
        if self.account_sid.is_empty() || self.auth_token.is_empty() {
            return Err(InfrastructureError::Config(
                "Twilio account SID and auth token are required".to_string(),
            ));
        }
        if !self.from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "SMS_FROM_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }
        Ok(())
    }
}

/// Twilio SMS service implementation
pub struct TwilioSmsService {
    client: Client,
    config: TwilioConfig,
}

impl TwilioSmsService {
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        config.validate()?;
        let client = Client::new(&config.account_sid, &config.auth_token);

        info!(
            from = %mask_phone_number(&config.from_number),
            "Twilio SMS service initialized"
        );

        Ok(Self { client, config })
    }
}

#[async_trait]
impl MobileChannel for TwilioSmsService {
    async fn send(&self, recipient: &str, body: &str) -> Result<Value, ChannelError> {
        let masked = mask_phone_number(recipient);

        if body.chars().count() > MAX_SMS_LENGTH {
            return Err(ChannelError::new(
                PROVIDER,
                format!("message exceeds maximum length of {} characters", MAX_SMS_LENGTH),
            ));
        }

        let message = OutboundMessage::new(&self.config.from_number, recipient, body);
        let timeout = Duration::from_secs(self.config.request_timeout_secs);

        let response = match tokio::time::timeout(timeout, self.client.send_message(message)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!(provider = PROVIDER, phone = %masked, error = %e, "Failed to send SMS via Twilio");
                return Err(ChannelError::new(PROVIDER, e.to_string()));
            }
            Err(_) => {
                error!(provider = PROVIDER, phone = %masked, "Twilio request timed out");
                return Err(ChannelError::new(
                    PROVIDER,
                    format!("request timed out after {}s", self.config.request_timeout_secs),
                ));
            }
        };

        info!(provider = PROVIDER, phone = %masked, sid = %response.sid, "SMS sent via Twilio");

        Ok(json!({ "provider": PROVIDER, "sid": response.sid }))
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}
