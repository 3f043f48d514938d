//! AWS SNS SMS Service Implementation
//!
//! Sends OTPs as transactional SMS through SNS publish. The ack stored in
//! the dispatch log carries the SNS message ID.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::{config::Region, types::MessageAttributeValue, Client as SnsClient};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{error, info};

use vf_core::{ChannelError, MobileChannel};
use vf_shared::mask_phone_number;

use super::MAX_SMS_LENGTH;
use crate::InfrastructureError;

const PROVIDER: &str = "aws-sns";

/// AWS SNS SMS service configuration
#[derive(Debug, Clone)]
pub struct AwsSnsConfig {
    /// AWS Access Key ID
    pub access_key_id: String,
    /// AWS Secret Access Key
    pub secret_access_key: String,
    /// AWS Region (e.g., "us-east-1")
    pub region: String,
    /// SMS sender ID (optional, may not be supported in all regions)
    pub sender_id: Option<String>,
    /// SMS type: "Transactional" or "Promotional"
    pub sms_type: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl AwsSnsConfig {
    pub fn validate(&self) -> Result<(), InfrastructureError> {
        if self.sms_type != "Transactional" && self.sms_type != "Promotional" {
            return Err(InfrastructureError::Config(
                "AWS_SNS_SMS_TYPE must be either 'Transactional' or 'Promotional'".to_string(),
            ));
        }
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            return Err(InfrastructureError::Config(
                "AWS SNS credentials are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// AWS SNS SMS service implementation
pub struct AwsSnsSmsService {
    client: SnsClient,
    config: AwsSnsConfig,
}

impl AwsSnsSmsService {
    /// Create a new AWS SNS SMS service
    pub async fn new(config: AwsSnsConfig) -> Result<Self, InfrastructureError> {
        config.validate()?;

        let credentials_provider = aws_credential_types::Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "vf_aws_sns_sms_service",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials_provider)
            .load()
            .await;

        let client = SnsClient::new(&aws_config);

        info!(
            region = %config.region,
            sender_id = ?config.sender_id,
            "AWS SNS SMS service initialized"
        );

        Ok(Self { client, config })
    }

    fn sms_attributes(&self) -> Result<HashMap<String, MessageAttributeValue>, ChannelError> {
        let mut attributes = HashMap::new();

        attributes.insert(
            "AWS.SNS.SMS.SMSType".to_string(),
            string_attribute(&self.config.sms_type)?,
        );
        if let Some(ref sender_id) = self.config.sender_id {
            attributes.insert(
                "AWS.SNS.SMS.SenderID".to_string(),
                string_attribute(sender_id)?,
            );
        }

        Ok(attributes)
    }
}

fn string_attribute(value: &str) -> Result<MessageAttributeValue, ChannelError> {
    MessageAttributeValue::builder()
        .data_type("String")
        .string_value(value)
        .build()
        .map_err(|e| ChannelError::new(PROVIDER, format!("invalid message attribute: {}", e)))
}

#[async_trait]
impl MobileChannel for AwsSnsSmsService {
    async fn send(&self, recipient: &str, body: &str) -> Result<Value, ChannelError> {
        let masked = mask_phone_number(recipient);

        if body.chars().count() > MAX_SMS_LENGTH {
            return Err(ChannelError::new(
                PROVIDER,
                format!("message exceeds maximum length of {} characters", MAX_SMS_LENGTH),
            ));
        }

        let request = self
            .client
            .publish()
            .phone_number(recipient)
            .message(body)
            .set_message_attributes(Some(self.sms_attributes()?))
            .send();

        let timeout = Duration::from_secs(self.config.request_timeout_secs);
        let response = match tokio::time::timeout(timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!(provider = PROVIDER, phone = %masked, error = %e, "Failed to send SMS via AWS SNS");
                return Err(ChannelError::new(PROVIDER, e.to_string()));
            }
            Err(_) => {
                error!(provider = PROVIDER, phone = %masked, "AWS SNS request timed out");
                return Err(ChannelError::new(
                    PROVIDER,
                    format!("request timed out after {}s", self.config.request_timeout_secs),
                ));
            }
        };

        let message_id = response.message_id().unwrap_or("unknown").to_string();
        info!(
            provider = PROVIDER,
            phone = %masked,
            message_id = %message_id,
            "SMS sent via AWS SNS"
        );

        Ok(json!({ "provider": PROVIDER, "message_id": message_id }))
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}
