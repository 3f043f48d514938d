//! AWS SES email delivery
//!
//! Sends the verification link as a single HTML part through the SES v2
//! `SendEmail` call. The ack stored in the dispatch log carries the SES
//! message ID.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sesv2::config::Region;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client as SesClient;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info};

use vf_core::{ChannelError, EmailChannel};
use vf_shared::mask_email;

use crate::config::EmailConfig;
use crate::InfrastructureError;

const PROVIDER: &str = "aws-ses";
const CHARSET: &str = "UTF-8";

/// Sends HTML email through AWS SES
pub struct AwsSesEmailService {
    client: SesClient,
    config: EmailConfig,
}

impl AwsSesEmailService {
    pub async fn new(config: EmailConfig) -> Result<Self, InfrastructureError> {
        validate(&config)?;

        let credentials_provider = aws_credential_types::Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "vf_aws_ses_email_service",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials_provider)
            .load()
            .await;

        let client = SesClient::new(&aws_config);

        info!(region = %config.region, "AWS SES email service initialized");

        Ok(Self { client, config })
    }

    fn sender<'a>(&'a self, sender: &'a str) -> &'a str {
        if sender.is_empty() {
            &self.config.from_address
        } else {
            sender
        }
    }
}

fn validate(config: &EmailConfig) -> Result<(), InfrastructureError> {
    if config.access_key_id.is_empty() || config.secret_access_key.is_empty() {
        return Err(InfrastructureError::Config(
            "AWS SES credentials are required".to_string(),
        ));
    }
    if config.region.is_empty() {
        return Err(InfrastructureError::Config(
            "AWS_REGION is required for AWS SES".to_string(),
        ));
    }
    Ok(())
}

fn content(data: &str) -> Result<Content, ChannelError> {
    Content::builder()
        .data(data)
        .charset(CHARSET)
        .build()
        .map_err(|e| ChannelError::new(PROVIDER, format!("invalid message content: {}", e)))
}

fn email_content(subject: &str, body: &str) -> Result<EmailContent, ChannelError> {
    let message = Message::builder()
        .subject(content(subject)?)
        .body(Body::builder().html(content(body)?).build())
        .build();

    Ok(EmailContent::builder().simple(message).build())
}

#[async_trait]
impl EmailChannel for AwsSesEmailService {
    async fn send(
        &self,
        sender: &str,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<Value, ChannelError> {
        let masked = mask_email(recipient);
        let sender = self.sender(sender);
        if sender.is_empty() {
            return Err(ChannelError::new(PROVIDER, "no sender address configured"));
        }
        debug!(provider = PROVIDER, email = %masked, "Sending verification email");

        let request = self
            .client
            .send_email()
            .from_email_address(sender)
            .destination(Destination::builder().to_addresses(recipient).build())
            .content(email_content(subject, body)?)
            .send();

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let response = match tokio::time::timeout(timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!(provider = PROVIDER, email = %masked, error = %e, "Failed to send email via AWS SES");
                return Err(ChannelError::new(PROVIDER, e.to_string()));
            }
            Err(_) => {
                error!(provider = PROVIDER, email = %masked, "AWS SES request timed out");
                return Err(ChannelError::new(
                    PROVIDER,
                    format!("request timed out after {}s", self.config.timeout_secs),
                ));
            }
        };

        let message_id = response.message_id().unwrap_or("unknown").to_string();
        info!(
            provider = PROVIDER,
            email = %masked,
            message_id = %message_id,
            "Email sent via AWS SES"
        );

        Ok(json!({ "provider": PROVIDER, "message_id": message_id }))
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}
