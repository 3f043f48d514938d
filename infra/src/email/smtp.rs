//! SMTP email delivery

use async_trait::async_trait;
use lettre::message::{header, Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info};

use vf_core::{ChannelError, EmailChannel};
use vf_shared::mask_email;

use crate::config::EmailConfig;
use crate::InfrastructureError;

const PROVIDER: &str = "smtp";

/// Sends HTML email through an SMTP relay
pub struct SmtpEmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: EmailConfig,
}

impl SmtpEmailService {
    pub fn new(config: EmailConfig) -> Result<Self, InfrastructureError> {
        let transport = build_transport(&config)?;

        info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            tls = config.use_tls,
            "SMTP email service initialized"
        );

        Ok(Self { transport, config })
    }

    fn build_message(
        &self,
        sender: &str,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<Message, ChannelError> {
        let sender = if sender.is_empty() {
            self.config.from_address.as_str()
        } else {
            sender
        };
        let from: Mailbox = sender
            .parse()
            .map_err(|e| ChannelError::new(PROVIDER, format!("invalid sender address: {}", e)))?;
        let to: Mailbox = recipient.parse().map_err(|e| {
            ChannelError::new(PROVIDER, format!("invalid recipient address: {}", e))
        })?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_HTML)
                    .body(body.to_string()),
            )
            .map_err(|e| ChannelError::new(PROVIDER, format!("failed to build message: {}", e)))
    }
}

fn build_transport(
    config: &EmailConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, InfrastructureError> {
    let builder = if config.use_tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host).map_err(|e| {
            InfrastructureError::Email(format!("Failed to create SMTP transport: {}", e))
        })?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
    };

    let mut builder = builder
        .port(config.smtp_port)
        .timeout(Some(Duration::from_secs(config.timeout_secs)));

    if !config.smtp_username.is_empty() {
        builder = builder.credentials(Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        ));
    }

    Ok(builder.build())
}

#[async_trait]
impl EmailChannel for SmtpEmailService {
    async fn send(
        &self,
        sender: &str,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<Value, ChannelError> {
        let masked = mask_email(recipient);
        debug!(provider = PROVIDER, email = %masked, "Sending verification email");

        let message = self.build_message(sender, recipient, subject, body)?;

        let response = self.transport.send(message).await.map_err(|e| {
            error!(provider = PROVIDER, email = %masked, error = %e, "Failed to send email");
            ChannelError::new(PROVIDER, e.to_string())
        })?;

        let code = response.code().to_string();
        let reply: Vec<&str> = response.message().collect();
        info!(provider = PROVIDER, email = %masked, code = %code, "Email accepted by SMTP relay");

        Ok(json!({ "provider": PROVIDER, "code": code, "reply": reply.join(" ") }))
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}
