//! Email Service Module
//!
//! Email channel implementations for delivering verification links:
//!
//! - **Mock Implementation**: Console output for development
//! - **SMTP**: Delivery through any SMTP relay via `lettre`
//! - **AWS SES**: Delivery through the SES v2 API

use std::sync::Arc;

use vf_core::EmailChannel;

pub mod mock_email;

#[cfg(feature = "smtp-email")]
pub mod smtp;

#[cfg(feature = "aws-ses")]
pub mod aws_ses;

pub use mock_email::MockEmailService;

#[cfg(feature = "smtp-email")]
pub use smtp::SmtpEmailService;

#[cfg(feature = "aws-ses")]
pub use aws_ses::AwsSesEmailService;

use crate::config::EmailConfig;
use crate::InfrastructureError;

#[cfg(test)]
mod tests;

/// Create the email channel named by `config.provider`
///
/// Unknown providers fall back to the mock with a warning. A known provider
/// that fails to initialise is an error.
pub async fn create_email_channel(
    config: &EmailConfig,
) -> Result<Arc<dyn EmailChannel>, InfrastructureError> {
    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockEmailService::new())),
        #[cfg(feature = "smtp-email")]
        "smtp" => Ok(Arc::new(SmtpEmailService::new(config.clone())?)),
        #[cfg(feature = "aws-ses")]
        "aws-ses" => Ok(Arc::new(AwsSesEmailService::new(config.clone()).await?)),
        other => {
            tracing::warn!(
                provider = other,
                event = "email_provider_unknown",
                "Unknown email provider, using mock implementation"
            );
            Ok(Arc::new(MockEmailService::new()))
        }
    }
}
