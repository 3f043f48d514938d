//! SMS Service Module
//!
//! Mobile channel implementations for delivering OTPs:
//!
//! - **Mock Implementation**: Console output for development
//! - **AWS SNS**: Transactional SMS through SNS publish
//! - **Twilio**: SMS through the Twilio messages API
//!
//! Providers are called once per dispatch. Retrying is left to the caller.

use std::sync::Arc;

use vf_core::MobileChannel;

pub mod mock_sms;

// Twilio SMS service (feature-gated)
#[cfg(feature = "twilio-sms")]
pub mod twilio;

// AWS SNS SMS service (feature-gated)
#[cfg(feature = "aws-sns")]
pub mod aws_sns;

pub use mock_sms::MockSmsService;
pub use vf_shared::mask_phone_number;

#[cfg(feature = "twilio-sms")]
pub use twilio::{TwilioConfig, TwilioSmsService};

#[cfg(feature = "aws-sns")]
pub use aws_sns::{AwsSnsConfig, AwsSnsSmsService};

use crate::config::SmsConfig;
use crate::InfrastructureError;


/// Maximum SMS body accepted by both SNS and Twilio
pub const MAX_SMS_LENGTH: usize = 1600;

/// Create the mobile channel named by `config.provider`
///
/// Unknown providers fall back to the mock with a warning. A known provider
/// that fails to initialise is an error.
pub async fn create_mobile_channel(
    config: &SmsConfig,
) -> Result<Arc<dyn MobileChannel>, InfrastructureError> {
    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockSmsService::new())),
        #[cfg(feature = "twilio-sms")]
        "twilio" => {
            let twilio_config = TwilioConfig {
                account_sid: config.api_key.clone(),
                auth_token: config.api_secret.clone(),
                from_number: config.from_number.clone(),
                request_timeout_secs: config.request_timeout_secs,
            };
            Ok(Arc::new(TwilioSmsService::new(twilio_config)?))
        }
        #[cfg(feature = "aws-sns")]
        "aws-sns" => {
            let aws_config = AwsSnsConfig {
                access_key_id: config.api_key.clone(),
                secret_access_key: config.api_secret.clone(),
                region: config.region.clone(),
                sender_id: Some(config.from_number.clone()).filter(|s| !s.is_empty()),
                sms_type: config.sms_type.clone(),
                request_timeout_secs: config.request_timeout_secs,
            };
            Ok(Arc::new(AwsSnsSmsService::new(aws_config).await?))
        }
        other => {
            tracing::warn!(
                provider = other,
                event = "sms_provider_unknown",
                "Unknown SMS provider, using mock implementation"
            );
            Ok(Arc::new(MockSmsService::new()))
        }
    }
}
