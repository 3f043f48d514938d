use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use vf_core::{Channel, VerificationRequest, VerificationStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendEmailRequest {
    /// Address to verify; format is checked by the verifier
    #[validate(length(min = 3, max = 320))]
    pub email: String,

    /// Overrides the configured subject
    #[validate(length(min = 1, max = 255))]
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMobileRequest {
    /// Digits with an optional leading '+', e.g. "+15555550100"
    #[validate(length(min = 7, max = 25))]
    pub mobile: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResendRequest {
    pub channel: Channel,

    #[validate(length(min = 1, max = 320))]
    pub recipient: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyRequest {
    pub channel: Channel,

    #[validate(length(min = 1, max = 320))]
    pub recipient: String,

    #[validate(length(min = 1, max = 512))]
    pub secret: String,
}

/// Query string of the link embedded in verification emails
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmailCallbackQuery {
    #[validate(length(min = 3, max = 320))]
    pub email: String,

    #[validate(length(min = 1, max = 512))]
    pub secret: String,
}

/// Returned once a secret has been handed to the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationAcceptedResponse {
    pub request_id: String,
    pub channel: Channel,
    pub expires_at: DateTime<Utc>,
    pub message: String,
}

impl VerificationAcceptedResponse {
    pub fn from_request(request: &VerificationRequest, message: impl Into<String>) -> Self {
        Self {
            request_id: request.id.clone(),
            channel: request.channel,
            expires_at: request.secret_expiry,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResultResponse {
    pub request_id: String,
    pub channel: Channel,
    pub status: VerificationStatus,
    pub verified: bool,
}

impl From<&VerificationRequest> for VerificationResultResponse {
    fn from(request: &VerificationRequest) -> Self {
        Self {
            request_id: request.id.clone(),
            channel: request.channel,
            status: request.status,
            verified: request.status == VerificationStatus::Verified,
        }
    }
}
