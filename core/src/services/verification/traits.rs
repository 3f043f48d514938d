//! Notification channel seams
//!
//! The acknowledgment returned on success is provider-defined and stored
//! verbatim in the request's dispatch log.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ChannelError;

/// Delivers email messages
#[async_trait]
pub trait EmailChannel: Send + Sync {
    /// Send an HTML email
    async fn send(
        &self,
        sender: &str,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<Value, ChannelError>;

    /// Short provider name used in logs
    fn provider_name(&self) -> &str;
}

/// Delivers SMS messages
#[async_trait]
pub trait MobileChannel: Send + Sync {
    async fn send(&self, recipient: &str, body: &str) -> Result<Value, ChannelError>;

    /// Short provider name used in logs
    fn provider_name(&self) -> &str;
}
