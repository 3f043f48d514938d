//! Mock SMS Service Implementation
//!
//! Logs SMS messages to the console instead of sending them.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use vf_core::{validate_mobile, ChannelError, MobileChannel};
use vf_shared::mask_phone_number;

const PROVIDER: &str = "mock-sms";

/// Mock SMS service for development and testing
///
/// This implementation:
/// - Prints messages to the console (OTPs included, never use in production)
/// - Rejects malformed numbers
/// - Generates mock message IDs
/// - Counts delivered messages
#[derive(Clone)]
pub struct MockSmsService {
    message_count: Arc<AtomicU64>,
    simulate_failure: Arc<AtomicBool>,
    console_output: bool,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Create a mock service with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: Arc::new(AtomicBool::new(simulate_failure)),
            console_output,
        }
    }

    /// Total number of messages accepted
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MobileChannel for MockSmsService {
    async fn send(&self, recipient: &str, body: &str) -> Result<Value, ChannelError> {
        let masked = mask_phone_number(recipient);

        if validate_mobile(recipient).is_err() {
            return Err(ChannelError::new(
                PROVIDER,
                format!("invalid phone number {}", masked),
            ));
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(provider = PROVIDER, phone = %masked, "Mock SMS service simulating failure");
            return Err(ChannelError::new(PROVIDER, "simulated SMS sending failure"));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK SMS SERVICE - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", recipient);
            println!("Message ID: {}", message_id);
            println!("Content: {}", body);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "sms_service",
            provider = PROVIDER,
            phone = %masked,
            message_id = %message_id,
            message_count = count,
            "Mock SMS sent"
        );

        Ok(json!({ "provider": PROVIDER, "message_id": message_id }))
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}
