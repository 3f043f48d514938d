//! Mock email service that prints messages instead of sending them

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use vf_core::{validate_email, ChannelError, EmailChannel};
use vf_shared::mask_email;

const PROVIDER: &str = "mock-email";

/// A message captured by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEmail {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Mock email service for development and testing
#[derive(Clone)]
pub struct MockEmailService {
    message_count: Arc<AtomicU64>,
    simulate_failure: Arc<AtomicBool>,
    console_output: bool,
    outbox: Arc<Mutex<Vec<CapturedEmail>>>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: Arc::new(AtomicBool::new(simulate_failure)),
            console_output,
            outbox: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Messages accepted so far, oldest first
    pub fn outbox(&self) -> Vec<CapturedEmail> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailChannel for MockEmailService {
    async fn send(
        &self,
        sender: &str,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<Value, ChannelError> {
        let masked = mask_email(recipient);

        if validate_email(recipient).is_err() {
            return Err(ChannelError::new(
                PROVIDER,
                format!("invalid recipient {}", masked),
            ));
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(provider = PROVIDER, email = %masked, "Mock email service simulating failure");
            return Err(ChannelError::new(PROVIDER, "simulated email sending failure"));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.push(CapturedEmail {
                sender: sender.to_string(),
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
        }

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK EMAIL SERVICE - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("From: {}", sender);
            println!("To: {}", recipient);
            println!("Subject: {}", subject);
            println!("Message ID: {}", message_id);
            println!("{}", body);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "email_service",
            provider = PROVIDER,
            email = %masked,
            message_id = %message_id,
            message_count = count,
            "Mock email sent"
        );

        Ok(json!({ "provider": PROVIDER, "message_id": message_id }))
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}
