//! Swapping the store or the channels must not change any lifecycle outcome

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use vf_core::{
    Channel, ChannelError, EmailChannel, InMemoryVerificationStore, MobileChannel, StoreError,
    VerificationRequest, VerificationStatus, VerificationStore, Verifier, VerifierConfig,
};

/// Store that keeps records serialized, the way a networked backend would
#[derive(Default)]
struct SerializedStore {
    rows: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl VerificationStore for SerializedStore {
    async fn create(&self, request: VerificationRequest) -> Result<VerificationRequest, StoreError> {
        let mut rows = self.rows.lock().await;
        rows.push((request.id.clone(), serde_json::to_string(&request)?));
        Ok(request)
    }

    async fn read_last_pending(
        &self,
        channel: Channel,
        recipient: &str,
    ) -> Result<Option<VerificationRequest>, StoreError> {
        let rows = self.rows.lock().await;
        for (_, raw) in rows.iter().rev() {
            let request: VerificationRequest = serde_json::from_str(raw)?;
            if request.channel == channel
                && request.recipient == recipient
                && request.status == VerificationStatus::Pending
            {
                return Ok(Some(request));
            }
        }
        Ok(None)
    }

    async fn update(
        &self,
        id: &str,
        request: VerificationRequest,
    ) -> Result<VerificationRequest, StoreError> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|(row_id, _)| row_id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        let stored: VerificationRequest = serde_json::from_str(&row.1)?;
        if stored.status.is_terminal() {
            return Err(StoreError::TerminalState {
                id: id.to_string(),
                status: stored.status,
            });
        }
        row.1 = serde_json::to_string(&request)?;
        Ok(request)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<VerificationRequest>, StoreError> {
        let rows = self.rows.lock().await;
        match rows.iter().find(|(row_id, _)| row_id == id) {
            Some((_, raw)) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }
}

/// Channel that only acknowledges
struct AckChannel;

#[async_trait]
impl EmailChannel for AckChannel {
    async fn send(&self, _: &str, _: &str, _: &str, _: &str) -> Result<Value, ChannelError> {
        Ok(json!("ok"))
    }

    fn provider_name(&self) -> &str {
        "ack"
    }
}

#[async_trait]
impl MobileChannel for AckChannel {
    async fn send(&self, _: &str, _: &str) -> Result<Value, ChannelError> {
        Ok(json!("ok"))
    }

    fn provider_name(&self) -> &str {
        "ack"
    }
}

/// Channel that records messages per recipient and returns a structured ack
#[derive(Default)]
struct RecordingChannel {
    inbox: std::sync::Mutex<HashMap<String, Vec<String>>>,
}

impl RecordingChannel {
    fn record(&self, recipient: &str, body: &str) -> Value {
        let mut inbox = self.inbox.lock().unwrap();
        let messages = inbox.entry(recipient.to_string()).or_default();
        messages.push(body.to_string());
        json!({ "provider": "recording", "message_id": messages.len() })
    }
}

#[async_trait]
impl EmailChannel for RecordingChannel {
    async fn send(&self, _: &str, recipient: &str, _: &str, body: &str) -> Result<Value, ChannelError> {
        Ok(self.record(recipient, body))
    }

    fn provider_name(&self) -> &str {
        "recording"
    }
}

#[async_trait]
impl MobileChannel for RecordingChannel {
    async fn send(&self, recipient: &str, body: &str) -> Result<Value, ChannelError> {
        Ok(self.record(recipient, body))
    }

    fn provider_name(&self) -> &str {
        "recording"
    }
}

type DynVerifier = Verifier<dyn VerificationStore, dyn EmailChannel, dyn MobileChannel>;

fn config() -> VerifierConfig {
    VerifierConfig {
        email_callback_url: "https://example.com/verify".to_string(),
        ..Default::default()
    }
}

async fn expire_latest(store: &dyn VerificationStore, channel: Channel, recipient: &str) {
    let mut request = store
        .read_last_pending(channel, recipient)
        .await
        .unwrap()
        .unwrap();
    request.secret_expiry = Utc::now() - Duration::seconds(1);
    let id = request.id.clone();
    store.update(&id, request).await.unwrap();
}

fn label<T>(result: &Result<T, vf_core::VerifierError>) -> String {
    match result {
        Ok(_) => "ok".to_string(),
        Err(err) => format!("{:?}", err),
    }
}

/// Runs the same lifecycle scenarios and records every observable outcome
async fn run_scenarios(
    store: Arc<dyn VerificationStore>,
    email: Arc<dyn EmailChannel>,
    mobile: Arc<dyn MobileChannel>,
) -> Vec<String> {
    let verifier: DynVerifier = Verifier::new(store.clone(), email, mobile, config());
    let mut outcomes = Vec::new();

    // Validation
    outcomes.push(label(&verifier.new_email("example.com", None).await));
    outcomes.push(label(&verifier.new_mobile("919875").await));

    // Happy path
    let request = verifier.new_email("hello@example.com", None).await.unwrap();
    outcomes.push(label(&verifier.verify_email_secret("hello@example.com", "nope").await));
    let verified = verifier
        .verify_email_secret("hello@example.com", &request.secret)
        .await;
    outcomes.push(label(&verified));
    outcomes.push(format!("{:?}/{}", verified.map(|r| r.status), request.dispatch_log.len()));
    outcomes.push(label(&verifier.verify_email_secret("hello@example.com", &request.secret).await));

    // Attempt budget
    let request = verifier.new_mobile("+14155550100").await.unwrap();
    for _ in 0..3 {
        outcomes.push(label(&verifier.verify_mobile_secret("+14155550100", "000000x").await));
    }
    outcomes.push(label(
        &verifier.verify_mobile_secret("+14155550100", &request.secret).await,
    ));
    let stored = store.find_by_id(&request.id).await.unwrap().unwrap();
    outcomes.push(format!("{:?}/{}", stored.status, stored.attempts));

    // Expiry
    let request = verifier.new_mobile("+14155550111").await.unwrap();
    expire_latest(store.as_ref(), Channel::Mobile, "+14155550111").await;
    outcomes.push(label(
        &verifier.verify_mobile_secret("+14155550111", &request.secret).await,
    ));

    // Resend
    verifier.new_mobile("+14155550122").await.unwrap();
    let resent = verifier.resend(Channel::Mobile, "+14155550122").await.unwrap();
    outcomes.push(format!("resent/{}", resent.dispatch_log.len()));

    outcomes
}

#[tokio::test]
async fn test_outcomes_do_not_depend_on_backends() {
    let baseline = run_scenarios(
        Arc::new(InMemoryVerificationStore::new()),
        Arc::new(AckChannel),
        Arc::new(AckChannel),
    )
    .await;

    let swapped_store = run_scenarios(
        Arc::new(SerializedStore::default()),
        Arc::new(AckChannel),
        Arc::new(AckChannel),
    )
    .await;

    let swapped_channels = run_scenarios(
        Arc::new(InMemoryVerificationStore::new()),
        Arc::new(RecordingChannel::default()),
        Arc::new(RecordingChannel::default()),
    )
    .await;

    let swapped_everything = run_scenarios(
        Arc::new(SerializedStore::default()),
        Arc::new(RecordingChannel::default()),
        Arc::new(RecordingChannel::default()),
    )
    .await;

    assert_eq!(
        baseline,
        vec![
            "InvalidEmail",
            "InvalidMobileNumber",
            "InvalidSecret",
            "ok",
            "Ok(Verified)/1",
            "NotFound { channel: Email }",
            "InvalidSecret",
            "InvalidSecret",
            "InvalidSecret",
            "MaximumAttemptsExceeded",
            "AttemptsExceeded/4",
            "SecretExpired",
            "resent/2",
        ]
    );
    assert_eq!(baseline, swapped_store);
    assert_eq!(baseline, swapped_channels);
    assert_eq!(baseline, swapped_everything);
}
