use vf_core::EmailChannel;

use crate::config::EmailConfig;
use crate::email::{create_email_channel, MockEmailService};

#[tokio::test]
async fn test_mock_email_captures_message() {
    let service = MockEmailService::with_options(false, false);

    let ack = service
        .send("no-reply@example.com", "hello@example.com", "Verify", "<p>link</p>")
        .await
        .unwrap();

    assert_eq!(ack["provider"], "mock-email");
    let outbox = service.outbox();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].subject, "Verify");
    assert_eq!(service.message_count(), 1);
}

#[tokio::test]
async fn test_mock_email_rejects_invalid_recipient() {
    let service = MockEmailService::with_options(false, false);

    let err = service
        .send("no-reply@example.com", "nobody", "Verify", "body")
        .await
        .unwrap_err();

    assert_eq!(err.provider, "mock-email");
    assert!(service.outbox().is_empty());
}

#[tokio::test]
async fn test_mock_email_failure_simulation() {
    let service = MockEmailService::with_options(false, true);

    assert!(service
        .send("a@example.com", "b@example.com", "s", "b")
        .await
        .is_err());
    assert_eq!(service.message_count(), 0);
}

#[tokio::test]
async fn test_create_email_channel() {
    let channel = create_email_channel(&EmailConfig::default()).await.unwrap();
    assert_eq!(channel.provider_name(), "mock-email");

    let fallback = create_email_channel(&EmailConfig {
        provider: "sendgrid".to_string(),
        ..Default::default()
    })
    .await
    .unwrap();
    assert_eq!(fallback.provider_name(), "mock-email");
}

#[cfg(feature = "aws-ses")]
#[tokio::test]
async fn test_aws_ses_requires_credentials() {
    let config = EmailConfig {
        provider: "aws-ses".to_string(),
        from_address: "no-reply@example.com".to_string(),
        ..Default::default()
    };

    assert!(create_email_channel(&config).await.is_err());
}
