//! Request creation and dispatch

use crate::domain::entities::{Channel, DispatchEntry, VerificationStatus};
use crate::errors::VerifierError;
use crate::repositories::VerificationStore;
use crate::services::verification::VerifierConfig;

use super::mocks::{harness, harness_with, test_config};

const EMAIL: &str = "hello@example.com";
const MOBILE: &str = "+919876543210";

#[tokio::test]
async fn test_new_request_mobile() {
    let h = harness();

    let request = h.verifier.new_request(Channel::Mobile, MOBILE).await.unwrap();

    assert_eq!(request.status, VerificationStatus::Pending);
    assert_eq!(request.secret.len(), 6);
    assert!(request.secret.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(
        request.secret_expiry - request.created_at,
        chrono::Duration::minutes(10)
    );
    assert!(request.sender.is_none());
    assert_eq!(h.store.len().await, 1);
}

#[tokio::test]
async fn test_new_request_email_uses_default_sender() {
    let h = harness();

    let request = h.verifier.new_request(Channel::Email, EMAIL).await.unwrap();

    assert_eq!(request.secret.len(), 256);
    assert!(request.secret.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(request.sender.as_deref(), Some("no-reply@example.com"));
    assert_eq!(
        request.secret_expiry - request.created_at,
        chrono::Duration::hours(12)
    );
}

#[tokio::test]
async fn test_invalid_recipient_has_no_side_effects() {
    let h = harness();

    assert_eq!(
        h.verifier.new_request(Channel::Email, "example.com").await,
        Err(VerifierError::InvalidEmail)
    );
    assert_eq!(
        h.verifier.new_mobile("919875").await,
        Err(VerifierError::InvalidMobileNumber)
    );

    assert!(h.store.is_empty().await);
    assert_eq!(h.mobile.count(), 0);
}

#[tokio::test]
async fn test_new_mobile_sends_default_body() {
    let h = harness();

    let request = h.verifier.new_mobile(MOBILE).await.unwrap();

    let body = h.mobile.last_body().unwrap();
    assert_eq!(
        body,
        format!(
            "{} is the OTP to verify your mobile number. It is valid only for 10 minutes.",
            request.secret
        )
    );
    assert_eq!(request.dispatch_log.len(), 1);
    assert!(request.dispatch_log[0].is_queued());
}

#[tokio::test]
async fn test_new_email_sends_callback_link() {
    let h = harness();

    let request = h.verifier.new_email(EMAIL, None).await.unwrap();

    let sent = h.email.last().unwrap();
    assert_eq!(sent.sender, "no-reply@example.com");
    assert_eq!(sent.recipient, EMAIL);
    assert_eq!(sent.subject, "Confirm your address");
    assert!(sent.body.contains(&format!(
        "https://example.com/verify?email=hello%40example.com&amp;secret={}",
        request.secret
    )));
    assert!(sent.body.contains("valid only for 12 hours"));
}

#[tokio::test]
async fn test_new_email_subject_fallback() {
    let h = harness_with(VerifierConfig {
        default_email_subject: String::new(),
        ..test_config()
    });

    h.verifier.new_email(EMAIL, Some("Welcome aboard")).await.unwrap();
    assert_eq!(h.email.last().unwrap().subject, "Welcome aboard");

    h.verifier.new_email(EMAIL, None).await.unwrap();
    assert_eq!(h.email.last().unwrap().subject, "Verify your email address");
}

#[tokio::test]
async fn test_new_email_with_bad_callback_url_creates_nothing() {
    let h = harness_with(VerifierConfig {
        email_callback_url: "not a url".to_string(),
        ..test_config()
    });

    let result = h.verifier.new_email(EMAIL, None).await;

    assert!(matches!(result, Err(VerifierError::InvalidCallbackUrl { .. })));
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_failed_dispatch_is_recorded_and_request_stays_pending() {
    let h = harness();
    h.mobile.set_failing(true);

    let result = h.verifier.new_mobile(MOBILE).await;

    match result {
        Err(VerifierError::Dispatch { channel, source }) => {
            assert_eq!(channel, Channel::Mobile);
            assert_eq!(source.provider, "mock-sms");
        }
        other => panic!("expected dispatch error, got {:?}", other),
    }

    let stored = h
        .store
        .read_last_pending(Channel::Mobile, MOBILE)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, VerificationStatus::Pending);
    assert_eq!(stored.dispatch_log.len(), 1);
    assert!(matches!(
        &stored.dispatch_log[0],
        DispatchEntry::Failed { reason, .. } if reason.contains("carrier rejected message")
    ));

    // Still verifiable if the message arrived anyway
    let verified = h
        .verifier
        .verify_mobile_secret(MOBILE, &stored.secret)
        .await
        .unwrap();
    assert_eq!(verified.status, VerificationStatus::Verified);
}

#[tokio::test]
async fn test_with_request_requires_body() {
    let h = harness();
    let request = h.verifier.new_request(Channel::Email, EMAIL).await.unwrap();

    assert_eq!(
        h.verifier
            .new_email_with_request(request.clone(), None, "   ")
            .await,
        Err(VerifierError::EmptyEmailBody)
    );
    assert_eq!(h.email.count(), 0);

    let sent = h
        .verifier
        .new_email_with_request(request, Some("Custom"), "<p>custom body</p>")
        .await
        .unwrap();
    assert_eq!(sent.dispatch_log.len(), 1);
    assert_eq!(h.email.last().unwrap().body, "<p>custom body</p>");

    let mobile = h.verifier.new_request(Channel::Mobile, MOBILE).await.unwrap();
    assert_eq!(
        h.verifier.new_mobile_with_request(mobile, "").await,
        Err(VerifierError::EmptySmsBody)
    );
}

#[tokio::test]
async fn test_with_request_checks_channel() {
    let h = harness();
    let request = h.verifier.new_request(Channel::Mobile, MOBILE).await.unwrap();

    assert_eq!(
        h.verifier
            .new_email_with_request(request, None, "body")
            .await,
        Err(VerifierError::ChannelMismatch {
            expected: Channel::Email,
            actual: Channel::Mobile,
        })
    );
}

#[tokio::test]
async fn test_resend_appends_dispatch_and_keeps_secret() {
    let h = harness();
    h.mobile.set_failing(true);
    let _ = h.verifier.new_mobile(MOBILE).await;
    h.mobile.set_failing(false);

    let resent = h.verifier.resend(Channel::Mobile, MOBILE).await.unwrap();

    assert_eq!(resent.dispatch_log.len(), 2);
    assert!(!resent.dispatch_log[0].is_queued());
    assert!(resent.dispatch_log[1].is_queued());
    assert!(h.mobile.last_body().unwrap().starts_with(&resent.secret));
    assert_eq!(h.store.len().await, 1);
}

#[tokio::test]
async fn test_resend_without_pending_request() {
    let h = harness();

    assert_eq!(
        h.verifier.resend(Channel::Email, EMAIL).await,
        Err(VerifierError::NotFound {
            channel: Channel::Email
        })
    );
}

#[tokio::test]
async fn test_resend_refuses_expired_secret() {
    let h = harness();
    let mut request = h.verifier.new_mobile(MOBILE).await.unwrap();
    request.secret_expiry = chrono::Utc::now() - chrono::Duration::minutes(1);
    let id = request.id.clone();
    h.store.update(&id, request).await.unwrap();

    assert_eq!(
        h.verifier.resend(Channel::Mobile, MOBILE).await,
        Err(VerifierError::SecretExpired)
    );
    assert_eq!(h.mobile.count(), 1);
}

#[tokio::test]
async fn test_dispatch_refuses_terminal_request() {
    let h = harness();
    let request = h.verifier.new_mobile(MOBILE).await.unwrap();
    let verified = h
        .verifier
        .verify_mobile_secret(MOBILE, &request.secret)
        .await
        .unwrap();

    assert_eq!(
        h.verifier.dispatch(verified, None, "again").await,
        Err(VerifierError::NotPending {
            status: VerificationStatus::Verified
        })
    );
}

#[tokio::test]
async fn test_dispatching_stale_copy_keeps_stored_attempts() {
    let h = harness();
    let first = h.verifier.new_request(Channel::Mobile, MOBILE).await.unwrap();
    h.verifier
        .new_mobile_with_request(first.clone(), "your code")
        .await
        .unwrap();

    for _ in 0..3 {
        assert_eq!(
            h.verifier.verify_mobile_secret(MOBILE, "wrong").await,
            Err(VerifierError::InvalidSecret)
        );
    }

    let resent = h
        .verifier
        .new_mobile_with_request(first.clone(), "code again")
        .await
        .unwrap();
    assert_eq!(resent.attempts, 3);
    assert_eq!(resent.dispatch_log.len(), 2);

    let stored = h.store.find_by_id(&first.id).await.unwrap().unwrap();
    assert_eq!(stored.attempts, 3);

    // Budget is still spent, even with the right secret
    assert_eq!(
        h.verifier.verify_mobile_secret(MOBILE, &first.secret).await,
        Err(VerifierError::MaximumAttemptsExceeded)
    );
}

#[tokio::test]
async fn test_dispatch_ignores_caller_changes_to_secret() {
    let h = harness();
    let request = h.verifier.new_request(Channel::Mobile, MOBILE).await.unwrap();
    let original_secret = request.secret.clone();

    let mut tampered = request.clone();
    tampered.secret = "000000".to_string();
    tampered.recipient = "+15555550199".to_string();

    let sent = h
        .verifier
        .new_mobile_with_request(tampered, "your code")
        .await
        .unwrap();

    assert_eq!(sent.secret, original_secret);
    assert_eq!(sent.recipient, MOBILE);
    assert_eq!(h.mobile.sent.lock().unwrap()[0].0, MOBILE);
}

#[tokio::test]
async fn test_dispatch_unknown_request() {
    let h = harness();
    let request = crate::domain::entities::VerificationRequest::new(
        Channel::Email,
        EMAIL,
        "never-stored",
        chrono::Duration::minutes(5),
        chrono::Utc::now(),
    );

    assert_eq!(
        h.verifier.new_email_with_request(request, None, "body").await,
        Err(VerifierError::NotFound {
            channel: Channel::Email
        })
    );
    assert_eq!(h.email.count(), 0);
}

#[tokio::test]
async fn test_injected_generator_drives_secrets() {
    use crate::services::verification::SecretGenerator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let first = harness();
    let first_verifier = first
        .verifier
        .with_generator(SecretGenerator::from_rng(StdRng::seed_from_u64(42)));
    let second = harness();
    let second_verifier = second
        .verifier
        .with_generator(SecretGenerator::from_rng(StdRng::seed_from_u64(42)));

    let a = first_verifier.new_request(Channel::Mobile, MOBILE).await.unwrap();
    let b = second_verifier.new_request(Channel::Mobile, MOBILE).await.unwrap();

    assert_eq!(a.secret, b.secret);
    assert_eq!(a.secret.len(), 6);
}

#[tokio::test]
async fn test_email_callback_url() {
    let h = harness();

    let url = h
        .verifier
        .email_callback_url("hello@example.com", "a b!")
        .unwrap();

    assert_eq!(
        url,
        "https://example.com/verify?email=hello%40example.com&secret=a+b%21"
    );
}
