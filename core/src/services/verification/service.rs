//! Verification lifecycle manager

use chrono::Utc;
use std::sync::Arc;

use vf_shared::mask_recipient;

use crate::domain::entities::{AttemptOutcome, Channel, DispatchEntry, VerificationRequest};
use crate::errors::{VerifierError, VerifierResult};
use crate::repositories::VerificationStore;

use super::config::VerifierConfig;
use super::secret::{Alphabet, SecretGenerator, EMAIL_SECRET_LENGTH, MOBILE_SECRET_LENGTH};
use super::templates;
use super::traits::{EmailChannel, MobileChannel};
use super::validator::{validate_email, validate_mobile};

/// Issues, dispatches and verifies one-time secrets
///
/// The verifier holds no per-request state; everything mutable lives in the
/// store, so one instance can be shared across tasks. Backends are injected
/// and may be trait objects (`Verifier<dyn VerificationStore, ...>`).
pub struct Verifier<S, E, M>
where
    S: VerificationStore + ?Sized,
    E: EmailChannel + ?Sized,
    M: MobileChannel + ?Sized,
{
    store: Arc<S>,
    email_channel: Arc<E>,
    mobile_channel: Arc<M>,
    generator: Arc<SecretGenerator>,
    config: VerifierConfig,
}

impl<S, E, M> Verifier<S, E, M>
where
    S: VerificationStore + ?Sized,
    E: EmailChannel + ?Sized,
    M: MobileChannel + ?Sized,
{
    /// Create a verifier using the operating system's random source
    ///
    /// # Arguments
    ///
    /// * `store` - Where requests are persisted
    /// * `email_channel` - Email provider
    /// * `mobile_channel` - SMS provider
    /// * `config` - Expiry, attempt budget and email defaults
    pub fn new(
        store: Arc<S>,
        email_channel: Arc<E>,
        mobile_channel: Arc<M>,
        config: VerifierConfig,
    ) -> Self {
        Self {
            store,
            email_channel,
            mobile_channel,
            generator: Arc::new(SecretGenerator::new()),
            config,
        }
    }

    /// Replace the secret generator
    pub fn with_generator(mut self, generator: SecretGenerator) -> Self {
        self.generator = Arc::new(generator);
        self
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Validate the recipient and persist a fresh pending request
    ///
    /// Nothing is written when the recipient is malformed.
    pub async fn new_request(
        &self,
        channel: Channel,
        recipient: &str,
    ) -> VerifierResult<VerificationRequest> {
        let (alphabet, length) = match channel {
            Channel::Email => {
                validate_email(recipient)?;
                (Alphabet::Alphanumeric, EMAIL_SECRET_LENGTH)
            }
            Channel::Mobile => {
                validate_mobile(recipient)?;
                (Alphabet::Numeric, MOBILE_SECRET_LENGTH)
            }
        };

        let secret = self.generator.generate(alphabet, length);
        let mut request = VerificationRequest::new(
            channel,
            recipient,
            secret,
            self.config.otp_expiry(channel),
            Utc::now(),
        );
        if channel == Channel::Email && !self.config.default_email_sender.is_empty() {
            request = request.with_sender(self.config.default_email_sender.clone());
        }

        let request = self.store.create(request).await?;

        tracing::info!(
            request_id = %request.id,
            channel = %channel,
            recipient = %mask_recipient(recipient),
            expires_at = %request.secret_expiry,
            event = "verification_request_created",
            "Verification request created"
        );

        Ok(request)
    }

    /// Send the secret and record the outcome in the dispatch log
    ///
    /// Only the ID and channel of `request` are used; the record is reloaded
    /// from the store so a stale copy cannot roll back attempts or replace
    /// the secret. The request is persisted whether or not the provider
    /// accepted the message. A failed send leaves it pending and is reported
    /// as `VerifierError::Dispatch`.
    pub async fn dispatch(
        &self,
        request: VerificationRequest,
        subject: Option<&str>,
        body: &str,
    ) -> VerifierResult<VerificationRequest> {
        let body = body.trim();
        if body.is_empty() {
            return Err(match request.channel {
                Channel::Email => VerifierError::EmptyEmailBody,
                Channel::Mobile => VerifierError::EmptySmsBody,
            });
        }

        let mut request = self.stored_copy(&request).await?;
        if !request.is_pending() {
            return Err(VerifierError::NotPending {
                status: request.status,
            });
        }

        let sent = match request.channel {
            Channel::Email => {
                let subject =
                    templates::resolve_subject(subject, &self.config.default_email_subject);
                let sender = request
                    .sender
                    .as_deref()
                    .unwrap_or(self.config.default_email_sender.as_str());
                self.email_channel
                    .send(sender, &request.recipient, subject, body)
                    .await
            }
            Channel::Mobile => self.mobile_channel.send(&request.recipient, body).await,
        };

        let now = Utc::now();
        let (entry, failure) = match sent {
            Ok(ack) => (DispatchEntry::Queued { ack, at: now }, None),
            Err(err) => (
                DispatchEntry::Failed {
                    reason: err.to_string(),
                    at: now,
                },
                Some(err),
            ),
        };
        request.record_dispatch(entry);

        let channel = request.channel;
        let id = request.id.clone();
        let stored = self.store.update(&id, request).await?;

        match failure {
            None => {
                tracing::info!(
                    request_id = %stored.id,
                    channel = %channel,
                    provider = self.provider_name(channel),
                    recipient = %mask_recipient(&stored.recipient),
                    dispatches = stored.dispatch_log.len(),
                    event = "verification_dispatched",
                    "Verification secret dispatched"
                );
                Ok(stored)
            }
            Some(source) => {
                tracing::warn!(
                    request_id = %stored.id,
                    channel = %channel,
                    provider = self.provider_name(channel),
                    recipient = %mask_recipient(&stored.recipient),
                    error = %source,
                    event = "verification_dispatch_failed",
                    "Failed to dispatch verification secret"
                );
                Err(VerifierError::Dispatch { channel, source })
            }
        }
    }

    /// Dispatch an email request with a caller-provided body
    pub async fn new_email_with_request(
        &self,
        request: VerificationRequest,
        subject: Option<&str>,
        body: &str,
    ) -> VerifierResult<VerificationRequest> {
        Self::expect_channel(&request, Channel::Email)?;
        self.dispatch(request, subject, body).await
    }

    /// Dispatch a mobile request with a caller-provided body
    pub async fn new_mobile_with_request(
        &self,
        request: VerificationRequest,
        body: &str,
    ) -> VerifierResult<VerificationRequest> {
        Self::expect_channel(&request, Channel::Mobile)?;
        self.dispatch(request, None, body).await
    }

    /// Create and send an email verification with the default HTML body
    ///
    /// # Arguments
    ///
    /// * `recipient` - Email address to verify
    /// * `subject` - Optional subject, see `templates::resolve_subject`
    ///
    /// # Returns
    ///
    /// * `Ok(VerificationRequest)` - The persisted request after a successful send
    /// * `Err(VerifierError)` - Validation, store or dispatch failure
    pub async fn new_email(
        &self,
        recipient: &str,
        subject: Option<&str>,
    ) -> VerifierResult<VerificationRequest> {
        validate_email(recipient)?;
        // Fail before creating anything when the link cannot be built
        templates::validate_callback_base(&self.config.email_callback_url)?;

        let request = self.new_request(Channel::Email, recipient).await?;
        let body = self.default_body(&request)?;
        self.dispatch(request, subject, &body).await
    }

    /// Create and send a mobile OTP with the default SMS body
    pub async fn new_mobile(&self, recipient: &str) -> VerifierResult<VerificationRequest> {
        let request = self.new_request(Channel::Mobile, recipient).await?;
        let body = self.default_body(&request)?;
        self.dispatch(request, None, &body).await
    }

    /// Send the latest pending secret again with the default body
    ///
    /// The secret is never regenerated; a new dispatch entry is appended.
    /// An already expired secret is not resent.
    pub async fn resend(
        &self,
        channel: Channel,
        recipient: &str,
    ) -> VerifierResult<VerificationRequest> {
        let request = self.last_pending(channel, recipient).await?;

        if request.is_expired_at(Utc::now()) {
            tracing::info!(
                request_id = %request.id,
                channel = %channel,
                recipient = %mask_recipient(recipient),
                event = "verification_resend_expired",
                "Refusing to resend an expired secret"
            );
            return Err(VerifierError::SecretExpired);
        }

        let body = self.default_body(&request)?;
        self.dispatch(request, None, &body).await
    }

    /// Check a secret against the latest pending request
    ///
    /// Every call counts as an attempt and is persisted. Checks run in this
    /// order: attempt budget, expiry, secret. A wrong secret within budget
    /// returns `InvalidSecret` and leaves the request pending.
    pub async fn verify_secret(
        &self,
        channel: Channel,
        recipient: &str,
        secret: &str,
    ) -> VerifierResult<VerificationRequest> {
        let mut request = self.last_pending(channel, recipient).await?;

        let outcome = request.register_attempt(secret, Utc::now(), self.config.max_attempts());
        let id = request.id.clone();
        let stored = self.store.update(&id, request).await?;

        let masked = mask_recipient(recipient);
        match outcome {
            AttemptOutcome::Verified => {
                tracing::info!(
                    request_id = %stored.id,
                    channel = %channel,
                    recipient = %masked,
                    attempts = stored.attempts,
                    event = "verification_succeeded",
                    "Verification succeeded"
                );
                Ok(stored)
            }
            AttemptOutcome::Rejected => {
                tracing::warn!(
                    request_id = %stored.id,
                    channel = %channel,
                    recipient = %masked,
                    attempts = stored.attempts,
                    remaining_attempts = self.config.max_attempts().saturating_sub(stored.attempts),
                    event = "verification_failed",
                    "Invalid verification secret"
                );
                Err(VerifierError::InvalidSecret)
            }
            AttemptOutcome::Expired => {
                tracing::warn!(
                    request_id = %stored.id,
                    channel = %channel,
                    recipient = %masked,
                    event = "verification_expired",
                    "Verification secret expired"
                );
                Err(VerifierError::SecretExpired)
            }
            AttemptOutcome::AttemptsExceeded => {
                tracing::warn!(
                    request_id = %stored.id,
                    channel = %channel,
                    recipient = %masked,
                    attempts = stored.attempts,
                    event = "max_attempts_exceeded",
                    "Maximum verification attempts exceeded"
                );
                Err(VerifierError::MaximumAttemptsExceeded)
            }
        }
    }

    pub async fn verify_email_secret(
        &self,
        recipient: &str,
        secret: &str,
    ) -> VerifierResult<VerificationRequest> {
        self.verify_secret(Channel::Email, recipient, secret).await
    }

    pub async fn verify_mobile_secret(
        &self,
        recipient: &str,
        secret: &str,
    ) -> VerifierResult<VerificationRequest> {
        self.verify_secret(Channel::Mobile, recipient, secret).await
    }

    /// Link embedded in verification emails
    pub fn email_callback_url(&self, email: &str, secret: &str) -> VerifierResult<String> {
        templates::build_callback_url(&self.config.email_callback_url, email, secret)
    }

    async fn last_pending(
        &self,
        channel: Channel,
        recipient: &str,
    ) -> VerifierResult<VerificationRequest> {
        self.store
            .read_last_pending(channel, recipient)
            .await?
            .ok_or(VerifierError::NotFound { channel })
    }

    /// Current stored version of `request`, which must exist on the same channel
    async fn stored_copy(
        &self,
        request: &VerificationRequest,
    ) -> VerifierResult<VerificationRequest> {
        let stored = self
            .store
            .find_by_id(&request.id)
            .await?
            .ok_or(VerifierError::NotFound {
                channel: request.channel,
            })?;
        Self::expect_channel(&stored, request.channel)?;
        Ok(stored)
    }

    fn default_body(&self, request: &VerificationRequest) -> VerifierResult<String> {
        match request.channel {
            Channel::Email => {
                let url = self.email_callback_url(&request.recipient, &request.secret)?;
                Ok(templates::email_body(&url, self.config.email_otp_expiry_secs))
            }
            Channel::Mobile => Ok(templates::sms_body(
                &request.secret,
                self.config.mobile_otp_expiry_secs,
            )),
        }
    }

    fn expect_channel(request: &VerificationRequest, expected: Channel) -> VerifierResult<()> {
        if request.channel == expected {
            Ok(())
        } else {
            Err(VerifierError::ChannelMismatch {
                expected,
                actual: request.channel,
            })
        }
    }

    fn provider_name(&self, channel: Channel) -> &str {
        match channel {
            Channel::Email => self.email_channel.provider_name(),
            Channel::Mobile => self.mobile_channel.provider_name(),
        }
    }
}

impl<S, E, M> Clone for Verifier<S, E, M>
where
    S: VerificationStore + ?Sized,
    E: EmailChannel + ?Sized,
    M: MobileChannel + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            email_channel: Arc::clone(&self.email_channel),
            mobile_channel: Arc::clone(&self.mobile_channel),
            generator: Arc::clone(&self.generator),
            config: self.config.clone(),
        }
    }
}
