//! Verification request entity and its attempt state machine.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Communication channel a secret is delivered through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Mobile,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(Channel::Email),
            "mobile" | "sms" => Ok(Channel::Mobile),
            _ => Err(format!("Unknown channel: {}", s)),
        }
    }
}

/// Lifecycle status of a verification request
///
/// `Pending` is the only non-terminal status. Once a request leaves it, no
/// further transition is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Expired,
    Rejected,
    AttemptsExceeded,
}

impl VerificationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, VerificationStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Expired => "expired",
            VerificationStatus::Rejected => "rejected",
            VerificationStatus::AttemptsExceeded => "attempts_exceeded",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VerificationStatus::Pending),
            "verified" => Ok(VerificationStatus::Verified),
            "expired" => Ok(VerificationStatus::Expired),
            "rejected" => Ok(VerificationStatus::Rejected),
            "attempts_exceeded" => Ok(VerificationStatus::AttemptsExceeded),
            other => Err(format!("Unknown verification status: {}", other)),
        }
    }
}

/// One entry in a request's dispatch log
///
/// The acknowledgment is whatever the provider returned and is stored
/// verbatim; nothing in this crate inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DispatchEntry {
    Queued {
        ack: serde_json::Value,
        at: DateTime<Utc>,
    },
    Failed {
        reason: String,
        at: DateTime<Utc>,
    },
}

impl DispatchEntry {
    pub fn is_queued(&self) -> bool {
        matches!(self, DispatchEntry::Queued { .. })
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            DispatchEntry::Queued { at, .. } | DispatchEntry::Failed { at, .. } => *at,
        }
    }
}

/// Result of registering one verification attempt against a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Verified,
    Expired,
    Rejected,
    AttemptsExceeded,
}

/// A single issued secret and everything that happened to it
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Unique identifier, assigned at creation
    pub id: String,

    pub channel: Channel,

    /// Origin address used when dispatching, if the channel has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    /// Email address or mobile number the secret was issued to
    pub recipient: String,

    pub secret: String,

    pub secret_expiry: DateTime<Utc>,

    /// Number of verification calls made against this request
    pub attempts: u32,

    /// Append-only record of every dispatch, oldest first
    #[serde(default)]
    pub dispatch_log: Vec<DispatchEntry>,

    pub status: VerificationStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl VerificationRequest {
    /// Creates a pending request whose secret expires `ttl` after `now`
    ///
    /// # Arguments
    ///
    /// * `channel` - Channel the secret will be delivered through
    /// * `recipient` - Already validated email address or mobile number
    /// * `secret` - Freshly generated secret
    /// * `ttl` - Validity of the secret
    /// * `now` - Creation time
    pub fn new(
        channel: Channel,
        recipient: impl Into<String>,
        secret: impl Into<String>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            channel,
            sender: None,
            recipient: recipient.into(),
            secret: secret.into(),
            secret_expiry: now + ttl,
            attempts: 0,
            dispatch_log: Vec::new(),
            status: VerificationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == VerificationStatus::Pending
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.secret_expiry < now
    }

    /// Time left before the secret expires, zero once it has
    pub fn remaining_validity(&self, now: DateTime<Utc>) -> Duration {
        if self.secret_expiry > now {
            self.secret_expiry - now
        } else {
            Duration::zero()
        }
    }

    /// Appends a dispatch outcome to the log
    pub fn record_dispatch(&mut self, entry: DispatchEntry) {
        self.updated_at = entry.at();
        self.dispatch_log.push(entry);
    }

    pub fn last_dispatch(&self) -> Option<&DispatchEntry> {
        self.dispatch_log.last()
    }

    /// Registers one verification attempt
    ///
    /// The attempt counter is always incremented. Checks run in a fixed order:
    /// attempt budget, then expiry, then the secret itself. Exceeding the
    /// budget and expiry are terminal. A wrong secret within budget leaves the
    /// request pending so the caller can retry until the budget runs out.
    ///
    /// Must only be called on a pending request.
    pub fn register_attempt(
        &mut self,
        secret: &str,
        now: DateTime<Utc>,
        max_attempts: u32,
    ) -> AttemptOutcome {
        self.attempts = self.attempts.saturating_add(1);
        self.updated_at = now;

        if self.attempts > max_attempts {
            self.status = VerificationStatus::AttemptsExceeded;
            return AttemptOutcome::AttemptsExceeded;
        }

        if self.is_expired_at(now) {
            self.status = VerificationStatus::Expired;
            return AttemptOutcome::Expired;
        }

        if !constant_time_eq(secret.as_bytes(), self.secret.as_bytes()) {
            return AttemptOutcome::Rejected;
        }

        self.status = VerificationStatus::Verified;
        AttemptOutcome::Verified
    }
}

// Secrets must never end up in logs through `{:?}`.
impl fmt::Debug for VerificationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationRequest")
            .field("id", &self.id)
            .field("channel", &self.channel)
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .field("secret", &"<redacted>")
            .field("secret_expiry", &self.secret_expiry)
            .field("attempts", &self.attempts)
            .field("dispatch_log", &self.dispatch_log)
            .field("status", &self.status)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
