//! Verification store on Redis
//!
//! Key layout (prefix defaults to `verifier`):
//! - `{prefix}:request:{id}` - the request as JSON
//! - `{prefix}:pending:{channel}:{recipient}` - sorted set of pending request IDs,
//!   scored by creation time
//!
//! Updates are last-writer-wins. Two concurrent attempts on the same request
//! may both read the same attempt count.

use async_trait::async_trait;
use chrono::Utc;
use redis::{aio::MultiplexedConnection, Client};
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

use vf_core::{Channel, StoreError, VerificationRequest, VerificationStore};
use vf_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Redis implementation of `VerificationStore`
#[derive(Clone)]
pub struct RedisVerificationStore {
    connection: MultiplexedConnection,
    key_prefix: String,
    retention_secs: u64,
}

impl RedisVerificationStore {
    /// Connect to Redis
    ///
    /// # Arguments
    /// * `config` - Redis URL, key prefix, retention and connection timeout
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Connected store or error
    pub async fn connect(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let timeout = Duration::from_secs(config.connection_timeout);
        let connection = tokio::time::timeout(timeout, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| {
                InfrastructureError::Config(format!(
                    "Timed out connecting to Redis after {}s",
                    config.connection_timeout
                ))
            })??;

        info!(key_prefix = %config.key_prefix, "Redis verification store connected");

        Ok(Self::with_connection(
            connection,
            config.key_prefix.clone(),
            config.retention_secs,
        ))
    }

    pub fn with_connection(
        connection: MultiplexedConnection,
        key_prefix: impl Into<String>,
        retention_secs: u64,
    ) -> Self {
        Self {
            connection,
            key_prefix: key_prefix.into(),
            retention_secs,
        }
    }

    fn request_key(&self, id: &str) -> String {
        format!("{}:request:{}", self.key_prefix, id)
    }

    fn pending_key(&self, channel: Channel, recipient: &str) -> String {
        format!("{}:pending:{}:{}", self.key_prefix, channel, recipient)
    }

    /// Seconds the record is kept: what is left of the secret plus retention
    fn ttl_secs(&self, request: &VerificationRequest) -> u64 {
        let remaining = request.remaining_validity(Utc::now()).num_seconds().max(0) as u64;
        remaining.saturating_add(self.retention_secs).max(1)
    }

    async fn load(&self, id: &str) -> Result<Option<VerificationRequest>, StoreError> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(self.request_key(id))
            .query_async(&mut conn)
            .await
            .map_err(StoreError::backend)?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl VerificationStore for RedisVerificationStore {
    async fn create(&self, mut request: VerificationRequest) -> Result<VerificationRequest, StoreError> {
        if request.id.is_empty() {
            request.id = Uuid::new_v4().to_string();
        }
        request.updated_at = Utc::now();

        let payload = serde_json::to_string(&request)?;
        let ttl = self.ttl_secs(&request);
        let mut conn = self.connection.clone();

        let created: Option<String> = redis::cmd("SET")
            .arg(self.request_key(&request.id))
            .arg(&payload)
            .arg("NX")
            .arg("EX")
            .arg(ttl)
            .query_async(&mut conn)
            .await
            .map_err(StoreError::backend)?;

        if created.is_none() {
            return Err(StoreError::backend(format!(
                "duplicate verification request id {}",
                request.id
            )));
        }

        let pending_key = self.pending_key(request.channel, &request.recipient);
        redis::pipe()
            .atomic()
            .cmd("ZADD")
            .arg(&pending_key)
            .arg(request.created_at.timestamp_micros())
            .arg(&request.id)
            .ignore()
            .cmd("EXPIRE")
            .arg(&pending_key)
            .arg(ttl)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(StoreError::backend)?;

        debug!(request_id = %request.id, ttl_secs = ttl, "Verification request stored in Redis");
        Ok(request)
    }

    async fn read_last_pending(
        &self,
        channel: Channel,
        recipient: &str,
    ) -> Result<Option<VerificationRequest>, StoreError> {
        let pending_key = self.pending_key(channel, recipient);
        let mut conn = self.connection.clone();

        let ids: Vec<String> = redis::cmd("ZREVRANGE")
            .arg(&pending_key)
            .arg(0)
            .arg(-1)
            .query_async(&mut conn)
            .await
            .map_err(StoreError::backend)?;

        for id in ids {
            match self.load(&id).await? {
                Some(request) if request.is_pending() => return Ok(Some(request)),
                _ => {
                    // Record expired out of Redis or left pending elsewhere
                    redis::cmd("ZREM")
                        .arg(&pending_key)
                        .arg(&id)
                        .query_async::<_, ()>(&mut conn)
                        .await
                        .map_err(StoreError::backend)?;
                }
            }
        }

        Ok(None)
    }

    async fn update(
        &self,
        id: &str,
        mut request: VerificationRequest,
    ) -> Result<VerificationRequest, StoreError> {
        let stored = self
            .load(id)
            .await?
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        if stored.status.is_terminal() {
            return Err(StoreError::TerminalState {
                id: id.to_string(),
                status: stored.status,
            });
        }

        request.id = id.to_string();
        request.updated_at = Utc::now();

        let payload = serde_json::to_string(&request)?;
        let ttl = self.ttl_secs(&request);
        let mut conn = self.connection.clone();

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("SET")
            .arg(self.request_key(id))
            .arg(&payload)
            .arg("EX")
            .arg(ttl)
            .ignore();
        if !request.is_pending() {
            pipe.cmd("ZREM")
                .arg(self.pending_key(request.channel, &request.recipient))
                .arg(id)
                .ignore();
        }
        pipe.query_async::<_, ()>(&mut conn)
            .await
            .map_err(StoreError::backend)?;

        Ok(request)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<VerificationRequest>, StoreError> {
        self.load(id).await
    }
}
