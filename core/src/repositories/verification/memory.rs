//! In-process verification store

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Channel, VerificationRequest};
use crate::errors::StoreError;

use super::r#trait::VerificationStore;

#[derive(Default)]
struct Records {
    /// Request by ID, tagged with its insertion sequence
    by_id: HashMap<String, (u64, VerificationRequest)>,
    sequence: u64,
}

/// Verification store kept in memory
///
/// Each call holds one lock for its duration, but `read_last_pending`
/// followed by `update` takes it twice. Two concurrent attempts on the same
/// request may both read the same attempt count and the later write wins.
/// Records are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryVerificationStore {
    records: Arc<RwLock<Records>>,
}

impl InMemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored requests, any status
    pub async fn len(&self) -> usize {
        self.records.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl VerificationStore for InMemoryVerificationStore {
    async fn create(&self, mut request: VerificationRequest) -> Result<VerificationRequest, StoreError> {
        let mut records = self.records.write().await;

        if request.id.is_empty() {
            request.id = Uuid::new_v4().to_string();
        }
        if records.by_id.contains_key(&request.id) {
            return Err(StoreError::backend(format!(
                "duplicate verification request id {}",
                request.id
            )));
        }

        request.updated_at = Utc::now();
        records.sequence += 1;
        let sequence = records.sequence;
        records
            .by_id
            .insert(request.id.clone(), (sequence, request.clone()));

        Ok(request)
    }

    async fn read_last_pending(
        &self,
        channel: Channel,
        recipient: &str,
    ) -> Result<Option<VerificationRequest>, StoreError> {
        let records = self.records.read().await;

        Ok(records
            .by_id
            .values()
            .filter(|(_, r)| r.channel == channel && r.recipient == recipient && r.is_pending())
            .max_by_key(|(sequence, _)| *sequence)
            .map(|(_, r)| r.clone()))
    }

    async fn update(
        &self,
        id: &str,
        mut request: VerificationRequest,
    ) -> Result<VerificationRequest, StoreError> {
        let mut records = self.records.write().await;

        let (_, stored) = records
            .by_id
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        if stored.status.is_terminal() {
            return Err(StoreError::TerminalState {
                id: id.to_string(),
                status: stored.status,
            });
        }

        request.id = id.to_string();
        request.updated_at = Utc::now();
        *stored = request.clone();

        Ok(request)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<VerificationRequest>, StoreError> {
        let records = self.records.read().await;
        Ok(records.by_id.get(id).map(|(_, r)| r.clone()))
    }
}
