//! Store trait defining where verification requests live.

use async_trait::async_trait;

use crate::domain::entities::{Channel, VerificationRequest};
use crate::errors::StoreError;

/// Durable keyed storage for verification requests
///
/// The lifecycle manager is the only writer. Implementations must keep
/// terminal records immutable and should serialise the read-modify-write
/// cycle of `read_last_pending` followed by `update` for the same
/// (channel, recipient); otherwise concurrent attempts can under-count.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Persist a new request
    ///
    /// # Arguments
    /// * `request` - The request to store. An empty `id` asks the store to assign one.
    ///
    /// # Returns
    /// * `Ok(VerificationRequest)` - The stored record, with its final ID
    /// * `Err(StoreError)` - Write failed or the ID already exists
    async fn create(&self, request: VerificationRequest) -> Result<VerificationRequest, StoreError>;

    /// Most recently created pending request for a (channel, recipient) pair
    ///
    /// # Returns
    /// * `Ok(Some(VerificationRequest))` - Latest pending request
    /// * `Ok(None)` - Nothing pending for that recipient
    /// * `Err(StoreError)` - Read failed
    async fn read_last_pending(
        &self,
        channel: Channel,
        recipient: &str,
    ) -> Result<Option<VerificationRequest>, StoreError>;

    /// Overwrite the full record stored under `id`
    ///
    /// # Returns
    /// * `Ok(VerificationRequest)` - The record as stored
    /// * `Err(StoreError::NotFound)` - No record with that ID
    /// * `Err(StoreError::TerminalState)` - The stored record already reached a terminal status
    async fn update(
        &self,
        id: &str,
        request: VerificationRequest,
    ) -> Result<VerificationRequest, StoreError>;

    /// Look up a request by ID regardless of status
    async fn find_by_id(&self, id: &str) -> Result<Option<VerificationRequest>, StoreError>;
}
