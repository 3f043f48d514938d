//! MySQL implementation of the VerificationStore trait.
//!
//! Rows are ordered by an auto-increment column so "most recent" does not
//! depend on clock resolution. The dispatch log is kept as a JSON column.
//! Updates only touch rows that are still pending, which keeps terminal
//! records immutable even under concurrent writers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use vf_core::{
    Channel, DispatchEntry, StoreError, VerificationRequest, VerificationStatus, VerificationStore,
};

use crate::InfrastructureError;

const COLUMNS: &str = "id, channel, sender, recipient, secret, secret_expiry, attempts, \
     CAST(dispatch_log AS CHAR) AS dispatch_log, status, created_at, updated_at";

/// MySQL implementation of `VerificationStore`
pub struct MySqlVerificationStore {
    pool: MySqlPool,
    table: String,
}

impl MySqlVerificationStore {
    /// Create a store over `table`
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    /// * `table` - Table name; letters, digits and underscores only
    pub fn new(pool: MySqlPool, table: impl Into<String>) -> Result<Self, InfrastructureError> {
        let table = table.into();
        if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(InfrastructureError::Config(format!(
                "Invalid table name: {}",
                table
            )));
        }
        Ok(Self { pool, table })
    }

    /// Create the table if it does not exist
    pub async fn ensure_schema(&self) -> Result<(), InfrastructureError> {
        let sql = format!(
            r#"CREATE TABLE IF NOT EXISTS {table} (
                auto_id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
                id VARCHAR(64) NOT NULL,
                channel VARCHAR(16) NOT NULL,
                sender VARCHAR(320) NULL,
                recipient VARCHAR(320) NOT NULL,
                secret VARCHAR(512) NOT NULL,
                secret_expiry DATETIME(6) NOT NULL,
                attempts INT UNSIGNED NOT NULL DEFAULT 0,
                dispatch_log JSON NOT NULL,
                status VARCHAR(32) NOT NULL,
                created_at DATETIME(6) NOT NULL,
                updated_at DATETIME(6) NOT NULL,
                UNIQUE KEY uk_{table}_id (id),
                KEY idx_{table}_pending (channel, recipient, status, auto_id)
            )"#,
            table = self.table
        );

        sqlx::query(&sql).execute(&self.pool).await?;
        tracing::info!(table = %self.table, "Verification table ready");
        Ok(())
    }

    /// Convert database row to VerificationRequest entity
    fn row_to_request(row: &MySqlRow) -> Result<VerificationRequest, StoreError> {
        let channel: String = row.try_get("channel").map_err(StoreError::backend)?;
        let status: String = row.try_get("status").map_err(StoreError::backend)?;
        let dispatch_log: String = row.try_get("dispatch_log").map_err(StoreError::backend)?;

        Ok(VerificationRequest {
            id: row.try_get("id").map_err(StoreError::backend)?,
            channel: channel
                .parse::<Channel>()
                .map_err(|message| StoreError::Serialization { message })?,
            sender: row.try_get("sender").map_err(StoreError::backend)?,
            recipient: row.try_get("recipient").map_err(StoreError::backend)?,
            secret: row.try_get("secret").map_err(StoreError::backend)?,
            secret_expiry: row
                .try_get::<DateTime<Utc>, _>("secret_expiry")
                .map_err(StoreError::backend)?,
            attempts: row.try_get("attempts").map_err(StoreError::backend)?,
            dispatch_log: serde_json::from_str::<Vec<DispatchEntry>>(&dispatch_log)?,
            status: status
                .parse::<VerificationStatus>()
                .map_err(|message| StoreError::Serialization { message })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(StoreError::backend)?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(StoreError::backend)?,
        })
    }
}

fn is_duplicate_key(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23000"))
}

#[async_trait]
impl VerificationStore for MySqlVerificationStore {
    async fn create(&self, mut request: VerificationRequest) -> Result<VerificationRequest, StoreError> {
        if request.id.is_empty() {
            request.id = Uuid::new_v4().to_string();
        }
        request.updated_at = Utc::now();

        let sql = format!(
            "INSERT INTO {} (id, channel, sender, recipient, secret, secret_expiry, attempts, \
             dispatch_log, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.table
        );

        sqlx::query(&sql)
            .bind(&request.id)
            .bind(request.channel.as_str())
            .bind(&request.sender)
            .bind(&request.recipient)
            .bind(&request.secret)
            .bind(request.secret_expiry)
            .bind(request.attempts)
            .bind(serde_json::to_string(&request.dispatch_log)?)
            .bind(request.status.as_str())
            .bind(request.created_at)
            .bind(request.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    StoreError::backend(format!("duplicate verification request id {}", request.id))
                } else {
                    tracing::error!(error = %e, "Failed to insert verification request");
                    StoreError::backend(e)
                }
            })?;

        Ok(request)
    }

    async fn read_last_pending(
        &self,
        channel: Channel,
        recipient: &str,
    ) -> Result<Option<VerificationRequest>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE channel = ? AND recipient = ? AND status = ? \
             ORDER BY auto_id DESC LIMIT 1",
            COLUMNS, self.table
        );

        let row = sqlx::query(&sql)
            .bind(channel.as_str())
            .bind(recipient)
            .bind(VerificationStatus::Pending.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        row.as_ref().map(Self::row_to_request).transpose()
    }

    async fn update(
        &self,
        id: &str,
        mut request: VerificationRequest,
    ) -> Result<VerificationRequest, StoreError> {
        request.id = id.to_string();
        request.updated_at = Utc::now();

        let sql = format!(
            "UPDATE {} SET sender = ?, recipient = ?, secret = ?, secret_expiry = ?, \
             attempts = ?, dispatch_log = ?, status = ?, updated_at = ? \
             WHERE id = ? AND status = ? AND attempts <= ?",
            self.table
        );

        let result = sqlx::query(&sql)
            .bind(&request.sender)
            .bind(&request.recipient)
            .bind(&request.secret)
            .bind(request.secret_expiry)
            .bind(request.attempts)
            .bind(serde_json::to_string(&request.dispatch_log)?)
            .bind(request.status.as_str())
            .bind(request.updated_at)
            .bind(id)
            .bind(VerificationStatus::Pending.as_str())
            .bind(request.attempts)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        if result.rows_affected() == 0 {
            return match self.find_by_id(id).await? {
                None => Err(StoreError::NotFound { id: id.to_string() }),
                Some(stored) if stored.status.is_terminal() => Err(StoreError::TerminalState {
                    id: id.to_string(),
                    status: stored.status,
                }),
                // A stale copy must not roll back attempts recorded since it was read
                Some(stored) if stored.attempts > request.attempts => {
                    tracing::warn!(
                        event = "stale_update_rejected",
                        id = %id,
                        stored_attempts = stored.attempts,
                        attempts = request.attempts,
                        "Rejected update carrying an older attempt count"
                    );
                    Err(StoreError::backend(format!(
                        "verification request {} was modified concurrently",
                        id
                    )))
                }
                // MySQL reports zero affected rows when nothing changed
                Some(_) => Ok(request),
            };
        }

        Ok(request)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<VerificationRequest>, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?", COLUMNS, self.table);

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        row.as_ref().map(Self::row_to_request).transpose()
    }
}
