//! In-memory implementation of the record store.
//!
//! Backs unit and integration tests and the development bootstrap. The map
//! is guarded by a single `RwLock`, which makes every write an atomic
//! whole-record replace exactly as the trait contract requires.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::VerificationRecord;
use crate::errors::{StoreError, StoreResult};

use super::trait_::{PendingCredential, RecordStore};

/// In-memory record store keyed by normalized identity.
#[derive(Clone)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<HashMap<String, VerificationRecord>>>,
}

impl InMemoryRecordStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of records currently held (test helper)
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn upsert(
        &self,
        identity: &str,
        pending: PendingCredential,
    ) -> StoreResult<VerificationRecord> {
        let mut records = self.records.write().await;
        let now = Utc::now();

        let record = match records.get(identity) {
            Some(existing) => existing.reissued(pending.value, pending.expires_at, now),
            None => VerificationRecord::pending(identity, pending.value, pending.expires_at, now),
        };

        records.insert(identity.to_string(), record.clone());
        Ok(record)
    }

    async fn find(&self, identity: &str) -> StoreResult<Option<VerificationRecord>> {
        let records = self.records.read().await;
        Ok(records.get(identity).cloned())
    }

    async fn find_by_credential(&self, value: &str) -> StoreResult<Option<VerificationRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.credential.as_deref() == Some(value))
            .cloned())
    }

    async fn save(&self, record: VerificationRecord) -> StoreResult<VerificationRecord> {
        let mut records = self.records.write().await;

        if !records.contains_key(&record.identity) {
            return Err(StoreError::NotFound);
        }

        records.insert(record.identity.clone(), record.clone());
        Ok(record)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.verified || !r.is_expired(now));
        Ok((before - records.len()) as u64)
    }
}
