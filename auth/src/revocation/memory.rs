use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use super::store::RevocationError;
use super::store::RevocationRecord;
use super::store::RevocationStore;

/// Process-local revocation store.
///
/// Only suitable for a single instance (tests, local development): revocations
/// are not shared with other processes and do not survive a restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRevocationStore {
    records: Arc<RwLock<HashMap<String, RevocationRecord>>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn get(&self, token_id: &str) -> Option<RevocationRecord> {
        self.records.read().await.get(token_id).cloned()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, record: &RevocationRecord) -> Result<(), RevocationError> {
        self.records
            .write()
            .await
            .entry(record.token_id.clone())
            .or_insert_with(|| record.clone());

        Ok(())
    }

    async fn is_revoked(&self, token_id: &str) -> Result<bool, RevocationError> {
        Ok(self.records.read().await.contains_key(token_id))
    }

    async fn gc(&self, now: DateTime<Utc>) -> Result<u64, RevocationError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| record.expires_at > now);

        Ok((before - records.len()) as u64)
    }
}
