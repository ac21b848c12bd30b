//! Non-durable store for tests and embedding.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::{NewProvider, ProviderId, ProviderRecord};

use super::{RecordStore, StoreError};

/// In-memory [`RecordStore`].
///
/// Records live in a map ordered by identifier, and identifiers increase
/// monotonically, so iteration follows insertion order. Identifiers are never
/// reused, even after [`RecordStore::clear`].
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: BTreeMap<ProviderId, ProviderRecord>,
    last_id: u64,
}

impl MemoryRecordStore {
    /// Number of live records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn next_id(&mut self) -> Result<ProviderId, StoreError> {
        let next = self.last_id.checked_add(1).ok_or(StoreError::IdsExhausted)?;
        self.last_id = next;
        Ok(ProviderId::new(next))
    }
}

impl RecordStore for MemoryRecordStore {
    fn insert(&mut self, draft: NewProvider) -> Result<ProviderRecord, StoreError> {
        let id = self.next_id()?;
        let record = draft.into_record(id, Utc::now());
        self.records.insert(id, record.clone());
        Ok(record)
    }

    fn insert_batch(&mut self, drafts: Vec<NewProvider>) -> Result<Vec<ProviderRecord>, StoreError> {
        let count = u64::try_from(drafts.len()).map_err(|_| StoreError::IdsExhausted)?;
        self.last_id
            .checked_add(count)
            .ok_or(StoreError::IdsExhausted)?;
        let created_at = Utc::now();
        drafts
            .into_iter()
            .map(|draft| {
                let id = self.next_id()?;
                let record = draft.into_record(id, created_at);
                self.records.insert(id, record.clone());
                Ok(record)
            })
            .collect()
    }

    fn delete(&mut self, id: ProviderId) -> Result<bool, StoreError> {
        Ok(self.records.remove(&id).is_some())
    }

    fn clear(&mut self) -> Result<usize, StoreError> {
        let removed = self.records.len();
        self.records.clear();
        Ok(removed)
    }

    fn get(&self, id: ProviderId) -> Result<ProviderRecord, StoreError> {
        self.records
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    fn get_all(&self) -> Result<Vec<ProviderRecord>, StoreError> {
        Ok(self.records.values().cloned().collect())
    }
}
