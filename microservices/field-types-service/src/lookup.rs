//! Field type lookup
//!
//! In-memory index of mapped field types per index snapshot. Each snapshot
//! records which streams wrote into it and the time span it covers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use logscope_core::{MappedFieldType, Result, StreamId, TimeRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

#[async_trait]
pub trait TypeLookupService: Send + Sync {
    async fn field_types_by_streams(
        &self,
        stream_ids: &BTreeSet<StreamId>,
        time_range: &TimeRange,
    ) -> Result<BTreeSet<MappedFieldType>>;
}

/// Field types mapped in one index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexFieldTypes {
    pub index_name: String,
    pub streams: BTreeSet<StreamId>,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub fields: BTreeSet<MappedFieldType>,
}

impl IndexFieldTypes {
    fn covers_any(&self, stream_ids: &BTreeSet<StreamId>) -> bool {
        !self.streams.is_disjoint(stream_ids)
    }

    fn overlaps(&self, window: Option<(DateTime<Utc>, DateTime<Utc>)>) -> bool {
        match window {
            None => true,
            Some((from, to)) => self.begin <= to && self.end >= from,
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryFieldTypeIndex {
    indices: Arc<DashMap<String, IndexFieldTypes>>,
}

impl InMemoryFieldTypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the snapshot for an index
    pub fn upsert(&self, index: IndexFieldTypes) {
        tracing::debug!(
            index = %index.index_name,
            streams = index.streams.len(),
            fields = index.fields.len(),
            "Indexed field types"
        );
        self.indices.insert(index.index_name.clone(), index);
    }

    pub fn remove(&self, index_name: &str) -> Option<IndexFieldTypes> {
        self.indices.remove(index_name).map(|(_, index)| index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn lookup_at(
        &self,
        stream_ids: &BTreeSet<StreamId>,
        time_range: &TimeRange,
        now: DateTime<Utc>,
    ) -> BTreeSet<MappedFieldType> {
        if stream_ids.is_empty() {
            return BTreeSet::new();
        }
        let window = time_range.window(now);

        self.indices
            .iter()
            .filter(|entry| entry.covers_any(stream_ids) && entry.overlaps(window))
            .flat_map(|entry| entry.fields.iter().cloned().collect::<Vec<_>>())
            .collect()
    }
}

#[async_trait]
impl TypeLookupService for InMemoryFieldTypeIndex {
    async fn field_types_by_streams(
        &self,
        stream_ids: &BTreeSet<StreamId>,
        time_range: &TimeRange,
    ) -> Result<BTreeSet<MappedFieldType>> {
        Ok(self.lookup_at(stream_ids, time_range, Utc::now()))
    }
}
