//! Stream catalog
//!
//! The catalog owns the universe of stream ids. Callers hand it a predicate
//! and get back the ids it accepts, so nobody else has to materialize the
//! full stream list.

use async_trait::async_trait;
use dashmap::DashMap;
use logscope_core::{Result, StreamId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Predicate evaluated by the catalog for each known stream id
pub type StreamPredicate<'a> = dyn Fn(&StreamId) -> bool + Send + Sync + 'a;

#[async_trait]
pub trait StreamCatalog: Send + Sync {
    /// All known stream ids for which `predicate` holds
    async fn load_matching(&self, predicate: &StreamPredicate<'_>) -> Result<BTreeSet<StreamId>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub id: StreamId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Default)]
pub struct InMemoryStreamCatalog {
    streams: Arc<DashMap<StreamId, StreamDescriptor>>,
}

impl InMemoryStreamCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, stream: StreamDescriptor) {
        tracing::debug!(stream_id = %stream.id, title = %stream.title, "Registered stream");
        self.streams.insert(stream.id.clone(), stream);
    }

    pub fn remove(&self, stream_id: &StreamId) -> Option<StreamDescriptor> {
        self.streams.remove(stream_id).map(|(_, stream)| stream)
    }

    pub fn get(&self, stream_id: &StreamId) -> Option<StreamDescriptor> {
        self.streams.get(stream_id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

#[async_trait]
impl StreamCatalog for InMemoryStreamCatalog {
    async fn load_matching(&self, predicate: &StreamPredicate<'_>) -> Result<BTreeSet<StreamId>> {
        Ok(self
            .streams
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|id| predicate(id))
            .collect())
    }
}
