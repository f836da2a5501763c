//! Fixture loading for the in-memory catalog and field type index

use logscope_core::{LogscopeError, Result};
use serde::Deserialize;
use std::path::Path;

use crate::catalog::{InMemoryStreamCatalog, StreamDescriptor};
use crate::lookup::{IndexFieldTypes, InMemoryFieldTypeIndex};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub streams: Vec<StreamDescriptor>,
    #[serde(default)]
    pub indices: Vec<IndexFieldTypes>,
}

impl SeedData {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| LogscopeError::Config(format!("Invalid seed data: {}", e)))
    }

    pub fn apply(self, catalog: &InMemoryStreamCatalog, index: &InMemoryFieldTypeIndex) {
        for stream in self.streams {
            catalog.register(stream);
        }
        for snapshot in self.indices {
            if snapshot.streams.iter().any(|id| catalog.get(id).is_none()) {
                tracing::warn!(index = %snapshot.index_name, "Index references streams missing from the catalog");
            }
            index.upsert(snapshot);
        }
    }
}

/// Read a seed file and load it into the given stores
pub async fn load_seed(
    path: &Path,
    catalog: &InMemoryStreamCatalog,
    index: &InMemoryFieldTypeIndex,
) -> Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LogscopeError::Config(format!("Cannot read seed file {}: {}", path.display(), e)))?;

    let seed = SeedData::from_json(&raw)?;
    tracing::info!(
        path = %path.display(),
        streams = seed.streams.len(),
        indices = seed.indices.len(),
        "Loaded seed data"
    );
    seed.apply(catalog, index);
    Ok(())
}
