//! Field Type Resolver
//!
//! Two authorization strategies, one per access pattern:
//! - `resolve_all_permitted`: the catalog filters by the caller's read
//!   permission, unreadable streams are silently dropped.
//! - `resolve_for_streams`: every named stream is checked and all denials are
//!   reported together; the lookup service is never touched on denial.

use logscope_core::{
    FieldTypesForStreamsRequest, MappedFieldType, MissingStreamPermission, Result, StreamId,
    TimeRange,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::StreamCatalog;
use crate::lookup::TypeLookupService;
use crate::permissions::PermissionOracle;

#[derive(Clone)]
pub struct FieldTypeResolver {
    catalog: Arc<dyn StreamCatalog>,
    lookup: Arc<dyn TypeLookupService>,
}

impl FieldTypeResolver {
    pub fn new(catalog: Arc<dyn StreamCatalog>, lookup: Arc<dyn TypeLookupService>) -> Self {
        Self { catalog, lookup }
    }

    /// Field types of every stream the caller may read, over all time
    pub async fn resolve_all_permitted(
        &self,
        caller: &dyn PermissionOracle,
    ) -> Result<BTreeSet<MappedFieldType>> {
        let is_permitted = |stream_id: &StreamId| caller.can_read_stream(stream_id);
        let permitted = self.catalog.load_matching(&is_permitted).await?;

        debug!(permitted_streams = permitted.len(), "Loaded permitted streams");

        // Zero streams is still a valid query
        self.lookup
            .field_types_by_streams(&permitted, &TimeRange::AllTime)
            .await
    }

    /// Field types of the requested streams, provided the caller may read all of them
    pub async fn resolve_for_streams(
        &self,
        request: &FieldTypesForStreamsRequest,
        caller: &dyn PermissionOracle,
    ) -> Result<BTreeSet<MappedFieldType>> {
        // No short-circuit: every requested stream gets exactly one check
        let denied: BTreeSet<StreamId> = request
            .streams
            .iter()
            .filter(|stream_id| !caller.can_read_stream(stream_id))
            .cloned()
            .collect();

        if let Some(denial) = MissingStreamPermission::from_denied(denied) {
            warn!(
                requested = request.streams.len(),
                denied = ?denial.streams_with_missing_permissions(),
                "Caller lacks read permission for requested streams"
            );
            return Err(denial.into());
        }

        let timerange = request.timerange();
        debug!(streams = request.streams.len(), timerange = %timerange, "Resolving field types for streams");

        self.lookup
            .field_types_by_streams(&request.streams, &timerange)
            .await
    }
}
