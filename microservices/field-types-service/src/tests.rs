//! Unit tests for the Field Type Resolver

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use logscope_core::{
        FieldType, FieldTypesForStreamsRequest, LogscopeError, MappedFieldType, Result, StreamId,
        TimeRange,
    };
    use parking_lot::Mutex;
    use std::collections::{BTreeSet, HashSet};
    use std::sync::Arc;

    use crate::catalog::{StreamCatalog, StreamPredicate};
    use crate::lookup::TypeLookupService;
    use crate::permissions::PermissionOracle;
    use crate::resolver::FieldTypeResolver;

    fn ids(values: &[&str]) -> BTreeSet<StreamId> {
        values.iter().copied().map(StreamId::from).collect()
    }

    fn foobar_types() -> BTreeSet<MappedFieldType> {
        [MappedFieldType::new("foobar", FieldType::new("long", ["numeric", "enumerable"]))].into()
    }

    // Caller whose every permission check is recorded
    struct MockSearchUser {
        readable: HashSet<String>,
        checks: Mutex<Vec<StreamId>>,
    }

    impl MockSearchUser {
        fn can_read(readable: &[&str]) -> Self {
            Self {
                readable: readable.iter().map(|s| s.to_string()).collect(),
                checks: Mutex::new(Vec::new()),
            }
        }

        fn checked(&self) -> Vec<StreamId> {
            self.checks.lock().clone()
        }
    }

    impl PermissionOracle for MockSearchUser {
        fn can_read_stream(&self, stream_id: &StreamId) -> bool {
            self.checks.lock().push(stream_id.clone());
            self.readable.contains(stream_id.as_str())
        }
    }

    // Catalog that filters its known ids and records what the predicate answered for sampled ids
    #[derive(Default)]
    struct MockCatalog {
        known: Vec<StreamId>,
        samples: Vec<StreamId>,
        canned: Option<BTreeSet<StreamId>>,
        fail: bool,
        sampled_answers: Mutex<Vec<(StreamId, bool)>>,
        calls: Mutex<usize>,
    }

    impl MockCatalog {
        fn with_streams(known: &[&str]) -> Self {
            Self {
                known: known.iter().copied().map(StreamId::from).collect(),
                ..Default::default()
            }
        }

        fn returning(canned: BTreeSet<StreamId>) -> Self {
            Self {
                canned: Some(canned),
                ..Default::default()
            }
        }

        fn sampling(mut self, samples: &[&str]) -> Self {
            self.samples = samples.iter().copied().map(StreamId::from).collect();
            self
        }

        fn answer_for(&self, id: &str) -> Option<bool> {
            self.sampled_answers
                .lock()
                .iter()
                .find(|(sampled, _)| sampled.as_str() == id)
                .map(|(_, answer)| *answer)
        }
    }

    #[async_trait]
    impl StreamCatalog for MockCatalog {
        async fn load_matching(&self, predicate: &StreamPredicate<'_>) -> Result<BTreeSet<StreamId>> {
            *self.calls.lock() += 1;
            if self.fail {
                return Err(LogscopeError::Catalog("stream store offline".to_string()));
            }
            for sampled in &self.samples {
                let answer = predicate(sampled);
                self.sampled_answers.lock().push((sampled.clone(), answer));
            }
            match &self.canned {
                Some(canned) => Ok(canned.clone()),
                None => Ok(self.known.iter().filter(|id| predicate(*id)).cloned().collect()),
            }
        }
    }

    #[derive(Default)]
    struct MockLookup {
        result: BTreeSet<MappedFieldType>,
        fail: bool,
        calls: Mutex<Vec<(BTreeSet<StreamId>, TimeRange)>>,
    }

    impl MockLookup {
        fn returning(result: BTreeSet<MappedFieldType>) -> Self {
            Self {
                result,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(BTreeSet<StreamId>, TimeRange)> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl TypeLookupService for MockLookup {
        async fn field_types_by_streams(
            &self,
            stream_ids: &BTreeSet<StreamId>,
            time_range: &TimeRange,
        ) -> Result<BTreeSet<MappedFieldType>> {
            self.calls.lock().push((stream_ids.clone(), time_range.clone()));
            if self.fail {
                return Err(LogscopeError::Lookup("index unavailable".to_string()));
            }
            Ok(self.result.clone())
        }
    }

    fn resolver(catalog: &Arc<MockCatalog>, lookup: &Arc<MockLookup>) -> FieldTypeResolver {
        FieldTypeResolver::new(catalog.clone(), lookup.clone())
    }

    // All permitted streams

    #[tokio::test]
    async fn test_all_field_types_checks_permissions_for_stream() {
        let catalog = Arc::new(MockCatalog::returning(BTreeSet::new()).sampling(&["2323", "4242"]));
        let lookup = Arc::new(MockLookup::default());
        let user = MockSearchUser::can_read(&["4242"]);

        resolver(&catalog, &lookup).resolve_all_permitted(&user).await.unwrap();

        assert_eq!(catalog.answer_for("2323"), Some(false));
        assert_eq!(catalog.answer_for("4242"), Some(true));
    }

    #[tokio::test]
    async fn test_all_field_types_returns_result_from_lookup() {
        let catalog = Arc::new(MockCatalog::returning(ids(&["2323", "4242"])));
        let lookup = Arc::new(MockLookup::returning(foobar_types()));
        let user = MockSearchUser::can_read(&[]);

        let result = resolver(&catalog, &lookup).resolve_all_permitted(&user).await.unwrap();

        assert_eq!(result, foobar_types());
        assert_eq!(lookup.calls(), vec![(ids(&["2323", "4242"]), TimeRange::AllTime)]);
    }

    #[tokio::test]
    async fn test_all_field_types_queries_only_permitted_streams() {
        let catalog = Arc::new(MockCatalog::with_streams(&["2323", "4242"]));
        let lookup = Arc::new(MockLookup::returning(foobar_types()));
        let user = MockSearchUser::can_read(&["4242"]);

        resolver(&catalog, &lookup).resolve_all_permitted(&user).await.unwrap();

        assert_eq!(*catalog.calls.lock(), 1);
        assert_eq!(lookup.calls(), vec![(ids(&["4242"]), TimeRange::AllTime)]);
    }

    #[tokio::test]
    async fn test_all_field_types_with_nothing_permitted_still_queries() {
        let catalog = Arc::new(MockCatalog::with_streams(&["2323", "4242"]));
        let lookup = Arc::new(MockLookup::default());
        let user = MockSearchUser::can_read(&[]);

        let result = resolver(&catalog, &lookup).resolve_all_permitted(&user).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(lookup.calls(), vec![(BTreeSet::new(), TimeRange::AllTime)]);
    }

    #[tokio::test]
    async fn test_all_field_types_propagates_catalog_failure() {
        let catalog = Arc::new(MockCatalog {
            fail: true,
            ..Default::default()
        });
        let lookup = Arc::new(MockLookup::default());
        let user = MockSearchUser::can_read(&["4242"]);

        let err = resolver(&catalog, &lookup).resolve_all_permitted(&user).await.unwrap_err();

        assert!(matches!(err, LogscopeError::Catalog(ref msg) if msg == "stream store offline"));
        assert!(lookup.calls().is_empty());
    }

    // Explicit streams

    #[tokio::test]
    async fn test_passes_requested_timerange_to_lookup() {
        let catalog = Arc::new(MockCatalog::default());
        let lookup = Arc::new(MockLookup::default());
        let user = MockSearchUser::can_read(&["2323", "4242"]);
        let request = FieldTypesForStreamsRequest::new(["2323", "4242"]).with_timerange(TimeRange::relative(300));

        resolver(&catalog, &lookup).resolve_for_streams(&request, &user).await.unwrap();

        let calls = lookup.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, TimeRange::relative(300));
        assert_eq!(*catalog.calls.lock(), 0);
    }

    #[tokio::test]
    async fn test_by_streams_checks_permissions_for_every_stream() {
        let catalog = Arc::new(MockCatalog::default());
        let lookup = Arc::new(MockLookup::default());
        let user = MockSearchUser::can_read(&["2323", "4242"]);
        let request = FieldTypesForStreamsRequest::new(["2323", "4242"]);

        resolver(&catalog, &lookup).resolve_for_streams(&request, &user).await.unwrap();

        let mut checked = user.checked();
        checked.sort();
        assert_eq!(checked, vec![StreamId::from("2323"), StreamId::from("4242")]);
    }

    #[tokio::test]
    async fn test_by_streams_returns_types_from_lookup() {
        let catalog = Arc::new(MockCatalog::default());
        let lookup = Arc::new(MockLookup::returning(foobar_types()));
        let user = MockSearchUser::can_read(&["2323", "4242"]);
        let request = FieldTypesForStreamsRequest::new(["2323", "4242"]);

        let result = resolver(&catalog, &lookup).resolve_for_streams(&request, &user).await.unwrap();

        assert_eq!(result, foobar_types());
        assert_eq!(lookup.calls(), vec![(ids(&["2323", "4242"]), TimeRange::AllTime)]);
    }

    #[tokio::test]
    async fn test_should_not_allow_access_without_permission() {
        let catalog = Arc::new(MockCatalog::default());
        let lookup = Arc::new(MockLookup::returning(foobar_types()));
        let user = MockSearchUser::can_read(&["4242"]);
        let request = FieldTypesForStreamsRequest::new(["2323", "4242"]);

        let err = resolver(&catalog, &lookup)
            .resolve_for_streams(&request, &user)
            .await
            .unwrap_err();

        match err {
            LogscopeError::MissingStreamPermission(denial) => {
                assert_eq!(denial.streams_with_missing_permissions(), &ids(&["2323"]));
            }
            other => panic!("expected a stream permission denial, got {:?}", other),
        }
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn test_denial_reports_every_unauthorized_stream() {
        let catalog = Arc::new(MockCatalog::default());
        let lookup = Arc::new(MockLookup::default());
        let user = MockSearchUser::can_read(&["4242"]);
        let request = FieldTypesForStreamsRequest::new(["1111", "2323", "4242", "9999"]);

        let err = resolver(&catalog, &lookup)
            .resolve_for_streams(&request, &user)
            .await
            .unwrap_err();

        let LogscopeError::MissingStreamPermission(denial) = err else {
            panic!("expected a stream permission denial");
        };
        assert_eq!(denial.into_streams(), ids(&["1111", "2323", "9999"]));
        assert_eq!(user.checked().len(), 4);
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_streams_collapse_before_checking() {
        let catalog = Arc::new(MockCatalog::default());
        let lookup = Arc::new(MockLookup::default());
        let user = MockSearchUser::can_read(&[]);
        let request: FieldTypesForStreamsRequest =
            serde_json::from_str(r#"{"streams": ["2323", "2323", "4242"]}"#).unwrap();

        let err = resolver(&catalog, &lookup)
            .resolve_for_streams(&request, &user)
            .await
            .unwrap_err();

        let LogscopeError::MissingStreamPermission(denial) = err else {
            panic!("expected a stream permission denial");
        };
        assert_eq!(denial.streams_with_missing_permissions(), &ids(&["2323", "4242"]));
        assert_eq!(user.checked().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_request_queries_lookup_once() {
        let catalog = Arc::new(MockCatalog::default());
        let lookup = Arc::new(MockLookup::default());
        let user = MockSearchUser::can_read(&[]);
        let request = FieldTypesForStreamsRequest::default();

        let result = resolver(&catalog, &lookup).resolve_for_streams(&request, &user).await.unwrap();

        assert!(result.is_empty());
        assert!(user.checked().is_empty());
        assert_eq!(lookup.calls(), vec![(BTreeSet::new(), TimeRange::AllTime)]);
    }

    #[tokio::test]
    async fn test_omitted_timerange_equals_all_time() {
        let catalog = Arc::new(MockCatalog::default());
        let user = MockSearchUser::can_read(&["4242"]);

        let omitted = Arc::new(MockLookup::default());
        resolver(&catalog, &omitted)
            .resolve_for_streams(&FieldTypesForStreamsRequest::new(["4242"]), &user)
            .await
            .unwrap();

        let explicit = Arc::new(MockLookup::default());
        resolver(&catalog, &explicit)
            .resolve_for_streams(
                &FieldTypesForStreamsRequest::new(["4242"]).with_timerange(TimeRange::all_time()),
                &user,
            )
            .await
            .unwrap();

        assert_eq!(omitted.calls(), explicit.calls());
    }

    #[tokio::test]
    async fn test_by_streams_propagates_lookup_failure() {
        let catalog = Arc::new(MockCatalog::default());
        let lookup = Arc::new(MockLookup {
            fail: true,
            ..Default::default()
        });
        let user = MockSearchUser::can_read(&["4242"]);

        let err = resolver(&catalog, &lookup)
            .resolve_for_streams(&FieldTypesForStreamsRequest::new(["4242"]), &user)
            .await
            .unwrap_err();

        assert!(matches!(err, LogscopeError::Lookup(ref msg) if msg == "index unavailable"));
        assert_eq!(lookup.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_are_independent() {
        let catalog = Arc::new(MockCatalog::with_streams(&["2323", "4242"]));
        let lookup = Arc::new(MockLookup::returning(foobar_types()));
        let resolver = resolver(&catalog, &lookup);

        let reader = MockSearchUser::can_read(&["2323", "4242"]);
        let outsider = MockSearchUser::can_read(&[]);
        let request = FieldTypesForStreamsRequest::new(["2323"]);

        let (allowed, denied) = tokio::join!(
            resolver.resolve_for_streams(&request, &reader),
            resolver.resolve_for_streams(&request, &outsider),
        );

        assert_eq!(allowed.unwrap(), foobar_types());
        assert!(matches!(denied, Err(LogscopeError::MissingStreamPermission(_))));
        assert_eq!(lookup.calls().len(), 1);
    }
}
