//! Source trait and registry
//!
//! A `Source` is the unit a pipeline host pulls records from. Hosts keep
//! named factories in a `SourceRegistry` and create sources from a locator
//! query string such as `repo=octocat/hello-world&endpoint=commits`.

use crate::engine::PagedFetcher;
use crate::error::{Error, Result};
use crate::types::{Record, RequestTarget};
use async_trait::async_trait;
use futures::Stream;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::pin::Pin;
use url::form_urlencoded;

/// Registered name of the GitHub collection source
pub const GITHUB_SOURCE: &str = "github";

/// Built-in sources with a one-line description
pub const BUILTIN_SOURCES: &[(&str, &str)] = &[(
    GITHUB_SOURCE,
    "Paginated GitHub REST collection, e.g. repo=owner/name&endpoint=commits",
)];

/// Lazy, finite stream of records
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<Record>> + Send>>;

// ============================================================================
// Source Trait
// ============================================================================

/// Something that produces records in batches
#[async_trait]
pub trait Source: Send {
    /// Registered name of this source
    fn name(&self) -> &str;

    /// Produce the next batch, or `None` when exhausted
    async fn next_batch(&mut self) -> Result<Option<Vec<Record>>>;
}

type Buffered = (Box<dyn Source>, VecDeque<Record>);

async fn next_record(
    mut source: Box<dyn Source>,
    mut buffer: VecDeque<Record>,
) -> Result<Option<(Record, Buffered)>> {
    loop {
        if let Some(record) = buffer.pop_front() {
            return Ok(Some((record, (source, buffer))));
        }
        match source.next_batch().await? {
            Some(batch) => buffer.extend(batch),
            None => return Ok(None),
        }
    }
}

/// Flatten a source into a record stream
///
/// The next batch is requested only once the previous one has been drained.
pub fn into_record_stream(source: Box<dyn Source>) -> RecordStream {
    Box::pin(futures::stream::try_unfold(
        (source, VecDeque::new()),
        |(source, buffer)| next_record(source, buffer),
    ))
}

// ============================================================================
// Source Parameters
// ============================================================================

/// Parameters decoded from a source locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceParams {
    /// Collection identifier (`repo`)
    pub collection: String,
    /// Sub-resource name (`endpoint`)
    pub subresource: String,
    /// Any other key/value pairs, kept for custom sources
    pub extra: BTreeMap<String, String>,
}

impl SourceParams {
    /// Create parameters directly
    pub fn new(collection: impl Into<String>, subresource: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            subresource: subresource.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Parse a locator query string
    ///
    /// Accepts `repo=..&endpoint=..` (or `collection`/`subresource`), with or
    /// without a leading `?` or `scheme://host?` prefix.
    pub fn from_locator(locator: &str) -> Result<Self> {
        let query = locator
            .split_once('?')
            .map_or(locator, |(_, query)| query);

        let mut collection = None;
        let mut subresource = None;
        let mut extra = BTreeMap::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "repo" | "collection" => collection = Some(value.into_owned()),
                "endpoint" | "subresource" => subresource = Some(value.into_owned()),
                _ => {
                    extra.insert(key.into_owned(), value.into_owned());
                }
            }
        }

        let collection = collection
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::missing_field("repo"))?;
        let subresource = subresource
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::missing_field("endpoint"))?;

        Ok(Self {
            collection,
            subresource,
            extra,
        })
    }

    /// Encode back into a locator query string
    pub fn to_locator(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("repo", &self.collection);
        serializer.append_pair("endpoint", &self.subresource);
        for (key, value) in &self.extra {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// The request target these parameters describe
    pub fn target(&self) -> Result<RequestTarget> {
        RequestTarget::new(&self.collection, &self.subresource)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Builds a source from its parameters
pub type SourceFactory = Box<dyn Fn(&SourceParams) -> Result<Box<dyn Source>> + Send + Sync>;

/// Plugin table mapping source names to factories
#[derive(Default)]
pub struct SourceRegistry {
    factories: HashMap<String, SourceFactory>,
}

impl SourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the GitHub source backed by `fetcher`
    pub fn with_github(fetcher: PagedFetcher) -> Self {
        let mut registry = Self::new();
        registry.register(GITHUB_SOURCE, move |params: &SourceParams| {
            let cursor = fetcher.pages(&params.collection, &params.subresource)?;
            Ok(Box::new(cursor) as Box<dyn Source>)
        });
        registry
    }

    /// Register a factory, replacing any previous one with the same name
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&SourceParams) -> Result<Box<dyn Source>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Check if a source is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Create a source from parsed parameters
    pub fn create_with(&self, name: &str, params: &SourceParams) -> Result<Box<dyn Source>> {
        let factory = self.factories.get(name).ok_or_else(|| Error::SourceNotFound {
            name: name.to_string(),
        })?;
        factory(params)
    }

    /// Create a source from a locator query string
    pub fn create(&self, name: &str, locator: &str) -> Result<Box<dyn Source>> {
        let params = SourceParams::from_locator(locator)?;
        self.create_with(name, &params)
    }

    /// Create a source and flatten it into a record stream
    pub fn stream(&self, name: &str, locator: &str) -> Result<RecordStream> {
        Ok(into_record_stream(self.create(name, locator)?))
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serves a fixed list of batches
    struct StaticSource {
        batches: VecDeque<Vec<Record>>,
        calls: Arc<AtomicUsize>,
    }

    impl StaticSource {
        fn new(batches: Vec<Vec<Record>>) -> Self {
            Self {
                batches: batches.into(),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl Source for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn next_batch(&mut self) -> Result<Option<Vec<Record>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.batches.pop_front())
        }
    }

    /// Yields one batch, then fails
    struct FailingSource {
        served: bool,
    }

    #[async_trait]
    impl Source for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        async fn next_batch(&mut self) -> Result<Option<Vec<Record>>> {
            if self.served {
                return Err(Error::http_status(502, "bad gateway"));
            }
            self.served = true;
            Ok(Some(vec![json!({"id": 1})]))
        }
    }

    // ------------------------------------------------------------------------
    // Locator parsing
    // ------------------------------------------------------------------------

    #[test]
    fn test_from_locator() {
        let params =
            SourceParams::from_locator("repo=octocat/hello-world&endpoint=commits").unwrap();
        assert_eq!(params.collection, "octocat/hello-world");
        assert_eq!(params.subresource, "commits");
        assert!(params.extra.is_empty());
    }

    #[test]
    fn test_from_locator_with_prefix_and_aliases() {
        let locator = "github://source?collection=a%2Fb&subresource=issues&state=open";
        let params = SourceParams::from_locator(locator).unwrap();
        assert_eq!(params.collection, "a/b");
        assert_eq!(params.subresource, "issues");
        assert_eq!(params.extra.get("state").map(String::as_str), Some("open"));

        let params = SourceParams::from_locator("?repo=a/b&endpoint=pulls").unwrap();
        assert_eq!(params.subresource, "pulls");
    }

    #[test]
    fn test_from_locator_missing_keys() {
        let err = SourceParams::from_locator("endpoint=commits").unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "repo"));

        let err = SourceParams::from_locator("repo=a/b&endpoint=").unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "endpoint"));
    }

    #[test]
    fn test_locator_round_trip() {
        let mut params = SourceParams::new("octocat/hello world", "commits");
        params.extra.insert("since".to_string(), "2024-01-01".to_string());

        let parsed = SourceParams::from_locator(&params.to_locator()).unwrap();
        assert_eq!(parsed, params);
    }

    #[test]
    fn test_params_target() {
        let target = SourceParams::new("a/b", "issues").target().unwrap();
        assert_eq!(target.path(), "repos/a/b/issues");
    }

    // ------------------------------------------------------------------------
    // Record streams
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_into_record_stream_flattens_in_order() {
        let source = StaticSource::new(vec![
            vec![json!(1), json!(2)],
            vec![json!(3)],
        ]);

        let records: Vec<Record> = into_record_stream(Box::new(source))
            .try_collect()
            .await
            .unwrap();
        assert_eq!(records, vec![json!(1), json!(2), json!(3)]);
    }

    #[tokio::test]
    async fn test_into_record_stream_is_lazy() {
        use futures::StreamExt;

        let source = StaticSource::new(vec![vec![json!(1), json!(2)], vec![json!(3)]]);
        let calls = Arc::clone(&source.calls);
        let mut stream = into_record_stream(Box::new(source));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(stream.next().await.unwrap().unwrap(), json!(1));
        assert_eq!(stream.next().await.unwrap().unwrap(), json!(2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(stream.next().await.unwrap().unwrap(), json!(3));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(stream.next().await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_into_record_stream_stops_after_error() {
        use futures::StreamExt;

        let mut stream = into_record_stream(Box::new(FailingSource { served: false }));

        assert_eq!(stream.next().await.unwrap().unwrap(), json!({"id": 1}));
        let err = stream.next().await.unwrap().unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert!(stream.next().await.is_none());
    }

    // ------------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------------

    fn static_registry() -> SourceRegistry {
        let mut registry = SourceRegistry::new();
        registry.register("static", |params: &SourceParams| {
            let record = json!({
                "collection": params.collection,
                "subresource": params.subresource,
            });
            Ok(Box::new(StaticSource::new(vec![vec![record]])) as Box<dyn Source>)
        });
        registry
    }

    #[tokio::test]
    async fn test_registry_create_and_stream() {
        let registry = static_registry();
        assert!(registry.contains("static"));

        let records: Vec<Record> = registry
            .stream("static", "repo=a/b&endpoint=issues")
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(
            records,
            vec![json!({"collection": "a/b", "subresource": "issues"})]
        );
    }

    #[test]
    fn test_registry_unknown_source() {
        let registry = static_registry();
        let err = registry.create("gitlab", "repo=a/b&endpoint=issues").err().unwrap();
        assert!(matches!(err, Error::SourceNotFound { ref name } if name == "gitlab"));
    }

    #[test]
    fn test_registry_bad_locator() {
        let registry = static_registry();
        let err = registry.create("static", "endpoint=issues").err().unwrap();
        assert!(err.is_config());
    }

    #[test]
    fn test_registry_names_sorted() {
        let mut registry = static_registry();
        registry.register("alpha", |_params: &SourceParams| {
            Ok(Box::new(StaticSource::new(vec![])) as Box<dyn Source>)
        });

        assert_eq!(registry.names(), vec!["alpha", "static"]);
        assert!(format!("{registry:?}").contains("alpha"));
    }

    #[test]
    fn test_builtin_sources_match_registry() {
        let credentials = crate::auth::Credentials::new(None, "t0k");
        let fetcher = PagedFetcher::new(crate::engine::FetchConfig::new(credentials)).unwrap();
        let registry = SourceRegistry::with_github(fetcher);

        let builtin: Vec<&str> = BUILTIN_SOURCES.iter().map(|(name, _)| *name).collect();
        assert_eq!(builtin, registry.names());
    }
}
