//! Execution engine module
//!
//! Paginated fetch loop.
//!
//! # Overview
//!
//! - `PagedFetcher` - owns the authenticated client and pagination settings
//! - `PageCursor` - walks one collection endpoint page by page
//! - `PagedFetcher::fetch_all` - the cursor flattened into a lazy record stream
//!
//! Pages are requested strictly one after another. Nothing is fetched until
//! the consumer asks for the next record, and dropping the stream or cursor
//! stops further requests.

mod types;

pub use types::{CheckResult, FetchConfig};

use crate::auth::AuthConfig;
use crate::decode::{JsonDecoder, Page, RecordDecoder};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::pagination::{NextPage, PageNumberPaginator, PaginationState, Paginator};
use crate::source::{into_record_stream, RecordStream, Source, GITHUB_SOURCE};
use crate::types::{QueryParams, Record, RequestTarget};
use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;
use tracing::{debug, info};

/// Fetches paginated collections from the provider
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct PagedFetcher {
    client: Arc<HttpClient>,
    paginator: PageNumberPaginator,
    decoder: JsonDecoder,
}

impl PagedFetcher {
    /// Create a fetcher
    ///
    /// Fails with a configuration error when no usable token is present,
    /// before any request is made.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let credentials = config
            .credentials
            .ok_or_else(|| Error::missing_credential("token"))?;

        if config.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than 0"));
        }

        let mut http = HttpClientConfig::builder().base_url(config.base_url);
        for (key, value) in config.headers {
            http = http.header(key, value);
        }
        if let Some(timeout) = config.timeout {
            http = http.timeout(timeout);
        }
        if let Some(rate_limit) = config.rate_limit {
            http = http.rate_limit(rate_limit);
        }

        let client = HttpClient::with_auth(
            http.build(),
            AuthConfig::token(config.auth_scheme, credentials),
        )?;

        let paginator = PageNumberPaginator::github(config.page_size)
            .with_stop_condition(config.stop_condition);

        Ok(Self {
            client: Arc::new(client),
            paginator,
            decoder: JsonDecoder::new(),
        })
    }

    /// The underlying HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// The paginator used for every cursor
    pub fn paginator(&self) -> &PageNumberPaginator {
        &self.paginator
    }

    /// Open a page-at-a-time cursor over `repos/{collection}/{subresource}`
    pub fn pages(&self, collection: &str, subresource: &str) -> Result<PageCursor> {
        let target = RequestTarget::new(collection, subresource)?;
        Ok(PageCursor::new(self.clone(), target))
    }

    /// Lazily yield every record of `repos/{collection}/{subresource}`
    ///
    /// Upstream order is preserved. The stream yields at most one error
    /// and then ends; records yielded before it stay yielded.
    pub fn fetch_all(&self, collection: &str, subresource: &str) -> Result<RecordStream> {
        let cursor = self.pages(collection, subresource)?;
        Ok(into_record_stream(Box::new(cursor)))
    }

    /// Issue a single request for the first record and report the outcome
    ///
    /// A non-2xx status is reported in the result rather than as an error.
    pub async fn check(&self, collection: &str, subresource: &str) -> Result<CheckResult> {
        let target = RequestTarget::new(collection, subresource)?;

        let params = self.paginator.first_page_params(1);

        info!(resource = %target, "Checking connection");
        let response = self
            .client
            .send(
                Method::GET,
                &target.path(),
                RequestConfig::new().queries(params),
            )
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Ok(CheckResult::failure(status.as_u16(), body));
        }

        let sample = self.decoder.decode(&body)?.into_records().into_iter().next();
        Ok(CheckResult::success(status.as_u16(), sample))
    }

    async fn fetch_page(
        &self,
        target: &RequestTarget,
        params: QueryParams,
    ) -> Result<Page> {
        let response = self
            .client
            .get_with_config(&target.path(), RequestConfig::new().queries(params))
            .await?;
        let body = response.text().await?;
        self.decoder.decode(&body)
    }
}

/// Walks one collection endpoint page by page
///
/// Finite and not restartable: once it has returned `None` or an error,
/// it makes no further requests.
#[derive(Debug)]
pub struct PageCursor {
    fetcher: PagedFetcher,
    target: RequestTarget,
    state: PaginationState,
    next_params: QueryParams,
}

impl PageCursor {
    fn new(fetcher: PagedFetcher, target: RequestTarget) -> Self {
        let state = PaginationState::new();
        let next_params = fetcher.paginator.initial_params(&state);
        Self {
            fetcher,
            target,
            state,
            next_params,
        }
    }

    /// What this cursor fetches
    pub fn target(&self) -> &RequestTarget {
        &self.target
    }

    /// Pagination progress so far
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// True once the cursor will make no more requests
    pub fn is_done(&self) -> bool {
        self.state.done
    }

    /// Query parameters of the next request
    pub fn next_params(&self) -> &QueryParams {
        &self.next_params
    }

    /// Fetch the next non-empty page, or `None` at the end of the data
    pub async fn next_page(&mut self) -> Result<Option<Vec<Record>>> {
        if self.state.done {
            return Ok(None);
        }

        let page_number = self.fetcher.paginator.current_page(&self.state);
        let params = self.next_params.clone();

        info!(
            collection = %self.target.collection,
            subresource = %self.target.subresource,
            page = page_number,
            "Fetching page"
        );

        self.state.add_request();
        let page = match self.fetcher.fetch_page(&self.target, params).await {
            Ok(page) => page,
            Err(e) => {
                self.state.mark_done();
                return Err(e);
            }
        };

        // A single object is the whole resource; there is nothing to page through.
        if page.is_single() {
            self.state.add_fetched(1);
            self.state.mark_done();
            debug!(resource = %self.target, "Single object response, not paginating");
            return Ok(Some(page.into_records()));
        }

        let count = page.len();
        match self.fetcher.paginator.process_page(count, &mut self.state) {
            NextPage::Continue { query_params } => self.next_params = query_params,
            NextPage::Done => self.state.mark_done(),
        }

        if count == 0 {
            debug!(
                resource = %self.target,
                pages = self.state.requests,
                records = self.state.total_fetched,
                "Reached end of data"
            );
            return Ok(None);
        }

        debug!(resource = %self.target, page = page_number, records = count, "Fetched page");
        Ok(Some(page.into_records()))
    }
}

#[async_trait]
impl Source for PageCursor {
    fn name(&self) -> &str {
        GITHUB_SOURCE
    }

    async fn next_batch(&mut self) -> Result<Option<Vec<Record>>> {
        self.next_page().await
    }
}
