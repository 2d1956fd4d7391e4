//! Page walker
//!
//! [`Paginator::walk`] is a lazy, pull-based stream: the next page is only
//! requested once the consumer has drained the rows of the current one.

use super::types::{Page, PageCursor, PaginationConfig};
use crate::context::ExtractionContext;
use crate::decode::{JsonDecoder, RecordDecoder};
use crate::error::{Error, Result};
use crate::http::{HttpRequest, Transport};
use crate::template::render_path;
use crate::types::JsonObject;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Longest response body excerpt quoted in a fetch error
const BODY_EXCERPT_LEN: usize = 200;

/// Walks paginated collections below a base URL
pub struct Paginator {
    transport: Arc<dyn Transport>,
    base_url: String,
    headers: Vec<(String, String)>,
    config: PaginationConfig,
    decoder: JsonDecoder,
    requests: AtomicU64,
}

/// Unfold state for one walk
struct Walk {
    path: String,
    query: Vec<(String, String)>,
    cursor: PageCursor,
}

impl Paginator {
    /// Create a paginator
    ///
    /// `headers` (usually the authenticator's) are sent with every request.
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        headers: Vec<(String, String)>,
        config: PaginationConfig,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
            headers,
            config,
            decoder: JsonDecoder::new(),
            requests: AtomicU64::new(0),
        }
    }

    /// Pagination settings
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Number of requests issued so far
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Walk every page of `path_template` rendered with `context`
    ///
    /// `query` is sent with every page request after the page parameters.
    /// Any failure ends the stream with a single `Err`.
    pub fn walk<'a>(
        &'a self,
        resource: &'a str,
        path_template: &str,
        context: &ExtractionContext,
        query: Vec<(String, String)>,
    ) -> BoxStream<'a, Result<JsonObject>> {
        let path = match render_path(resource, path_template, context) {
            Ok(path) => path,
            Err(e) => return stream::once(async move { Err(e) }).boxed(),
        };

        let walk = Walk {
            path,
            query,
            cursor: PageCursor::start(),
        };

        stream::try_unfold(walk, move |mut walk| async move {
            let PageCursor::Fetching { page } = walk.cursor else {
                return Ok::<_, Error>(None);
            };
            let page = self.fetch_page(resource, &walk.path, &walk.query, page).await?;
            walk.cursor = page.next_cursor();
            Ok(Some((page.rows, walk)))
        })
        .map_ok(|rows| stream::iter(rows.into_iter().map(Ok)))
        .try_flatten()
        .boxed()
    }

    /// Fetch and decode a single page of a rendered path
    pub async fn fetch_page(
        &self,
        resource: &str,
        path: &str,
        query: &[(String, String)],
        page: u32,
    ) -> Result<Page> {
        let mut request = HttpRequest::get(format!("{}{}", self.base_url, path))
            .headers(self.headers.iter().cloned())
            .query(&self.config.page_param, page.to_string())
            .query(&self.config.page_size_param, self.config.page_size.to_string());
        for (key, value) in query {
            request = request.query(key, value);
        }

        self.requests.fetch_add(1, Ordering::Relaxed);
        debug!("Fetching {} page {} ({})", resource, page, path);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| Error::fetch(resource, path, e.to_string()))?;

        if !response.is_success() {
            return Err(Error::fetch(
                resource,
                path,
                format!("HTTP {}: {}", response.status, excerpt(&response.body)),
            ));
        }

        let total_pages = match response.header(&self.config.total_pages_header) {
            None => 1,
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                Error::fetch(
                    resource,
                    path,
                    format!("invalid {} header: {raw:?}", self.config.total_pages_header),
                )
            })?,
        };

        let rows = self
            .decoder
            .decode(&response.body)
            .map_err(|e| Error::fetch(resource, path, e.to_string()))?;

        debug!(
            "{} page {}/{} returned {} rows",
            resource,
            page,
            total_pages,
            rows.len()
        );

        Ok(Page {
            rows,
            page,
            total_pages,
        })
    }
}

impl std::fmt::Debug for Paginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .field("requests", &self.requests())
            .finish_non_exhaustive()
    }
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
