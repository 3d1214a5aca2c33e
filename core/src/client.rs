//! Content API client: request building, response parsing and the
//! per-resource queries built on top of them.
//!
//! # Design
//! `ContentClient` holds only a `base_url` and a `Transport`; it carries no
//! mutable state between calls, so clones can be used from any number of
//! tasks at once. Each round-trip is split into `build_request` (pure URL
//! construction) and `parse_response` (status check + JSON decode), with
//! the transport executing the request in between. The resource helpers
//! add default parameters and normalize the reply through `Envelope`.

use serde_json::Value;
use tracing::{debug, error, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::envelope::Envelope;
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse, HttpTransport, Transport};
use crate::query::{ParamValue, QueryParams, LIMIT, SORT};
use crate::types::{Item, Resource};

/// Read-only client for a Strapi-style content API.
#[derive(Debug, Clone)]
pub struct ContentClient<T = HttpTransport> {
    base_url: String,
    transport: T,
}

impl ContentClient<HttpTransport> {
    /// Validate the configured base URL and build a reqwest-backed client.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::with_transport(&config.base_url, transport))
    }
}

impl<T: Transport> ContentClient<T> {
    /// Use an arbitrary transport. The base URL is not validated here; a bad
    /// one surfaces as `ApiError::InvalidUrl` from the first request.
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the GET request for `base_url + path` with `params` appended in
    /// insertion order. Unset parameters are left out.
    pub fn build_request(&self, path: &str, params: &QueryParams) -> Result<HttpRequest> {
        let raw = join(&self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params.iter() {
                pairs.append_pair(key, &value.to_string());
            }
        }

        Ok(HttpRequest {
            url: url.into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        })
    }

    /// Check the status and decode the body as JSON.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value> {
        if !response.is_success() {
            error!(
                status = response.status,
                status_text = %response.status_text,
                "content API returned an error status"
            );
            return Err(ApiError::Transport {
                status: response.status,
                status_text: response.status_text,
            });
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Issue a GET for `path` and return the decoded JSON body.
    #[instrument(skip_all, fields(path = %path))]
    pub async fn request(&self, path: &str, params: &QueryParams) -> Result<Value> {
        let request = self.build_request(path, params)?;
        debug!(url = %request.url, "GET");
        let response = self.transport.execute(request).await?;
        self.parse_response(response)
    }

    /// Absolute URL for a media path returned by the API.
    pub fn media_url(&self, path: &str) -> String {
        media_url(&self.base_url, path)
    }

    /// List a collection with its default sort, overridden by `overrides`.
    pub async fn list(&self, resource: Resource, overrides: QueryParams) -> Result<Vec<Item>> {
        let body = self.request(resource.path(), &list_query(resource, overrides)).await?;
        let items = Envelope::from_value(body).into_items();
        debug!(?resource, count = items.len(), "listed items");
        Ok(items)
    }

    /// Entry whose `id` equals `id`.
    pub async fn find_by_id(&self, resource: Resource, id: impl Into<ParamValue>) -> Result<Option<Item>> {
        self.find_first(resource, id_query(id)).await
    }

    /// Entry with the given slug. An empty slug returns `None` without a
    /// request.
    pub async fn find_by_slug(&self, resource: Resource, slug: &str) -> Result<Option<Item>> {
        if slug.is_empty() {
            debug!(?resource, "empty slug, skipping lookup");
            return Ok(None);
        }
        self.find_first(resource, slug_query(slug)).await
    }

    /// The entry flagged `is_hero`.
    pub async fn find_hero(&self, resource: Resource) -> Result<Option<Item>> {
        self.find_first(resource, hero_query()).await
    }

    async fn find_first(&self, resource: Resource, params: QueryParams) -> Result<Option<Item>> {
        let body = self.request(resource.path(), &params).await?;
        let item = Envelope::from_value(body).into_first();
        debug!(?resource, found = item.is_some(), "singleton lookup");
        Ok(item)
    }

    pub async fn news(&self, overrides: QueryParams) -> Result<Vec<Item>> {
        self.list(Resource::News, overrides).await
    }

    pub async fn news_by_id(&self, id: impl Into<ParamValue>) -> Result<Option<Item>> {
        self.find_by_id(Resource::News, id).await
    }

    pub async fn news_by_slug(&self, slug: &str) -> Result<Option<Item>> {
        self.find_by_slug(Resource::News, slug).await
    }

    pub async fn bulletins(&self, overrides: QueryParams) -> Result<Vec<Item>> {
        self.list(Resource::Bulletins, overrides).await
    }

    pub async fn hero_bulletin(&self) -> Result<Option<Item>> {
        self.find_hero(Resource::Bulletins).await
    }

    pub async fn blogs(&self, overrides: QueryParams) -> Result<Vec<Item>> {
        self.list(Resource::Blogs, overrides).await
    }

    pub async fn blog_by_slug(&self, slug: &str) -> Result<Option<Item>> {
        self.find_by_slug(Resource::Blogs, slug).await
    }

    pub async fn activities(&self, overrides: QueryParams) -> Result<Vec<Item>> {
        self.list(Resource::Activities, overrides).await
    }

    pub async fn activity_by_slug(&self, slug: &str) -> Result<Option<Item>> {
        self.find_by_slug(Resource::Activities, slug).await
    }
}

/// Parameters for a collection listing: the resource's default sort with
/// `overrides` merged on top.
pub fn list_query(resource: Resource, overrides: QueryParams) -> QueryParams {
    QueryParams::new()
        .with(SORT, resource.default_sort())
        .merge(overrides)
}

pub fn id_query(id: impl Into<ParamValue>) -> QueryParams {
    QueryParams::new().with("id", id)
}

pub fn slug_query(slug: &str) -> QueryParams {
    QueryParams::new().with("slug", slug).with(LIMIT, 1)
}

pub fn hero_query() -> QueryParams {
    QueryParams::new().with("is_hero", true).with(LIMIT, 1)
}

/// `path` unchanged when it already carries a scheme, otherwise prefixed
/// with `base_url`. Empty in, empty out.
pub fn media_url(base_url: &str, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    if has_scheme(path) {
        return path.to_string();
    }
    join(base_url.trim_end_matches('/'), path)
}

fn join(base_url: &str, path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}/{path}")
    }
}

/// Parses as an absolute URL, so any scheme counts (`https:`, `data:`,
/// `blob:`). Paths without one fail with `RelativeUrlWithoutBase`.
fn has_scheme(path: &str) -> bool {
    Url::parse(path).is_ok()
}
