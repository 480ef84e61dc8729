//! HTTP data source for the Art Institute of Chicago artworks API.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;
use url::Url;

use super::DataSource;
use crate::ArticConfig;
use crate::error::FetchError;
use crate::model::Entity;
use crate::model::Page;

/// Fetches artworks page by page from `GET {base}/api/v1/artworks`.
///
/// # Example
///
/// ```ignore
/// use pageselect_lib::ArticConfig;
/// use pageselect_lib::source::{ArticSource, DataSource};
///
/// let source = ArticSource::new(ArticConfig::default())?;
/// let page = source.fetch_page(1, 12).await?;
/// println!("{} artworks in total", page.total_count());
/// ```
#[derive(Debug, Clone)]
pub struct ArticSource {
    client: Client,
    config: ArticConfig,
}

impl ArticSource {
    /// Creates a source with its own HTTP client.
    pub fn new(config: ArticConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a source using an existing HTTP client.
    pub fn with_client(client: Client, config: ArticConfig) -> Self {
        Self { client, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ArticConfig {
        &self.config
    }

    /// Builds the URL for one page.
    pub fn page_url(&self, page_index: usize, page_size: usize) -> Result<Url, FetchError> {
        let endpoint = format!("{}/api/v1/artworks", self.config.base_url.trim_end_matches('/'));
        let mut url = Url::parse(&endpoint).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", endpoint, e)))?;
        url.query_pairs_mut()
            .append_pair("page", &page_index.to_string())
            .append_pair("limit", &page_size.to_string())
            .append_pair("fields", &self.config.fields_param());
        Ok(url)
    }

    /// Parses an artworks listing body into a page.
    ///
    /// `requested` is used when the response omits `current_page`.
    pub fn parse_page(&self, body: &str, requested: usize) -> Result<Page, FetchError> {
        let response: ArtworksResponse = serde_json::from_str(body)
            .map_err(|e| FetchError::parse_with_body(e.to_string(), body))?;

        let entities = response
            .data
            .into_iter()
            .map(|record| Entity::from_record(record, &self.config.identity_field))
            .collect::<Result<Vec<_>, _>>()?;

        let pagination = response.pagination;
        if pagination.limit == 0 {
            return Err(FetchError::parse_with_body("pagination limit is 0", body));
        }
        Ok(Page::new(
            pagination.current_page.unwrap_or(requested),
            pagination.limit,
            pagination.total,
            entities,
        ))
    }
}

#[async_trait]
impl DataSource for ArticSource {
    async fn fetch_page(&self, page_index: usize, page_size: usize) -> Result<Page, FetchError> {
        let url = self.page_url(page_index, page_size)?;
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, self.config.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_transport(e, self.config.timeout))?;

        if !status.is_success() {
            return Err(FetchError::http(status.as_u16(), error_message(&body)));
        }

        self.parse_page(&body, page_index)
    }
}

/// Artworks listing response.
#[derive(Debug, Deserialize)]
struct ArtworksResponse {
    data: Vec<Map<String, Value>>,
    pagination: Pagination,
}

/// Pagination block of a listing response.
#[derive(Debug, Deserialize)]
struct Pagination {
    total: usize,
    limit: usize,
    current_page: Option<usize>,
}

/// Error bodies look like `{"status": 403, "error": "...", "detail": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Some(detail), ..
        }) => detail,
        Ok(ErrorBody { error: Some(error), .. }) => error,
        _ => body.to_string(),
    }
}
