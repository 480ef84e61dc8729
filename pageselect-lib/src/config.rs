//! Session and source configuration

use std::time::Duration;

/// Configuration for a selection session.
///
/// # Example
///
/// ```
/// use pageselect_lib::SessionConfig;
///
/// let config = SessionConfig::default()
///     .with_page_size(25)
///     .with_rewind_after_sweep(false);
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Rows requested per page.
    ///
    /// Default: 12
    pub page_size: usize,

    /// Whether to navigate back to page 1 once a target-driven sweep ends,
    /// so the user sees the selection from the start.
    ///
    /// Default: true
    pub rewind_after_sweep: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            rewind_after_sweep: true,
        }
    }
}

impl SessionConfig {
    /// Creates a session config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size. Zero is raised to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets whether a finished sweep navigates back to page 1.
    pub fn with_rewind_after_sweep(mut self, rewind: bool) -> Self {
        self.rewind_after_sweep = rewind;
        self
    }
}

/// Fields requested from the artworks endpoint by default.
pub const DEFAULT_ARTWORK_FIELDS: &[&str] = &[
    "id",
    "title",
    "place_of_origin",
    "artist_display",
    "inscriptions",
    "date_start",
    "date_end",
];

/// Configuration for [`ArticSource`](crate::source::ArticSource).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use pageselect_lib::ArticConfig;
///
/// let config = ArticConfig::default()
///     .with_base_url("http://localhost:8080")
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ArticConfig {
    /// API origin, without the `/api/v1` path.
    ///
    /// Default: `https://api.artic.edu`
    pub base_url: String,

    /// Per-request timeout.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,

    /// Fields to request for each artwork.
    pub fields: Vec<String>,

    /// Field holding the unique record identity.
    ///
    /// Default: `id`
    pub identity_field: String,
}

impl Default for ArticConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.artic.edu".to_string(),
            timeout: Duration::from_secs(30),
            fields: DEFAULT_ARTWORK_FIELDS.iter().map(|f| f.to_string()).collect(),
            identity_field: "id".to_string(),
        }
    }
}

impl ArticConfig {
    /// Sets the API origin.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the requested fields. The identity field is always requested.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the identity field.
    pub fn with_identity_field(mut self, field: impl Into<String>) -> Self {
        self.identity_field = field.into();
        self
    }

    /// Returns the `fields` query value, with the identity field first.
    pub fn fields_param(&self) -> String {
        let mut fields = vec![self.identity_field.as_str()];
        fields.extend(
            self.fields
                .iter()
                .map(String::as_str)
                .filter(|f| *f != self.identity_field),
        );
        fields.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_floor() {
        assert_eq!(SessionConfig::default().with_page_size(0).page_size, 1);
    }

    #[test]
    fn test_fields_param_includes_identity_once() {
        let config = ArticConfig::default().with_fields(["title", "id"]);
        assert_eq!(config.fields_param(), "id,title");

        let config = ArticConfig::default()
            .with_identity_field("api_link")
            .with_fields(["title"]);
        assert_eq!(config.fields_param(), "api_link,title");
    }
}
