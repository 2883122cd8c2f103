//! Page retrieval from DSDA.
//!
//! Everything that touches the network goes through [`PageFetcher`], so the
//! client can be driven by an in-memory site in tests. Pages are fetched one
//! at a time.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Source of page bodies
pub trait PageFetcher {
    /// Fetch the body of `url`
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport failures and non-success statuses.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Fetch several pages one after the other, stopping at the first failure
    fn fetch_all(&self, urls: &[String]) -> Result<Vec<String>, FetchError> {
        urls.iter().map(|url| self.fetch(url)).collect()
    }
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP fetcher
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns `FetchError::Client` if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {url}");
        let http = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().map_err(http)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(http)
    }
}

/// URL layout of the site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    base: String,
}

impl SiteUrls {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute URL of a link found on a page
    pub fn absolute(&self, href: &str) -> String {
        format!("{}/{}", self.base, href)
    }

    pub fn players(&self) -> String {
        self.absolute("players.html")
    }

    pub fn updates(&self) -> String {
        self.absolute("updates.html")
    }

    pub fn wad_list(&self, page: usize) -> String {
        self.absolute(&format!("wadlist{page}.html"))
    }

    pub fn wad(&self, index: u64) -> String {
        self.absolute(&format!("wad{index}.html"))
    }

    pub fn player(&self, index: u64) -> String {
        self.absolute(&format!("player{index}lmps.html"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapFetcher(HashMap<String, String>);

    impl PageFetcher for MapFetcher {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.0.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    #[test]
    fn test_site_urls() {
        let urls = SiteUrls::new("http://doomedsda.us/");
        assert_eq!(urls.players(), "http://doomedsda.us/players.html");
        assert_eq!(urls.wad_list(3), "http://doomedsda.us/wadlist3.html");
        assert_eq!(urls.wad(12), "http://doomedsda.us/wad12.html");
        assert_eq!(urls.player(7), "http://doomedsda.us/player7lmps.html");
    }

    #[test]
    fn test_fetch_all_stops_at_first_failure() {
        let fetcher = MapFetcher(HashMap::from([
            ("a".to_string(), "A".to_string()),
            ("b".to_string(), "B".to_string()),
        ]));
        let pages = fetcher.fetch_all(&["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(pages, vec!["A", "B"]);

        let err = fetcher
            .fetch_all(&["a".to_string(), "gone".to_string(), "b".to_string()])
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_page_is_not_found() {
        let fetcher = MapFetcher(HashMap::new());
        let err = (&fetcher).fetch("gone").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "gone returned HTTP 404");
    }
}
