//! CrawlTarget - ダウンロード対象の URL とそのホスト

use std::fmt;
use std::hash::{Hash, Hasher};

use url::Url;

use crate::error::CrawlError;

/// A URL scheduled (or about to be scheduled) for download.
///
/// The host is derived once at construction and never changes. Identity is the
/// URL text only: two targets with the same URL are the same work item.
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    url: String,
    host: String,
}

impl CrawlTarget {
    /// URL をパースしてホストを取り出す
    ///
    /// ホストを持たない URL（`mailto:` など）も `InvalidUrl` になる。
    pub fn new(url: impl Into<String>) -> Result<Self, CrawlError> {
        let url = url.into();
        let parsed = Url::parse(&url).map_err(|e| CrawlError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        let host = parsed
            .host_str()
            .ok_or_else(|| CrawlError::InvalidUrl {
                url: url.clone(),
                reason: "url has no host".to_string(),
            })?
            .to_string();
        Ok(Self { url, host })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl PartialEq for CrawlTarget {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for CrawlTarget {}

impl Hash for CrawlTarget {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

impl fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("http://example.com/a", "example.com")]
    #[case::port("https://example.com:8080/x?y=1", "example.com")]
    #[case::subdomain("http://docs.example.com/", "docs.example.com")]
    fn host_is_derived_from_url(#[case] url: &str, #[case] host: &str) {
        let target = CrawlTarget::new(url).unwrap();
        assert_eq!(target.host(), host);
        assert_eq!(target.url(), url);
    }

    #[rstest]
    #[case::garbage("not a url")]
    #[case::no_host("mailto:someone@example.com")]
    fn invalid_urls_are_rejected(#[case] url: &str) {
        let err = CrawlTarget::new(url).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidUrl { .. }));
    }

    #[test]
    fn identity_is_the_url_only() {
        let a = CrawlTarget::new("http://example.com/a").unwrap();
        let b = CrawlTarget::new("http://example.com/a").unwrap();
        let c = CrawlTarget::new("http://example.com/b").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
