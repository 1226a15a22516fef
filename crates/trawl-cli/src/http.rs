//! HTTP implementation of the `Fetcher` port (reqwest + scraper).

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use trawl_core::{Document, ExtractionError, Fetcher, TransportError};
use url::Url;

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("trawl/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Box<dyn Document>, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::new(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(url, format!("HTTP {status}")));
        }

        // リダイレクト後の URL を相対リンクの基準にする
        let base = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(url, e.to_string()))?;

        Ok(Box::new(HtmlDocument { base, body }))
    }
}

struct HtmlDocument {
    base: Url,
    body: String,
}

#[async_trait]
impl Document for HtmlDocument {
    async fn extract_links(&self) -> Result<Vec<String>, ExtractionError> {
        extract_html_links(&self.body, &self.base)
    }
}

/// Absolute http(s) targets of every `<a href>`, fragments stripped.
fn extract_html_links(html: &str, base: &Url) -> Result<Vec<String>, ExtractionError> {
    let selector =
        Selector::parse("a[href]").map_err(|e| ExtractionError::new(format!("selector: {e}")))?;
    let document = Html::parse_document(html);

    let links = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(|mut url| {
            url.set_fragment(None);
            url.to_string()
        })
        .collect();
    Ok(links)
}
