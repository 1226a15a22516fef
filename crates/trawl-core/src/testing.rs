//! In-memory `Fetcher` over a fixed link graph, for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{CrawlTarget, ExtractionError, TransportError};
use crate::ports::{Document, Fetcher};

enum Page {
    Links(Vec<String>),
    Unparsable,
    Unreachable,
}

#[derive(Default)]
struct Activity {
    fetched: Vec<String>,
    running: HashMap<String, usize>,
    peak: HashMap<String, usize>,
}

/// Serves pages from a map. URLs that are not in the map fail with "404".
///
/// Records every fetch and the highest number of concurrent fetches per host.
#[derive(Default)]
pub struct GraphFetcher {
    pages: HashMap<String, Page>,
    delay: Duration,
    activity: Mutex<Activity>,
}

struct GraphDocument {
    links: Result<Vec<String>, ExtractionError>,
}

#[async_trait]
impl Document for GraphDocument {
    async fn extract_links(&self) -> Result<Vec<String>, ExtractionError> {
        self.links.clone()
    }
}

impl GraphFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page<I, S>(mut self, url: &str, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let links = links.into_iter().map(Into::into).collect();
        self.pages.insert(url.to_string(), Page::Links(links));
        self
    }

    /// Fetch succeeds, link extraction fails.
    pub fn unparsable(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), Page::Unparsable);
        self
    }

    /// Fetch fails.
    pub fn unreachable(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), Page::Unreachable);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.activity.lock().unwrap().fetched.clone()
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.activity
            .lock()
            .unwrap()
            .fetched
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }

    pub fn peak_for(&self, host: &str) -> usize {
        self.activity
            .lock()
            .unwrap()
            .peak
            .get(host)
            .copied()
            .unwrap_or(0)
    }

    fn enter(&self, url: &str, host: &str) {
        let mut activity = self.activity.lock().unwrap();
        activity.fetched.push(url.to_string());
        let running = activity.running.entry(host.to_string()).or_default();
        *running += 1;
        let now = *running;
        let peak = activity.peak.entry(host.to_string()).or_default();
        *peak = (*peak).max(now);
    }

    fn leave(&self, host: &str) {
        let mut activity = self.activity.lock().unwrap();
        if let Some(running) = activity.running.get_mut(host) {
            *running -= 1;
        }
    }
}

#[async_trait]
impl Fetcher for GraphFetcher {
    async fn fetch(&self, url: &str) -> Result<Box<dyn Document>, TransportError> {
        let host = CrawlTarget::new(url)
            .map(|t| t.host().to_string())
            .unwrap_or_default();

        self.enter(url, &host);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        } else {
            tokio::task::yield_now().await;
        }
        self.leave(&host);

        let links = match self.pages.get(url) {
            Some(Page::Links(links)) => Ok(links.clone()),
            Some(Page::Unparsable) => Err(ExtractionError::new("malformed document")),
            Some(Page::Unreachable) => return Err(TransportError::new(url, "connection refused")),
            None => return Err(TransportError::new(url, "404")),
        };
        Ok(Box::new(GraphDocument { links }))
    }
}
