use clap::Parser;
use trawl_core::config::{DEFAULT_BACKLOG_LIMIT, DEFAULT_LIMIT};
use trawl_core::{CrawlFilter, CrawlerConfig};

/// Crawl a site breadth-first and report which pages could be downloaded.
#[derive(Parser, Debug)]
#[command(name = "trawl", version, about)]
pub struct Cli {
    /// Seed URL.
    pub url: String,

    /// Link hops to follow from the seed (0 = only the seed).
    #[arg(short, long, default_value_t = 2, env = "TRAWL_DEPTH")]
    pub depth: usize,

    /// Concurrent downloads overall.
    #[arg(long, default_value_t = DEFAULT_LIMIT, env = "TRAWL_DOWNLOADERS")]
    pub downloaders: usize,

    /// Concurrent link extractions.
    #[arg(long, default_value_t = DEFAULT_LIMIT, env = "TRAWL_EXTRACTORS")]
    pub extractors: usize,

    /// Concurrent downloads against one host.
    #[arg(long, default_value_t = DEFAULT_LIMIT, env = "TRAWL_PER_HOST")]
    pub per_host: usize,

    /// Queued downloads per host before discovery waits.
    #[arg(long, default_value_t = DEFAULT_BACKLOG_LIMIT)]
    pub backlog_limit: usize,

    /// Skip URLs containing this text (repeatable).
    #[arg(long = "exclude", value_name = "TEXT")]
    pub excludes: Vec<String>,

    /// Only crawl this host (repeatable).
    #[arg(long = "host", value_name = "HOST")]
    pub hosts: Vec<String>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn config(&self) -> CrawlerConfig {
        CrawlerConfig {
            downloaders: self.downloaders,
            extractors: self.extractors,
            per_host: self.per_host,
            backlog_limit: self.backlog_limit,
        }
    }

    pub fn filter(&self) -> CrawlFilter {
        match (self.hosts.is_empty(), self.excludes.is_empty()) {
            (true, true) => CrawlFilter::All,
            (true, false) => CrawlFilter::excluding(self.excludes.iter().cloned()),
            (false, true) => CrawlFilter::hosts(self.hosts.iter().cloned()),
            (false, false) => {
                let hosts = CrawlFilter::hosts(self.hosts.iter().cloned());
                let excludes = CrawlFilter::excluding(self.excludes.iter().cloned());
                CrawlFilter::custom(move |target| hosts.admits(target) && excludes.admits(target))
            }
        }
    }
}
