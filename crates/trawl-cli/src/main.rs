mod cli;
mod http;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trawl_core::{CrawlResult, CrawlSummary, WebCrawler, interrupt_pair};

use crate::cli::Cli;
use crate::http::HttpFetcher;

#[derive(Serialize)]
struct Report<'a> {
    seed: &'a str,
    depth: usize,
    summary: CrawlSummary,
    result: &'a CrawlResult,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,trawl_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // 0: 全部取れた / 1: 失敗した URL がある / 2: クロール自体が失敗
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            2
        }
    };
    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let fetcher = HttpFetcher::new(Duration::from_secs(cli.timeout))
        .context("failed to build http client")?;
    let crawler = WebCrawler::builder(Arc::new(fetcher))
        .config(cli.config())
        .build()
        .context("invalid crawler configuration")?;

    let (handle, interrupt) = interrupt_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping crawl");
            handle.interrupt();
        }
    });

    let outcome = crawler
        .crawl_interruptible(&cli.url, cli.depth, cli.filter(), interrupt)
        .await;
    crawler.close().await;
    let result = outcome.with_context(|| format!("crawl of {} failed", cli.url))?;

    let summary = result.summary();
    info!(downloaded = summary.downloaded, failed = summary.failed, "done");

    if cli.json {
        let report = Report {
            seed: &cli.url,
            depth: cli.depth,
            summary,
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_result(&result);
    }

    Ok(if result.errors.is_empty() { 0 } else { 1 })
}

fn print_result(result: &CrawlResult) {
    for url in &result.downloaded {
        println!("ok    {url}");
    }
    let mut failed: Vec<_> = result.errors.iter().collect();
    failed.sort_by(|a, b| a.0.cmp(b.0));
    for (url, error) in failed {
        println!("fail  {url}  ({})", error.message);
    }
    let summary = result.summary();
    println!(
        "\n{} downloaded, {} failed",
        summary.downloaded, summary.failed
    );
}
