use scraper::Html;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use tokio::{
    sync::mpsc,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

pub mod clay;
pub mod meeting;

mod error;
mod fetch;
mod pipeline;
mod utils;

#[cfg(test)]
mod testing;

pub use error::CrawlerError;
pub use fetch::HttpFetcher;
pub use pipeline::JsonLinesPipeline;

const CHANNEL_CAPACITY: usize = 10;

/// A page to fetch, tagged with the kind of page the crawler expects there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request<P> {
    pub url: String,
    pub page: P,
    /// Fetch even when the url was already visited in this run.
    pub dont_filter: bool,
}

impl<P> Request<P> {
    pub fn new<U: Into<String>>(url: U, page: P) -> Self {
        Request {
            url: url.into(),
            page,
            dont_filter: false,
        }
    }

    pub fn dont_filter(mut self) -> Self {
        self.dont_filter = true;
        self
    }
}

#[derive(Debug)]
pub enum CrawlerResult<P, T> {
    Requests(Vec<Request<P>>),
    Item(T),
}

pub trait Crawler {
    type Page: fmt::Debug;
    type Item: Send + 'static;

    fn start_requests(&self) -> Vec<Request<Self::Page>>;
    fn crawl(
        &mut self,
        request: &Request<Self::Page>,
        doc: &Html,
    ) -> Result<CrawlerResult<Self::Page, Self::Item>, CrawlerError>;
}

#[async_trait::async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<String, CrawlerError>;
}

#[async_trait::async_trait]
pub trait Pipeline<T: Send + 'static>: Send {
    async fn process(&mut self, item: T) -> Result<(), CrawlerError>;

    async fn close(&mut self) -> Result<(), CrawlerError> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlStats {
    pub requests: u32,
    pub items: u32,
    pub failed: u32,
}

/// Drains the crawler's request queue in FIFO order, one request at a time,
/// and hands every extracted item to `pipeline`.
///
/// A page that cannot be fetched or extracted is logged and counted as
/// failed; the crawl goes on with the next request. Pipeline errors end the
/// run.
pub async fn run_scrapper<C, F, P>(
    mut crawler: C,
    fetcher: F,
    mut pipeline: P,
    request_delay: Duration,
) -> Result<CrawlStats, CrawlerError>
where
    C: Crawler,
    F: Fetcher,
    P: Pipeline<C::Item> + 'static,
{
    let (tx, mut rx) = mpsc::channel::<C::Item>(CHANNEL_CAPACITY);

    let writer = tokio::spawn(async move {
        while let Some(item) = rx.recv().await {
            pipeline.process(item).await?;
        }
        pipeline.close().await
    });

    let mut queue: VecDeque<Request<C::Page>> = crawler.start_requests().into();
    info!("Initial queue length: {}", queue.len());

    let mut visited: HashSet<String> = HashSet::new();
    let mut last_request: Option<Instant> = None;
    let mut stats = CrawlStats::default();

    while let Some(request) = queue.pop_front() {
        if !visited.insert(request.url.clone()) && !request.dont_filter {
            debug!("Skip visited {}", request.url);
            continue;
        }

        if let Some(last_request) = last_request {
            let elapsed = last_request.elapsed();
            if elapsed < request_delay {
                tokio::time::sleep(request_delay - elapsed).await;
            }
        }
        last_request = Some(Instant::now());
        stats.requests += 1;

        debug!("Visit {} ({:?})", request.url, request.page);
        let html = match fetcher.fetch(&request.url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to fetch {}: {}", request.url, e);
                stats.failed += 1;
                continue;
            }
        };

        let result = {
            let doc = Html::parse_document(&html);
            crawler.crawl(&request, &doc)
        };

        match result {
            Ok(CrawlerResult::Requests(requests)) => {
                debug!("{} requests from {}", requests.len(), request.url);
                queue.extend(requests);
            }
            Ok(CrawlerResult::Item(item)) => {
                stats.items += 1;
                info!("[{}] Emit item {}", stats.items, request.url);
                if tx.send(item).await.is_err() {
                    // The writer stopped; its error is reported below.
                    break;
                }
            }
            Err(e) => {
                warn!("Failed to extract {}: {}", request.url, e);
                stats.failed += 1;
            }
        }
    }

    drop(tx);
    writer
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;

    info!(
        "Crawl finished: {} requests, {} items, {} failed",
        stats.requests, stats.items, stats.failed
    );
    Ok(stats)
}
