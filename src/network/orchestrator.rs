//! 并发资源下载调度
//!
//! 为每个资源 URL 启动一个下载任务，成功的结果写入共享的并发映射，
//! 所有任务结束（无论成功与否）之后才返回。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::builders::document::FetchedResource;

use super::fetcher::fetch_resource;
use super::session::HttpTransport;

/// Default limit on simultaneous in-flight fetches
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 32;

/// Fetches many resources concurrently and merges the successful ones
///
/// Individual failures never surface: a resource that could not be fetched
/// is simply absent from the returned mapping.
#[derive(Clone)]
pub struct FetchOrchestrator {
    transport: Arc<dyn HttpTransport>,
    max_concurrent_fetches: usize,
    cancellation: CancellationToken,
}

impl FetchOrchestrator {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            cancellation: CancellationToken::new(),
        }
    }

    /// Limits simultaneous fetches; `0` removes the limit
    pub fn with_max_concurrent_fetches(mut self, max_concurrent_fetches: usize) -> Self {
        self.max_concurrent_fetches = max_concurrent_fetches;
        self
    }

    /// Lets the caller abandon in-flight fetches; cancelled fetches count as failures
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Fetches every URL and returns the successful results keyed by URL
    ///
    /// URLs that do not parse are skipped before any task is launched, and
    /// repeated URLs are fetched once. Returns only after every launched task
    /// has finished.
    pub async fn fetch_all(&self, urls: &[String]) -> HashMap<String, FetchedResource> {
        let urls = unique_fetchable_urls(urls);
        let total = urls.len();

        if total == 0 {
            return HashMap::new();
        }

        let permits = match self.max_concurrent_fetches {
            0 => total,
            limit => limit.min(total),
        };
        let semaphore = Arc::new(Semaphore::new(permits.min(Semaphore::MAX_PERMITS)));
        let resources: Arc<DashMap<String, FetchedResource>> =
            Arc::new(DashMap::with_capacity(total));

        debug!(total, permits, "launching fetch tasks");

        let tasks: Vec<_> = urls
            .into_iter()
            .map(|url| {
                let transport = Arc::clone(&self.transport);
                let semaphore = Arc::clone(&semaphore);
                let resources = Arc::clone(&resources);
                let cancellation = self.cancellation.clone();

                tokio::spawn(async move {
                    let fetched = tokio::select! {
                        biased;
                        _ = cancellation.cancelled() => {
                            debug!(url = %url, "fetch cancelled");
                            None
                        }
                        fetched = async {
                            // 获取信号量许可，控制并发数
                            let _permit = semaphore.acquire().await.ok()?;
                            fetch_resource(transport.as_ref(), &url).await
                        } => fetched,
                    };

                    if let Some(resource) = fetched {
                        resources.entry(url).or_insert(resource);
                    }
                })
            })
            .collect();

        // 等待全部任务结束
        for result in join_all(tasks).await {
            if let Err(error) = result {
                warn!(%error, "fetch task aborted");
            }
        }

        let resources = Arc::try_unwrap(resources).unwrap_or_else(|shared| (*shared).clone());

        info!(
            downloaded = resources.len(),
            failed = total - resources.len(),
            "resource fetching finished"
        );

        resources.into_iter().collect()
    }
}

/// Drops unparsable URLs and repeats, keeping first-seen order
fn unique_fetchable_urls(urls: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(urls.len());
    let mut unique_urls: Vec<String> = Vec::with_capacity(urls.len());

    for url in urls {
        if let Err(error) = Url::parse(url) {
            warn!(url = %url, %error, "skipping unparsable resource URL");
            continue;
        }

        if seen.insert(url.as_str()) {
            unique_urls.push(url.clone());
        }
    }

    unique_urls
}
