use async_trait::async_trait;
use futures::future::join_all;
use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;

use crate::config::FetchSettings;
use crate::discogs::types::{CollectionPage, CollectionRelease};
use crate::Result;

/// Anything that can serve one page of a user's collection.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, username: &str, page: u32, per_page: u32) -> Result<CollectionPage>;
}

/// Where a fetch stopped early.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageFailure {
    pub page: u32,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionFetch {
    pub releases: Vec<CollectionRelease>,
    pub total_pages: u32,
    pub pages_fetched: u32,
    /// Set when a page after the first failed. Every page before it is in
    /// `releases`; nothing from it or any later page is.
    pub stopped_at: Option<PageFailure>,
}

impl CollectionFetch {
    pub fn is_complete(&self) -> bool {
        self.stopped_at.is_none()
    }
}

pub struct CollectionFetcher {
    source: Arc<dyn PageSource>,
    settings: FetchSettings,
}

impl CollectionFetcher {
    pub fn new(source: Arc<dyn PageSource>, settings: FetchSettings) -> Self {
        Self { source, settings }
    }

    /// Pull every page of `username`'s collection.
    ///
    /// Page 1 errors are returned as-is. Later pages are requested in
    /// batches of `batch_size`, each batch awaited in full before a pause of
    /// `batch_delay` and the next batch. Results are consumed in page order;
    /// the first failed page ends the fetch and the records gathered so far
    /// are returned.
    pub async fn fetch_all(&self, username: &str) -> Result<CollectionFetch> {
        let per_page = self.settings.per_page;
        let first = self.source.fetch_page(username, 1, per_page).await?;
        let total_pages = first.pagination.total_pages();

        info!(
            "Collection of {} has {} page(s), {} item(s)",
            username, total_pages, first.pagination.items
        );

        let mut fetch = CollectionFetch {
            releases: first.releases,
            total_pages,
            pages_fetched: 1,
            stopped_at: None,
        };

        let remaining: Vec<u32> = (2..=total_pages).collect();
        let batch_size = self.settings.batch_size.max(1);

        for (batch_index, batch) in remaining.chunks(batch_size).enumerate() {
            if batch_index > 0 && !self.settings.batch_delay.is_zero() {
                tokio::time::sleep(self.settings.batch_delay).await;
            }

            let results = join_all(
                batch
                    .iter()
                    .map(|&page| self.source.fetch_page(username, page, per_page)),
            )
            .await;

            for (&page, result) in batch.iter().zip(results) {
                match result {
                    Ok(data) => {
                        fetch.releases.extend(data.releases);
                        fetch.pages_fetched += 1;
                    }
                    Err(e) => {
                        warn!(
                            "Page {}/{} of {}'s collection failed, returning {} release(s) from {} page(s): {}",
                            page,
                            total_pages,
                            username,
                            fetch.releases.len(),
                            fetch.pages_fetched,
                            e
                        );
                        fetch.stopped_at = Some(PageFailure {
                            page,
                            reason: e.to_string(),
                        });
                        return Ok(fetch);
                    }
                }
            }
        }

        info!(
            "Fetched {} release(s) across {} page(s) for {}",
            fetch.releases.len(),
            fetch.pages_fetched,
            username
        );
        Ok(fetch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discogs::types::{BasicInformation, Pagination};
    use crate::VinylError;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    struct FakePages {
        pages: u32,
        failing: HashSet<u32>,
        requested: Mutex<Vec<u32>>,
    }

    impl FakePages {
        fn new(pages: u32, failing: &[u32]) -> Self {
            Self {
                pages,
                failing: failing.iter().copied().collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    fn release(id: u64) -> CollectionRelease {
        CollectionRelease {
            id,
            instance_id: id * 10,
            basic_information: BasicInformation {
                title: Some(format!("Record {}", id)),
                ..Default::default()
            },
        }
    }

    #[async_trait]
    impl PageSource for FakePages {
        async fn fetch_page(&self, _username: &str, page: u32, per_page: u32) -> Result<CollectionPage> {
            self.requested.lock().unwrap().push(page);
            if self.failing.contains(&page) {
                return Err(VinylError::Upstream {
                    status: 502,
                    body: "bad gateway".into(),
                });
            }
            Ok(CollectionPage {
                pagination: Pagination {
                    page,
                    pages: self.pages,
                    per_page,
                    items: self.pages * 2,
                },
                releases: vec![release(page as u64 * 100 + 1), release(page as u64 * 100 + 2)],
            })
        }
    }

    fn settings() -> FetchSettings {
        FetchSettings::default().with_batch_delay(Duration::ZERO)
    }

    fn ids(fetch: &CollectionFetch) -> Vec<u64> {
        fetch.releases.iter().map(|r| r.id).collect()
    }

    #[tokio::test]
    async fn returns_every_page_in_order() {
        let fetcher = CollectionFetcher::new(Arc::new(FakePages::new(7, &[])), settings());

        let fetch = fetcher.fetch_all("x").await.unwrap();

        assert!(fetch.is_complete());
        assert_eq!(fetch.pages_fetched, 7);
        assert_eq!(fetch.releases.len(), 14);
        assert_eq!(&ids(&fetch)[..4], &[101, 102, 201, 202]);
        assert_eq!(&ids(&fetch)[12..], &[701, 702]);
    }

    #[tokio::test]
    async fn stops_at_first_failed_page() {
        let fetcher = CollectionFetcher::new(Arc::new(FakePages::new(3, &[2])), settings());

        let fetch = fetcher.fetch_all("x").await.unwrap();

        assert_eq!(ids(&fetch), vec![101, 102]);
        assert_eq!(fetch.pages_fetched, 1);
        assert_eq!(fetch.stopped_at.as_ref().map(|f| f.page), Some(2));
    }

    #[tokio::test]
    async fn failure_drops_later_pages_of_same_batch_and_later_batches() {
        let source = Arc::new(FakePages::new(12, &[4]));
        let fetcher = CollectionFetcher::new(source.clone(), settings());

        let fetch = fetcher.fetch_all("x").await.unwrap();

        assert_eq!(ids(&fetch), vec![101, 102, 201, 202, 301, 302]);
        assert_eq!(fetch.pages_fetched, 3);
        // pages 2..=6 were the only batch requested
        let mut requested = source.requested.lock().unwrap().clone();
        requested.sort_unstable();
        assert_eq!(requested, vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn first_page_failure_is_an_error() {
        let fetcher = CollectionFetcher::new(Arc::new(FakePages::new(3, &[1])), settings());

        let err = fetcher.fetch_all("x").await.unwrap_err();

        assert!(matches!(err, VinylError::Upstream { status: 502, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_between_batches_only() {
        let source = Arc::new(FakePages::new(11, &[]));
        let settings = FetchSettings::default().with_batch_delay(Duration::from_secs(5));
        let fetcher = CollectionFetcher::new(source, settings);

        let started = tokio::time::Instant::now();
        let fetch = fetcher.fetch_all("x").await.unwrap();

        // pages 2..=11 make two batches, so exactly one pause
        assert_eq!(fetch.pages_fetched, 11);
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }
}
