use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{RawRow, ReportSource};
use crate::error::SourceResult;

/// Time-based cache over any [`ReportSource`].
///
/// Within the TTL, repeated fetches return the cached value without touching
/// the remote. A failed refresh is propagated to the caller but keeps any
/// previously cached entry, so a slow or flaky remote never erases data the
/// process already has.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    reports: Mutex<Option<CacheEntry<Vec<RawRow>>>>,
    names: Mutex<Option<CacheEntry<Vec<String>>>>,
}

struct CacheEntry<T> {
    fetched_at: Instant,
    value: T,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

impl<S: ReportSource> CachedSource<S> {
    /// Wrap a source with the given time-to-live.
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            reports: Mutex::new(None),
            names: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<S: ReportSource> ReportSource for CachedSource<S> {
    async fn fetch_reports(&self) -> SourceResult<Vec<RawRow>> {
        let mut slot = self.reports.lock().await;

        if let Some(entry) = slot.as_ref() {
            if entry.is_fresh(self.ttl) {
                debug!(rows = entry.value.len(), "Serving cached report rows");
                return Ok(entry.value.clone());
            }
        }

        let value = self.inner.fetch_reports().await?;
        *slot = Some(CacheEntry {
            fetched_at: Instant::now(),
            value: value.clone(),
        });
        Ok(value)
    }

    async fn fetch_known_names(&self) -> SourceResult<Vec<String>> {
        let mut slot = self.names.lock().await;

        if let Some(entry) = slot.as_ref() {
            if entry.is_fresh(self.ttl) {
                debug!(names = entry.value.len(), "Serving cached known names");
                return Ok(entry.value.clone());
            }
        }

        let value = self.inner.fetch_known_names().await?;
        *slot = Some(CacheEntry {
            fetched_at: Instant::now(),
            value: value.clone(),
        });
        Ok(value)
    }
}
