use std::future::Future;
use std::time::Duration;

use poll_promise::Promise;

use crate::data::error::ApiError;
use crate::utils::app_time::AppInstant;

pub type ApiResult<T> = Result<T, ApiError>;

/// What a page should render for a query this frame
#[derive(Debug)]
pub enum QueryState<'a, T> {
    Idle,
    Loading,
    Ready(&'a T),
    Failed(&'a ApiError),
}

/// One in-flight or settled request, identified by a cache key.
///
/// Asking again with the key already held is a no-op; a different key
/// replaces whatever was in flight. The promise runs on the ambient tokio
/// runtime, so `request` must be called from inside it.
pub struct Query<T: Send + 'static> {
    key: Option<String>,
    promise: Option<Promise<ApiResult<T>>>,
}

impl<T: Send + 'static> Default for Query<T> {
    fn default() -> Self {
        Self {
            key: None,
            promise: None,
        }
    }
}

impl<T: Send + 'static> Query<T> {
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns true when a new request was actually spawned.
    pub fn request<F, Fut>(&mut self, key: impl Into<String>, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        let key = key.into();
        if self.promise.is_some() && self.key.as_deref() == Some(key.as_str()) {
            return false;
        }
        self.key = Some(key);
        self.promise = Some(Promise::spawn_async(fetch()));
        true
    }

    /// Forces a new request under the current key. Does nothing when idle.
    pub fn refetch<F, Fut>(&mut self, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        if self.key.is_none() {
            return false;
        }
        self.promise = Some(Promise::spawn_async(fetch()));
        true
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.promise = None;
    }

    pub fn state(&self) -> QueryState<'_, T> {
        match &self.promise {
            None => QueryState::Idle,
            Some(promise) => match promise.ready() {
                None => QueryState::Loading,
                Some(Ok(data)) => QueryState::Ready(data),
                Some(Err(e)) => QueryState::Failed(e),
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state(), QueryState::Loading)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.state(), QueryState::Ready(_) | QueryState::Failed(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self.state() {
            QueryState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self.state() {
            QueryState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Fixed-interval re-request of an endpoint until it yields data.
/// No backoff and no attempt limit.
#[derive(Debug, Clone)]
pub struct PollSchedule {
    interval: Duration,
    last_fired: Option<AppInstant>,
}

impl PollSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    pub fn due(&self, now: AppInstant, has_data: bool) -> bool {
        if has_data {
            return false;
        }
        match self.last_fired {
            None => true,
            Some(t) => now.saturating_duration_since(t) >= self.interval,
        }
    }

    pub fn mark_fired(&mut self, now: AppInstant) {
        self.last_fired = Some(now);
    }

    /// Time left before the next attempt, for scheduling a repaint.
    pub fn time_until_due(&self, now: AppInstant) -> Duration {
        match self.last_fired {
            None => Duration::ZERO,
            Some(t) => self
                .interval
                .saturating_sub(now.saturating_duration_since(t)),
        }
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn settle<T: Send + 'static>(query: &Query<T>) {
        for _ in 0..200 {
            if query.is_settled() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("query never settled");
    }

    #[tokio::test]
    async fn test_idle_until_requested() {
        let query: Query<u32> = Query::default();
        assert!(matches!(query.state(), QueryState::Idle));
        assert!(query.data().is_none());
    }

    #[tokio::test]
    async fn test_request_resolves_to_ready() {
        let mut query = Query::default();
        query.request("count", || async { Ok::<u64, ApiError>(2694) });
        settle(&query).await;
        assert_eq!(query.data(), Some(&2694));
        assert_eq!(query.key(), Some("count"));
    }

    #[tokio::test]
    async fn test_failure_is_exposed() {
        let mut query: Query<u64> = Query::default();
        query.request("missing", || async { Err(ApiError::NotFound) });
        settle(&query).await;
        assert_eq!(query.error(), Some(&ApiError::NotFound));
    }

    #[tokio::test]
    async fn test_same_key_is_deduplicated_new_key_replaces() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut query: Query<usize> = Query::default();

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            query.request("prices/005930/730", move || async move {
                Ok(calls.fetch_add(1, Ordering::SeqCst))
            });
        }
        settle(&query).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let c = Arc::clone(&calls);
        assert!(query.request("prices/005930/365", move || async move {
            Ok(c.fetch_add(1, Ordering::SeqCst))
        }));
        settle(&query).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(query.key(), Some("prices/005930/365"));
    }

    #[tokio::test]
    async fn test_refetch_forces_new_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut query: Query<usize> = Query::default();
        assert!(!query.refetch(|| async { Ok(0) }));

        let c = Arc::clone(&calls);
        query.request("k", move || async move { Ok(c.fetch_add(1, Ordering::SeqCst)) });
        settle(&query).await;
        let c = Arc::clone(&calls);
        assert!(query.refetch(move || async move { Ok(c.fetch_add(1, Ordering::SeqCst)) }));
        settle(&query).await;
        assert_eq!(query.data(), Some(&1));
    }

    #[test]
    fn test_poll_schedule() {
        let start = AppInstant::now();
        let mut poll = PollSchedule::new(Duration::from_secs(3));
        assert!(poll.due(start, false));
        assert!(!poll.due(start, true));

        poll.mark_fired(start);
        assert!(!poll.due(start + Duration::from_secs(1), false));
        assert!(poll.due(start + Duration::from_secs(3), false));
        assert!(!poll.due(start + Duration::from_secs(30), true));
        assert_eq!(
            poll.time_until_due(start + Duration::from_secs(1)),
            Duration::from_secs(2)
        );

        poll.reset();
        assert!(poll.due(start, false));
    }
}
