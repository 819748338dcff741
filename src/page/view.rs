// src/page/view.rs
use crate::metrics::MetricsCollector;
use crate::reachability::{CheckResult, Indicator, ReachabilityChecker};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// One render of the status page and the check it triggered.
#[derive(Debug)]
pub struct PageView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub indicator: Indicator,
}

impl PageView {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            indicator: Indicator::new(),
        }
    }

    pub fn age(&self) -> Duration {
        (Utc::now() - self.created_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Open page views keyed by id. Each view owns exactly one in-flight check.
pub struct PageViews {
    views: DashMap<Uuid, Arc<PageView>>,
    checker: Arc<ReachabilityChecker>,
    ttl: Duration,
    metrics: Option<Arc<MetricsCollector>>,
}

impl PageViews {
    pub fn new(
        checker: Arc<ReachabilityChecker>,
        ttl: Duration,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        Self {
            views: DashMap::new(),
            checker,
            ttl,
            metrics,
        }
    }

    /// Starts a fresh view in `Pending` and spawns its single check.
    /// Must be called from within a tokio runtime.
    pub fn open(&self) -> Arc<PageView> {
        self.evict_expired();

        let view = Arc::new(PageView::new());
        self.views.insert(view.id, view.clone());

        let checker = self.checker.clone();
        let task_view = view.clone();
        tokio::spawn(async move {
            let result = checker.check_into(&task_view.indicator).await;
            debug!("Page view {} settled: {}", task_view.id, result.as_str());
        });

        if let Some(metrics) = &self.metrics {
            metrics.record_page_view();
        }
        self.report_open();
        debug!("Opened page view {}", view.id);
        view
    }

    /// Discards the view, then waits for its check to settle. Only the
    /// first caller for an id gets a result; `None` when the id is unknown,
    /// already consumed or expired.
    pub async fn await_result(&self, id: &Uuid) -> Option<CheckResult> {
        let (_, view) = self.views.remove(id)?;
        self.report_open();

        Some(view.indicator.settled().await)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    fn evict_expired(&self) {
        let before = self.views.len();
        self.views.retain(|_, view| view.age() <= self.ttl);

        let evicted = before.saturating_sub(self.views.len());
        if evicted > 0 {
            info!("Evicted {} page views never fetched within {:?}", evicted, self.ttl);
        }
    }

    fn report_open(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.update_open_views(self.views.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckConfig;
    use mockito::Server;
    use url::Url;

    fn views_for(url: &str, ttl: Duration) -> PageViews {
        let checker =
            ReachabilityChecker::with_endpoint(Url::parse(url).unwrap(), &CheckConfig::default(), None)
                .unwrap();
        PageViews::new(Arc::new(checker), ttl, None)
    }

    #[tokio::test]
    async fn test_view_issues_exactly_one_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let views = views_for(&server.url(), Duration::from_secs(60));
        let view = views.open();
        assert_eq!(views.len(), 1);

        assert_eq!(views.await_result(&view.id).await, Some(CheckResult::Success));
        assert!(views.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_result_is_consumed_once() {
        let mut server = Server::new_async().await;
        let _mock = server.mock("GET", "/").with_status(500).create_async().await;

        let views = views_for(&server.url(), Duration::from_secs(60));
        let view = views.open();

        assert_eq!(views.await_result(&view.id).await, Some(CheckResult::Failure));
        assert_eq!(views.await_result(&view.id).await, None);
    }

    #[tokio::test]
    async fn test_concurrent_fetches_answer_once() {
        let mut server = Server::new_async().await;
        let _mock = server.mock("GET", "/").with_status(200).create_async().await;

        let views = views_for(&server.url(), Duration::from_secs(60));
        let view = views.open();

        let (first, second) =
            tokio::join!(views.await_result(&view.id), views.await_result(&view.id));

        let answered: Vec<_> = [first, second].into_iter().flatten().collect();
        assert_eq!(answered, vec![CheckResult::Success]);
        assert!(views.is_empty());
    }

    #[tokio::test]
    async fn test_rerender_starts_fresh_view() {
        let mut server = Server::new_async().await;
        let failing = server
            .mock("GET", "/")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let views = views_for(&server.url(), Duration::from_secs(60));
        let first = views.open();
        assert_eq!(views.await_result(&first.id).await, Some(CheckResult::Failure));
        failing.assert_async().await;
        failing.remove_async().await;

        let passing = server
            .mock("GET", "/")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let second = views.open();
        assert_ne!(first.id, second.id);
        assert_eq!(views.await_result(&second.id).await, Some(CheckResult::Success));
        assert_eq!(first.indicator.current(), CheckResult::Failure);
        passing.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_view() {
        let views = views_for("http://127.0.0.1:9/", Duration::from_secs(60));
        assert_eq!(views.await_result(&Uuid::new_v4()).await, None);
    }

    #[tokio::test]
    async fn test_stale_views_evicted_on_open() {
        let mut server = Server::new_async().await;
        let _mock = server.mock("GET", "/").with_status(200).create_async().await;

        let views = views_for(&server.url(), Duration::ZERO);
        let stale = views.open();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let fresh = views.open();
        assert!(!views.views.contains_key(&stale.id));
        assert!(views.views.contains_key(&fresh.id));
    }
}
