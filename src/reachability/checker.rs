// src/reachability/checker.rs
use super::{CheckError, CheckResult, Indicator};
use crate::config::CheckConfig;
use crate::metrics::MetricsCollector;
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};
use url::Url;

/// The wordpress.org plugin API resource probed by every check.
pub const UPDATE_SERVER_URL: &str = "https://api.wordpress.org/plugins/info/1.0/hello-dolly.json";

/// Evidence that the endpoint answered with a 2xx status.
#[derive(Debug, Clone)]
pub struct Reachable {
    pub status: StatusCode,
    pub elapsed: Duration,
}

pub struct ReachabilityChecker {
    client: Client,
    endpoint: Url,
    timeout: Duration,
    metrics: Option<Arc<MetricsCollector>>,
}

impl ReachabilityChecker {
    /// Checker bound to the wordpress.org update server.
    pub fn new(config: &CheckConfig, metrics: Option<Arc<MetricsCollector>>) -> Result<Self> {
        let endpoint = Url::parse(UPDATE_SERVER_URL).context("Invalid update server URL")?;
        Self::with_endpoint(endpoint, config, metrics)
    }

    /// Checker bound to an arbitrary endpoint. Not reachable from
    /// configuration; used to aim the checker at a local server.
    pub fn with_endpoint(
        endpoint: Url,
        config: &CheckConfig,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            timeout: config.timeout(),
            metrics,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Issues exactly one GET against the endpoint. The body is never read.
    pub async fn check(&self) -> Result<Reachable, CheckError> {
        let start = Instant::now();
        debug!("Checking reachability of {}", self.endpoint);

        let result = timeout(self.timeout, self.client.get(self.endpoint.as_str()).send()).await;
        let elapsed = start.elapsed();

        let outcome = match result {
            Ok(Ok(response)) => {
                let status = response.status();
                if status.is_success() {
                    Ok(Reachable { status, elapsed })
                } else {
                    Err(CheckError::status(status))
                }
            }
            Ok(Err(e)) => Err(CheckError::from(e)),
            Err(_) => Err(CheckError::timeout(self.timeout)),
        };

        match &outcome {
            Ok(reachable) => debug!(
                "{} reachable: HTTP {} in {}ms",
                self.endpoint,
                reachable.status,
                reachable.elapsed.as_millis()
            ),
            Err(e) => warn!("{} unreachable: {}", self.endpoint, e.reason()),
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_check(CheckResult::from(&outcome), elapsed);
        }

        outcome
    }

    /// Runs one check and settles `indicator` with its outcome.
    pub async fn check_into(&self, indicator: &Indicator) -> CheckResult {
        let outcome = self.check().await;
        if !indicator.settle(&outcome) {
            debug!("Indicator already settled, discarding late outcome");
        }
        indicator.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    fn checker_for(url: &str, timeout_secs: u64) -> ReachabilityChecker {
        let config = CheckConfig { timeout_secs };
        ReachabilityChecker::with_endpoint(Url::parse(url).unwrap(), &config, None).unwrap()
    }

    #[test]
    fn test_default_endpoint_is_update_server() {
        let checker = ReachabilityChecker::new(&CheckConfig::default(), None).unwrap();
        assert_eq!(checker.endpoint().host_str(), Some("api.wordpress.org"));
        assert_eq!(checker.endpoint().path(), "/plugins/info/1.0/hello-dolly.json");
    }

    #[tokio::test]
    async fn test_http_200_is_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/plugins/info/1.0/hello-dolly.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"Hello Dolly"}"#)
            .expect(1)
            .create_async()
            .await;

        let checker = checker_for(&format!("{}/plugins/info/1.0/hello-dolly.json", server.url()), 5);
        let indicator = Indicator::new();

        assert_eq!(checker.check_into(&indicator).await, CheckResult::Success);
        assert_eq!(indicator.current(), CheckResult::Success);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_body_is_not_validated() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("<html>captive portal</html>")
            .create_async()
            .await;

        let checker = checker_for(&server.url(), 5);
        let reachable = checker.check().await.unwrap();
        assert_eq!(reachable.status, StatusCode::OK);
        assert!(reachable.elapsed < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_http_500_is_failure() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let checker = checker_for(&server.url(), 5);
        let indicator = Indicator::new();

        assert_eq!(checker.check_into(&indicator).await, CheckResult::Failure);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_404_is_failure_without_retry() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let checker = checker_for(&server.url(), 5);
        let err = checker.check().await.unwrap_err();
        assert_eq!(err.reason(), "HTTP 404 Not Found");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_dropped_connection_is_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                drop(stream);
            }
        });

        let checker = checker_for(&format!("http://{}/", addr), 5);
        let indicator = Indicator::new();
        assert_eq!(checker.check_into(&indicator).await, CheckResult::Failure);
    }

    #[tokio::test]
    async fn test_hung_endpoint_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).await;
                held.push(stream);
            }
        });

        let checker = checker_for(&format!("http://{}/", addr), 1);
        let started = Instant::now();
        let err = checker.check().await.unwrap_err();

        assert!(err.reason().contains("timeout"), "unexpected reason: {}", err);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_connection_refused_is_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let checker = checker_for(&format!("http://{}/", addr), 5);
        assert!(checker.check().await.is_err());
    }
}
