// src/reachability/error.rs
use reqwest::StatusCode;
use std::time::Duration;

/// Every way the update server can fail to answer collapses into one class.
/// The reason is kept for logs only; the page shows a bare error marker.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Endpoint unreachable: {0}")]
    EndpointUnreachable(String),
}

impl CheckError {
    pub fn reason(&self) -> &str {
        match self {
            CheckError::EndpointUnreachable(reason) => reason,
        }
    }

    pub(crate) fn status(status: StatusCode) -> Self {
        CheckError::EndpointUnreachable(format!("HTTP {}", status))
    }

    pub(crate) fn timeout(after: Duration) -> Self {
        CheckError::EndpointUnreachable(format!("Request timeout after {:?}", after))
    }
}

impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timeout"
        } else if err.is_connect() {
            "connect"
        } else if err.is_request() {
            "request"
        } else {
            "transport"
        };
        CheckError::EndpointUnreachable(format!("{} error: {}", kind, err))
    }
}
