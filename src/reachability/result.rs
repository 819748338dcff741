// src/reachability/result.rs
use super::{CheckError, Reachable};
use serde::Serialize;
use tokio::sync::watch;

/// Lifecycle of a single reachability check as shown on the status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckResult {
    Pending,
    Success,
    Failure,
}

impl CheckResult {
    pub fn is_pending(&self) -> bool {
        matches!(self, CheckResult::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckResult::Pending => "pending",
            CheckResult::Success => "success",
            CheckResult::Failure => "failure",
        }
    }
}

impl From<&Result<Reachable, CheckError>> for CheckResult {
    fn from(outcome: &Result<Reachable, CheckError>) -> Self {
        match outcome {
            Ok(_) => CheckResult::Success,
            Err(_) => CheckResult::Failure,
        }
    }
}

/// Holds one `CheckResult` that starts `Pending` and moves to a terminal
/// state at most once.
#[derive(Debug)]
pub struct Indicator {
    state: watch::Sender<CheckResult>,
}

impl Indicator {
    pub fn new() -> Self {
        let (state, _) = watch::channel(CheckResult::Pending);
        Self { state }
    }

    pub fn current(&self) -> CheckResult {
        *self.state.borrow()
    }

    /// Applies the outcome of the check. Returns `false` and leaves the
    /// indicator untouched if it has already settled.
    pub fn settle(&self, outcome: &Result<Reachable, CheckError>) -> bool {
        let next = CheckResult::from(outcome);
        self.state.send_if_modified(|state| {
            if state.is_pending() {
                *state = next;
                true
            } else {
                false
            }
        })
    }

    /// Waits until the indicator has left `Pending`.
    pub async fn settled(&self) -> CheckResult {
        let mut rx = self.state.subscribe();
        let result = match rx.wait_for(|state| !state.is_pending()).await {
            Ok(state) => *state,
            // the sender lives in `self`, so the channel cannot close here
            Err(_) => self.current(),
        };
        result
    }
}

impl Default for Indicator {
    fn default() -> Self {
        Self::new()
    }
}
