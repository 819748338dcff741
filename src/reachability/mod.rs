// src/reachability/mod.rs
mod checker;
mod error;
mod result;

pub use checker::{Reachable, ReachabilityChecker, UPDATE_SERVER_URL};
pub use error::CheckError;
pub use result::{CheckResult, Indicator};
