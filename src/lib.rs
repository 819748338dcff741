// src/lib.rs
pub mod config;
pub mod metrics;
pub mod page;
pub mod plugin;
pub mod reachability;
pub mod server;
