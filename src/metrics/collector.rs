// src/metrics/collector.rs
use crate::reachability::CheckResult;
use anyhow::{Context, Result};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("Failed to encode metrics")?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    // Check metrics
    pub checks_total: IntCounterVec,
    pub check_duration_seconds: HistogramVec,

    // Page metrics
    pub page_views_total: IntCounter,
    pub open_views: IntGauge,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let checks_total = IntCounterVec::new(
            Opts::new("cus_checks_total", "Reachability checks by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(checks_total.clone()))?;

        let check_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "cus_check_duration_seconds",
                "Reachability check duration in seconds",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(check_duration_seconds.clone()))?;

        let page_views_total =
            IntCounter::new("cus_page_views_total", "Status page renders")?;
        registry.register(Box::new(page_views_total.clone()))?;

        let open_views = IntGauge::new(
            "cus_open_views",
            "Page views whose result has not been fetched yet",
        )?;
        registry.register(Box::new(open_views.clone()))?;

        Ok(Self {
            checks_total,
            check_duration_seconds,
            page_views_total,
            open_views,
        })
    }

    pub fn record_check(&self, result: CheckResult, duration: Duration) {
        let outcome = result.as_str();
        self.checks_total.with_label_values(&[outcome]).inc();
        self.check_duration_seconds
            .with_label_values(&[outcome])
            .observe(duration.as_secs_f64());
    }

    pub fn record_page_view(&self) {
        self.page_views_total.inc();
    }

    pub fn update_open_views(&self, count: usize) {
        self.open_views.set(count as i64);
    }
}
