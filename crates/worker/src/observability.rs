use std::sync::OnceLock;

use anyhow::Result;
use metrics::gauge;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

const PENDING_PLANS_GAUGE: &str = "hustlespark_worker_pending_plans_total";
const ONBOARDING_INCOMPLETE_GAUGE: &str = "hustlespark_worker_onboarding_incomplete";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub fn init_metrics() -> Result<()> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

pub fn _render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

pub fn set_badge_gauges(pending: u64, onboarding_incomplete: bool) {
    gauge!(PENDING_PLANS_GAUGE).set(pending as f64);
    gauge!(ONBOARDING_INCOMPLETE_GAUGE).set(if onboarding_incomplete { 1.0 } else { 0.0 });
}
