mod observability;

use std::sync::Arc;
use std::time::Duration;

use spark_domain::coerce::PlanCoercer;
use spark_domain::counters::BadgeService;
use spark_domain::ports::kv::KeyValueStore;
use spark_domain::store::{FlagStore, PlanStore};
use spark_infra::config::AppConfig;
use spark_infra::ids::UuidIdGenerator;
use spark_infra::logging::init_tracing;
use spark_infra::storage::JsonFileStore;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config)?;
    observability::init_metrics()?;

    let kv: Arc<dyn KeyValueStore> =
        Arc::new(JsonFileStore::open(config.data_dir.as_str()).await?);
    let coercer = PlanCoercer::new(Arc::new(UuidIdGenerator));
    let plans = PlanStore::new(kv.clone(), coercer);
    let badges = BadgeService::new(plans, FlagStore::new(kv));

    let poll_interval = Duration::from_millis(config.badge_poll_interval_ms.max(1));
    info!(interval_ms = config.badge_poll_interval_ms, "badge worker starting");

    let mut tick = tokio::time::interval(poll_interval);
    loop {
        tokio::select! {
            _ = tick.tick() => {
                match badges.snapshot().await {
                    Ok(counts) => {
                        observability::set_badge_gauges(
                            counts.pending as u64,
                            counts.onboarding_incomplete,
                        );
                        info!(
                            pending = counts.pending,
                            onboarding_incomplete = counts.onboarding_incomplete,
                            "badge refresh"
                        );
                    }
                    Err(err) => warn!(error = %err, "badge refresh failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("worker shutdown");
                break;
            }
        }
    }

    Ok(())
}
