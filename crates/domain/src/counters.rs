use serde::Serialize;

use crate::DomainResult;
use crate::plan::{Plan, PlanStatus};
use crate::store::{FlagStore, PlanStore};

pub fn pending_count(plans: &[Plan]) -> usize {
    plans
        .iter()
        .filter(|plan| plan.status != PlanStatus::Posted)
        .count()
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct BadgeCounts {
    pub pending: usize,
    pub onboarding_incomplete: bool,
}

/// Pure projections over the store, recomputed on every call. Nothing
/// here caches; staleness is bounded by how often the caller polls.
#[derive(Clone)]
pub struct BadgeService {
    plans: PlanStore,
    flags: FlagStore,
}

impl BadgeService {
    pub fn new(plans: PlanStore, flags: FlagStore) -> Self {
        Self { plans, flags }
    }

    pub async fn snapshot(&self) -> DomainResult<BadgeCounts> {
        let plans = self.plans.read_all().await?;
        let onboarding_done = self.flags.onboarding_done().await?;
        Ok(BadgeCounts {
            pending: pending_count(&plans),
            onboarding_incomplete: !onboarding_done,
        })
    }
}
