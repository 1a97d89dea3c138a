use std::sync::Arc;

use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::DomainResult;
use crate::coerce::PlanCoercer;
use crate::error::DomainError;
use crate::plan::{Plan, PlanStatus};
use crate::ports::kv::KeyValueStore;

pub const PLANS_KEY: &str = "plans:v1";
pub const PROFILE_KEY: &str = "hs:profile";
pub const PRODUCTS_KEY: &str = "hs:products";
pub const BRANDING_KEY: &str = "hs:branding";
pub const ONBOARDING_KEY: &str = "onboardingDone";
pub const INTRO_DISMISSED_KEY: &str = "hs:introDismissed";

/// Owns the persisted plan collection. Every record entering or leaving
/// the store passes through [`PlanCoercer`]; the storage layer only ever
/// sees one serialized JSON array under [`PLANS_KEY`].
///
/// Mutations are whole-collection read-modify-write. A per-handle mutex
/// serializes those sections, so two writers sharing a handle cannot
/// lose each other's update; writers holding separate handles over the
/// same backing file are out of scope for this store.
#[derive(Clone)]
pub struct PlanStore {
    kv: Arc<dyn KeyValueStore>,
    coercer: PlanCoercer,
    write_gate: Arc<Mutex<()>>,
}

impl PlanStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, coercer: PlanCoercer) -> Self {
        Self {
            kv,
            coercer,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Reads the whole collection. A missing, malformed, or non-array
    /// blob yields an empty collection, never an error.
    pub async fn read_all(&self) -> DomainResult<Vec<Plan>> {
        let Some(raw) = self.kv.get(PLANS_KEY).await? else {
            return Ok(Vec::new());
        };
        let Ok(parsed) = serde_json::from_str::<Value>(&raw) else {
            return Ok(Vec::new());
        };
        let Value::Array(records) = parsed else {
            return Ok(Vec::new());
        };
        Ok(records
            .iter()
            .map(|record| self.coercer.coerce(record))
            .collect())
    }

    /// Serializes the whole collection back. Every record is re-coerced
    /// and the collection deduplicated by id (last write wins), so the
    /// invariants hold even for a malformed caller-supplied batch.
    pub async fn write_all(&self, plans: &[Plan]) -> DomainResult<()> {
        let mut deduped: Vec<Plan> = Vec::with_capacity(plans.len());
        for plan in plans {
            let plan = self.coercer.coerce(&plan.to_value());
            if let Some(existing) = deduped.iter_mut().find(|seen| seen.id == plan.id) {
                *existing = plan;
            } else {
                deduped.push(plan);
            }
        }
        let payload = serde_json::to_string(&deduped)
            .map_err(|err| DomainError::Storage(err.to_string()))?;
        self.kv.set(PLANS_KEY, payload).await
    }

    /// Reads and persists straight back, healing ids that coercion had
    /// to assign on the way in.
    pub async fn load_plans(&self) -> DomainResult<Vec<Plan>> {
        let _gate = self.write_gate.lock().await;
        let plans = self.read_all().await?;
        self.write_all(&plans).await?;
        Ok(plans)
    }

    /// Coerces the raw record and inserts it, replacing any existing
    /// record with the same id. The collection stays ordered newest
    /// first by `createdAt`; ties keep the fresh insert in front.
    pub async fn upsert(&self, raw: &Value) -> DomainResult<Plan> {
        let _gate = self.write_gate.lock().await;
        let plan = self.coercer.coerce(raw);
        let mut plans = self.read_all().await?;
        plans.retain(|existing| existing.id != plan.id);
        plans.insert(0, plan.clone());
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.write_all(&plans).await?;
        Ok(plan)
    }

    /// Merges a partial patch onto the record matching `id`. When no id
    /// matches, falls back to matching by the patch's `createdAt` for
    /// records written before stable ids existed. Returns `None` (and
    /// writes nothing) when neither strategy finds a record.
    pub async fn update(&self, id: &str, patch: &Value) -> DomainResult<Option<Plan>> {
        let _gate = self.write_gate.lock().await;
        let mut plans = self.read_all().await?;
        let matched = plans.iter().position(|plan| plan.id == id).or_else(|| {
            patch
                .get("createdAt")
                .and_then(Value::as_i64)
                .and_then(|created_at| {
                    plans.iter().position(|plan| plan.created_at == created_at)
                })
        });
        let Some(idx) = matched else {
            return Ok(None);
        };
        let mut merged = plans[idx].to_value();
        if let (Some(target), Some(fields)) = (merged.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
            // identity is assigned once; a patch never reassigns it
            target.insert("id".to_string(), Value::String(plans[idx].id.clone()));
        }
        let updated = self.coercer.coerce(&merged);
        plans[idx] = updated.clone();
        self.write_all(&plans).await?;
        Ok(Some(updated))
    }

    /// Removes the record with the given id. Returns whether anything
    /// was removed; a missing id is a no-op, not an error.
    pub async fn delete(&self, id: &str) -> DomainResult<bool> {
        let _gate = self.write_gate.lock().await;
        let mut plans = self.read_all().await?;
        let before = plans.len();
        plans.retain(|plan| plan.id != id);
        let removed = plans.len() != before;
        if removed {
            self.write_all(&plans).await?;
        }
        Ok(removed)
    }

    /// General status transition, both directions. The planner UI only
    /// ever moves forward; that is its convention, not a store rule.
    pub async fn set_status(&self, id: &str, status: PlanStatus) -> DomainResult<Option<Plan>> {
        self.update(id, &json!({ "status": status.as_str() })).await
    }

    pub async fn mark_posted(&self, id: &str) -> DomainResult<Option<Plan>> {
        self.set_status(id, PlanStatus::Posted).await
    }
}

/// Boolean one-off flags (onboarding completion, intro dismissal).
#[derive(Clone)]
pub struct FlagStore {
    kv: Arc<dyn KeyValueStore>,
}

impl FlagStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn onboarding_done(&self) -> DomainResult<bool> {
        Ok(self.kv.get(ONBOARDING_KEY).await?.as_deref() == Some("true"))
    }

    pub async fn set_onboarding_done(&self) -> DomainResult<()> {
        self.kv.set(ONBOARDING_KEY, "true".to_string()).await
    }

    /// Read errors count as "not dismissed"; the intro banner is the
    /// one surface where showing it twice beats erroring.
    pub async fn intro_dismissed(&self) -> bool {
        self.kv
            .get(INTRO_DISMISSED_KEY)
            .await
            .ok()
            .flatten()
            .as_deref()
            == Some("1")
    }

    pub async fn set_intro_dismissed(&self, dismissed: bool) -> DomainResult<()> {
        let value = if dismissed { "1" } else { "0" };
        self.kv.set(INTRO_DISMISSED_KEY, value.to_string()).await
    }
}
