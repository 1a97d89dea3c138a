use std::sync::Arc;

use serde_json::Value;

use crate::plan::{DEFAULT_ITEM_LABEL, MAX_TITLE_LENGTH, Plan, PlanItem, PlanStatus};
use crate::ports::ids::IdGenerator;
use crate::util::now_ms;

/// The single conversion boundary between opaque external values and
/// canonical [`Plan`] records. Total and idempotent: any JSON value in,
/// a valid record out, and coercing an already-valid record changes
/// nothing.
#[derive(Clone)]
pub struct PlanCoercer {
    ids: Arc<dyn IdGenerator>,
}

impl PlanCoercer {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    pub fn coerce(&self, raw: &Value) -> Plan {
        let id = coerce_id(raw.get("id")).unwrap_or_else(|| self.ids.generate());
        let created_at = coerce_created_at(raw.get("createdAt")).unwrap_or_else(now_ms);
        let status = match raw.get("status").and_then(Value::as_str) {
            Some("posted") => PlanStatus::Posted,
            _ => PlanStatus::Pending,
        };
        let items = coerce_items(raw.get("items"));
        let title = coerce_title(raw, &items);
        let source = coerce_scalar_string(raw.get("source"));
        let meta = raw
            .get("meta")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Plan {
            id,
            title,
            created_at,
            status,
            source,
            items,
            meta,
        }
    }
}

fn coerce_id(value: Option<&Value>) -> Option<String> {
    coerce_scalar_string(value)
}

fn coerce_created_at(value: Option<&Value>) -> Option<i64> {
    let parsed = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    // 0 counts as absent, matching how legacy records were written
    if !parsed.is_finite() || parsed == 0.0 {
        return None;
    }
    Some(parsed as i64)
}

fn coerce_items(value: Option<&Value>) -> Vec<PlanItem> {
    let Some(Value::Array(raw_items)) = value else {
        return Vec::new();
    };
    raw_items
        .iter()
        .enumerate()
        .map(|(idx, raw)| PlanItem {
            key: coerce_scalar_string(raw.get("key")).unwrap_or_else(|| format!("item{idx}")),
            label: coerce_scalar_string(raw.get("label"))
                .unwrap_or_else(|| DEFAULT_ITEM_LABEL.to_string()),
            text: coerce_item_text(raw),
        })
        .collect()
}

fn coerce_item_text(raw: &Value) -> String {
    if let Some(text) = raw.get("text")
        && let Some(text) = scalar_to_string(text)
    {
        return text;
    }
    scalar_to_string(raw).unwrap_or_default()
}

fn coerce_title(raw: &Value, items: &[PlanItem]) -> String {
    let title = coerce_scalar_string(raw.get("title"))
        .or_else(|| coerce_scalar_string(raw.get("name")))
        .unwrap_or_else(|| {
            items
                .iter()
                .map(|item| item.text.trim())
                .find(|text| !text.is_empty())
                .unwrap_or("Untitled")
                .to_string()
        });
    title.chars().take(MAX_TITLE_LENGTH).collect()
}

fn coerce_scalar_string(value: Option<&Value>) -> Option<String> {
    scalar_to_string(value?).filter(|text| !text.is_empty())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
