use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MAX_TITLE_LENGTH: usize = 120;
pub const DEFAULT_ITEM_LABEL: &str = "Caption";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Pending,
    Posted,
}

impl PlanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanStatus::Pending => "pending",
            PlanStatus::Posted => "posted",
        }
    }
}

impl std::str::FromStr for PlanStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(PlanStatus::Pending),
            "posted" => Ok(PlanStatus::Posted),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlanItem {
    pub key: String,
    pub label: String,
    pub text: String,
}

/// The canonical content-planning record. Instances only come out of
/// [`crate::coerce::PlanCoercer`]; hand-built values are re-coerced on
/// every write, so the invariants (non-empty id, valid status, title
/// capped at [`MAX_TITLE_LENGTH`]) hold wherever a `Plan` is observed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub title: String,
    pub created_at: i64,
    pub status: PlanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub items: Vec<PlanItem>,
    pub meta: serde_json::Map<String, Value>,
}

impl Plan {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
