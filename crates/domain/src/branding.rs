use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DomainResult;
use crate::error::DomainError;
use crate::ports::kv::KeyValueStore;
use crate::store::BRANDING_KEY;

pub const DEFAULT_PRIMARY_COLOR: &str = "#7C3AED";

/// App-wide brand settings. Stored fields are merged over the defaults,
/// so a partial record from an older version still renders.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub primary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monetize_logo_url: Option<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_COLOR.to_string(),
            logo_url: None,
            monetize_logo_url: None,
        }
    }
}

pub fn coerce_branding(raw: &Value) -> Branding {
    Branding {
        primary: non_empty(raw.get("primary"))
            .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string()),
        logo_url: non_empty(raw.get("logoUrl")),
        monetize_logo_url: non_empty(raw.get("monetizeLogoUrl")),
    }
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[derive(Clone)]
pub struct BrandingStore {
    kv: Arc<dyn KeyValueStore>,
}

impl BrandingStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn get(&self) -> DomainResult<Branding> {
        let Some(raw) = self.kv.get(BRANDING_KEY).await? else {
            return Ok(Branding::default());
        };
        let Ok(parsed) = serde_json::from_str::<Value>(&raw) else {
            return Ok(Branding::default());
        };
        Ok(coerce_branding(&parsed))
    }

    pub async fn save(&self, branding: &Branding) -> DomainResult<()> {
        let payload = serde_json::to_string(branding)
            .map_err(|err| DomainError::Storage(err.to_string()))?;
        self.kv.set(BRANDING_KEY, payload).await
    }
}
