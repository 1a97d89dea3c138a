use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DomainResult;
use crate::error::DomainError;
use crate::ports::kv::KeyValueStore;
use crate::store::PROFILE_KEY;

pub const DEFAULT_NICHE: &str = "AI side hustles";
pub const DEFAULT_VOICE: &str = "friendly";

pub fn default_pillars() -> Vec<String> {
    ["Automation", "Prompting", "Monetization"]
        .map(str::to_string)
        .to_vec()
}

/// Creator profile feeding the generation pipeline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub niche: String,
    pub pillars: Vec<String>,
    pub voice: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            niche: DEFAULT_NICHE.to_string(),
            pillars: default_pillars(),
            voice: DEFAULT_VOICE.to_string(),
        }
    }
}

pub fn coerce_profile(raw: &Value) -> Profile {
    let niche = non_empty(raw.get("niche")).unwrap_or_else(|| DEFAULT_NICHE.to_string());
    let voice = non_empty(raw.get("voice")).unwrap_or_else(|| DEFAULT_VOICE.to_string());
    let pillars = raw
        .get("pillars")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|pillar| !pillar.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|pillars| !pillars.is_empty())
        .unwrap_or_else(default_pillars);
    Profile {
        niche,
        pillars,
        voice,
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
pub struct ProfileStore {
    kv: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// `None` means no profile was ever saved; a malformed blob also
    /// reads as `None` rather than an error.
    pub async fn get(&self) -> DomainResult<Option<Profile>> {
        let Some(raw) = self.kv.get(PROFILE_KEY).await? else {
            return Ok(None);
        };
        let Ok(parsed) = serde_json::from_str::<Value>(&raw) else {
            return Ok(None);
        };
        Ok(Some(coerce_profile(&parsed)))
    }

    pub async fn get_or_default(&self) -> DomainResult<Profile> {
        Ok(self.get().await?.unwrap_or_default())
    }

    pub async fn save(&self, profile: &Profile) -> DomainResult<()> {
        let payload = serde_json::to_string(profile)
            .map_err(|err| DomainError::Storage(err.to_string()))?;
        self.kv.set(PROFILE_KEY, payload).await
    }
}
