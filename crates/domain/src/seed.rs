use serde_json::{Value, json};

use crate::profile::Profile;

pub fn seed_profile() -> Profile {
    Profile::default()
}

/// Demo plan for first-run UX, shaped for the upsert path.
pub fn seed_plan_value(now_ms: i64) -> Value {
    json!({
        "id": format!("demo-{now_ms}"),
        "createdAt": now_ms,
        "status": "pending",
        "source": "seed",
        "items": [
            {"key": "prompt", "label": "Prompt", "text": "3 automation ideas you can start this week"},
            {"key": "hook1", "label": "Hook", "text": "Stop trading hours for dollars"},
            {"key": "hook2", "label": "Hook", "text": "Automate this today"},
            {"key": "hook3", "label": "Hook", "text": "Spend 10 minutes, save 10 hours"},
            {"key": "script", "label": "Script", "text": "Here are three…"},
            {"key": "caption", "label": "Caption", "text": "Save this for later!"},
            {"key": "hashtags", "label": "Hashtags", "text": "#ai #sidehustle"},
        ],
        "meta": {}
    })
}
