use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::json;
use spark_domain::csv::plans_to_csv;
use spark_domain::generate::GenerationRequest;
use spark_domain::plan::PlanStatus;
use spark_domain::ports::ids::IdGenerator;
use spark_domain::ports::kv::InMemoryKvStore;
use spark_domain::profile::Profile;
use spark_infra::config::AppConfig;

use crate::state::AppState;

struct SequentialIds(AtomicU64);

impl IdGenerator for SequentialIds {
    fn generate(&self) -> String {
        format!("plan-{}", self.0.fetch_add(1, Ordering::Relaxed))
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        app_env: "test".to_string(),
        log_level: "info".to_string(),
        data_dir: "./data".to_string(),
        openai_api_key: String::new(),
        openai_base_url: "https://api.openai.com/v1".to_string(),
        openai_model: "gpt-4o-mini".to_string(),
        openai_timeout_ms: 15_000,
        openai_temperature: 0.8,
        badge_poll_interval_ms: 15_000,
    }
}

fn test_state() -> AppState {
    AppState::with_stores(
        test_config(),
        Arc::new(InMemoryKvStore::default()),
        Arc::new(SequentialIds(AtomicU64::new(1))),
        None,
    )
}

fn bbq_profile() -> Profile {
    Profile {
        niche: "BBQ tips".to_string(),
        pillars: vec!["Smoking".to_string(), "Rubs".to_string()],
        voice: "friendly".to_string(),
    }
}

#[tokio::test]
async fn quick_save_persists_a_complete_plan() {
    let state = test_state();
    state.profile.save(&bbq_profile()).await.unwrap();

    let profile = state.profile.get_or_default().await.unwrap();
    let generated = state
        .generator
        .generate(&GenerationRequest::from_profile(&profile))
        .await;
    let saved = state
        .plans
        .upsert(&generated.to_plan_value("quick-save"))
        .await
        .unwrap();

    assert_eq!(saved.title, "3 BBQ tips tips you can use today");
    assert_eq!(saved.source.as_deref(), Some("quick-save"));
    assert_eq!(saved.status, PlanStatus::Pending);
    let keys: Vec<_> = saved.items.iter().map(|item| item.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["prompt", "hook1", "hook2", "hook3", "script", "caption", "hashtags"]
    );

    let posted = state.plans.mark_posted(&saved.id).await.unwrap().unwrap();
    assert_eq!(posted.status, PlanStatus::Posted);
    assert_eq!(posted.items, saved.items);
}

#[tokio::test]
async fn remix_save_is_tagged_with_its_source() {
    let state = test_state();
    let profile = state.profile.get_or_default().await.unwrap();
    let generated = state.generator.remix(&spark_domain::generate::TrendRemixRequest {
        niche: profile.niche,
        voice: profile.voice,
        pillars: profile.pillars,
        trend: "POV: the old way".to_string(),
    });
    let saved = state
        .plans
        .upsert(&generated.to_plan_value("remix"))
        .await
        .unwrap();
    assert_eq!(saved.source.as_deref(), Some("remix"));
    assert_eq!(saved.title, "Remix: POV: the old way");
}

#[tokio::test]
async fn offer_save_is_tagged_and_keeps_the_link() {
    let state = test_state();
    state.profile.save(&bbq_profile()).await.unwrap();
    let profile = state.profile.get_or_default().await.unwrap();

    let generated = state.generator.offer(&spark_domain::generate::OfferRequest {
        title: "Best mic under $50".to_string(),
        link: "https://gum.example/mic".to_string(),
        why: "Crisp audio on a budget.".to_string(),
        cta: "Grab it here →".to_string(),
        niche: profile.niche,
        pillars: profile.pillars,
    });
    let mut value = generated.to_plan_value("offer");
    value["meta"]["link"] = json!("https://gum.example/mic");
    let saved = state.plans.upsert(&value).await.unwrap();

    assert_eq!(saved.source.as_deref(), Some("offer"));
    assert_eq!(saved.title, "Affiliate: Best mic under $50");
    assert_eq!(saved.meta.get("link"), Some(&json!("https://gum.example/mic")));
    assert!(saved.items.iter().all(|item| item.key != "script"));
    assert_eq!(
        saved.items.iter().filter(|item| item.key.starts_with("hook")).count(),
        3
    );
    let hashtags = saved
        .items
        .iter()
        .find(|item| item.key == "hashtags")
        .expect("hashtags item");
    assert!(hashtags.text.starts_with("#affiliate"));
}

#[tokio::test]
async fn saving_twice_with_one_id_keeps_a_single_record() {
    let state = test_state();
    let first = state
        .plans
        .upsert(&json!({"id": "p1", "title": "Draft"}))
        .await
        .unwrap();
    state
        .plans
        .upsert(&json!({"id": "p1", "title": "Final", "createdAt": first.created_at}))
        .await
        .unwrap();
    let plans = state.plans.read_all().await.unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].title, "Final");
}

#[tokio::test]
async fn legacy_records_update_by_created_at() {
    let state = test_state();
    state
        .plans
        .upsert(&json!({"createdAt": 42, "title": "Old format"}))
        .await
        .unwrap();
    let updated = state
        .plans
        .update("missing-id", &json!({"createdAt": 42, "status": "posted"}))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, PlanStatus::Posted);
    assert_eq!(state.plans.read_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn export_flattens_saved_plans() {
    let state = test_state();
    state
        .plans
        .upsert(&json!({
            "id": "p1",
            "createdAt": 1_714_566_600_000_i64,
            "items": [
                {"key": "prompt", "label": "Prompt", "text": "3 BBQ tips"},
                {"key": "hook1", "label": "Hook", "text": "Hook one"},
                {"key": "caption", "label": "Caption", "text": "Save this!"},
            ]
        }))
        .await
        .unwrap();
    let csv = plans_to_csv(&state.plans.read_all().await.unwrap());
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("date,status,prompt,hooks,script,caption,hashtags")
    );
    assert_eq!(
        lines.next(),
        Some("\"2024-05-01\",\"pending\",\"3 BBQ tips\",\"Hook one\",\"\",\"Save this!\",\"\"")
    );
}

#[tokio::test]
async fn badge_counts_track_status_and_onboarding() {
    let state = test_state();
    state.plans.upsert(&json!({"id": "p1"})).await.unwrap();
    state.plans.upsert(&json!({"id": "p2"})).await.unwrap();
    state.plans.mark_posted("p2").await.unwrap();

    let counts = state.badges.snapshot().await.unwrap();
    assert_eq!(counts.pending, 1);
    assert!(counts.onboarding_incomplete);

    state.flags.set_onboarding_done().await.unwrap();
    let counts = state.badges.snapshot().await.unwrap();
    assert!(!counts.onboarding_incomplete);
}

#[tokio::test]
async fn generation_without_credentials_is_deterministic() {
    let state = test_state();
    state.profile.save(&bbq_profile()).await.unwrap();
    let profile = state.profile.get_or_default().await.unwrap();
    let request = GenerationRequest::from_profile(&profile);
    let first = state.generator.generate(&request).await;
    let second = state.generator.generate(&request).await;
    assert_eq!(first, second);
    assert_eq!(first.caption, "Quick BBQ tips win you can try today. Save this!");
    assert_eq!(first.hashtags[0], "#bbqtips");
}
