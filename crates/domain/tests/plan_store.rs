use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::json;
use spark_domain::coerce::PlanCoercer;
use spark_domain::plan::PlanStatus;
use spark_domain::ports::ids::IdGenerator;
use spark_domain::ports::kv::{InMemoryKvStore, KeyValueStore};
use spark_domain::store::{PLANS_KEY, PlanStore};

struct SequentialIds(AtomicU64);

impl IdGenerator for SequentialIds {
    fn generate(&self) -> String {
        format!("id-{}", self.0.fetch_add(1, Ordering::SeqCst))
    }
}

fn store() -> (PlanStore, Arc<InMemoryKvStore>) {
    let kv = Arc::new(InMemoryKvStore::new());
    let coercer = PlanCoercer::new(Arc::new(SequentialIds(AtomicU64::new(0))));
    (PlanStore::new(kv.clone(), coercer), kv)
}

#[tokio::test]
async fn round_trip_yields_coerced_record() {
    let (store, _kv) = store();
    let plan = store
        .upsert(&json!({
            "title": "Round trip",
            "createdAt": 1_700_000_000_000_i64,
            "items": [{"key": "caption", "text": "hello"}]
        }))
        .await
        .unwrap();

    let plans = store.read_all().await.unwrap();
    assert_eq!(plans, vec![plan]);
}

#[tokio::test]
async fn upsert_with_same_id_leaves_one_record() {
    let (store, _kv) = store();
    store
        .upsert(&json!({"id": "p1", "title": "first", "createdAt": 10}))
        .await
        .unwrap();
    let replaced = store
        .upsert(&json!({"id": "p1", "title": "second", "createdAt": 20}))
        .await
        .unwrap();

    let plans = store.read_all().await.unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0], replaced);
    assert_eq!(plans[0].title, "second");
}

#[tokio::test]
async fn collection_stays_newest_first() {
    let (store, _kv) = store();
    store
        .upsert(&json!({"id": "old", "createdAt": 100}))
        .await
        .unwrap();
    store
        .upsert(&json!({"id": "new", "createdAt": 300}))
        .await
        .unwrap();
    store
        .upsert(&json!({"id": "mid", "createdAt": 200}))
        .await
        .unwrap();

    let ids: Vec<_> = store
        .read_all()
        .await
        .unwrap()
        .into_iter()
        .map(|plan| plan.id)
        .collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[tokio::test]
async fn legacy_records_match_by_created_at() {
    let (store, kv) = store();
    // a record written before stable ids existed
    kv.set(
        PLANS_KEY,
        json!([{ "title": "legacy", "createdAt": 42, "items": [] }]).to_string(),
    )
    .await
    .unwrap();

    let updated = store
        .update("no-such-id", &json!({"createdAt": 42, "status": "posted"}))
        .await
        .unwrap()
        .expect("legacy fallback match");
    assert_eq!(updated.status, PlanStatus::Posted);
    assert_eq!(updated.title, "legacy");

    let plans = store.read_all().await.unwrap();
    assert_eq!(plans.len(), 1, "fallback must not duplicate the record");
}

#[tokio::test]
async fn update_without_match_is_a_reported_no_op() {
    let (store, _kv) = store();
    store.upsert(&json!({"id": "p1", "createdAt": 1})).await.unwrap();

    let result = store
        .update("missing", &json!({"title": "nope"}))
        .await
        .unwrap();
    assert!(result.is_none());

    let plans = store.read_all().await.unwrap();
    assert_eq!(plans.len(), 1);
    assert_ne!(plans[0].title, "nope");
}

#[tokio::test]
async fn mark_posted_changes_only_the_status() {
    let (store, _kv) = store();
    let created = store
        .upsert(&json!({
            "id": "p1",
            "createdAt": 1_700_000_000_000_i64,
            "source": "quick-save",
            "items": [{"key": "caption", "label": "Caption", "text": "hi"}]
        }))
        .await
        .unwrap();
    assert_eq!(created.status, PlanStatus::Pending);

    let posted = store.mark_posted("p1").await.unwrap().expect("plan exists");
    assert_eq!(posted.status, PlanStatus::Posted);

    let reread = store.read_all().await.unwrap().remove(0);
    assert_eq!(reread.status, PlanStatus::Posted);
    assert_eq!(reread.id, created.id);
    assert_eq!(reread.title, created.title);
    assert_eq!(reread.created_at, created.created_at);
    assert_eq!(reread.source, created.source);
    assert_eq!(reread.items, created.items);
}

#[tokio::test]
async fn status_transitions_work_both_directions() {
    let (store, _kv) = store();
    store
        .upsert(&json!({"id": "p1", "status": "posted", "createdAt": 1}))
        .await
        .unwrap();

    let reverted = store
        .set_status("p1", PlanStatus::Pending)
        .await
        .unwrap()
        .expect("plan exists");
    assert_eq!(reverted.status, PlanStatus::Pending);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (store, _kv) = store();
    store.upsert(&json!({"id": "p1", "createdAt": 1})).await.unwrap();

    assert!(store.delete("p1").await.unwrap());
    assert!(!store.delete("p1").await.unwrap());
    assert!(store.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_blob_reads_as_empty() {
    let (store, kv) = store();
    kv.set(PLANS_KEY, "{not json".to_string()).await.unwrap();
    assert!(store.read_all().await.unwrap().is_empty());

    kv.set(PLANS_KEY, "\"a string, not an array\"".to_string())
        .await
        .unwrap();
    assert!(store.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn load_plans_persists_healed_ids() {
    let (store, kv) = store();
    kv.set(
        PLANS_KEY,
        json!([{ "title": "no id yet", "createdAt": 5 }]).to_string(),
    )
    .await
    .unwrap();

    let first = store.load_plans().await.unwrap();
    assert_eq!(first[0].id, "id-0");

    // the assigned id is now durable
    let second = store.load_plans().await.unwrap();
    assert_eq!(second[0].id, "id-0");
}
