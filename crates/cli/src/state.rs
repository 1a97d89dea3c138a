use std::sync::Arc;

use spark_domain::branding::BrandingStore;
use spark_domain::coerce::PlanCoercer;
use spark_domain::counters::BadgeService;
use spark_domain::generate::Generator;
use spark_domain::ports::chat::ChatCompletion;
use spark_domain::ports::ids::IdGenerator;
use spark_domain::ports::kv::KeyValueStore;
use spark_domain::product::ProductStore;
use spark_domain::profile::ProfileStore;
use spark_domain::store::{FlagStore, PlanStore};
use spark_infra::config::AppConfig;
use spark_infra::ids::UuidIdGenerator;
use spark_infra::openai::OpenAiChatClient;
use spark_infra::storage::JsonFileStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub plans: PlanStore,
    pub profile: ProfileStore,
    pub products: ProductStore,
    pub branding: BrandingStore,
    pub flags: FlagStore,
    pub badges: BadgeService,
    pub generator: Generator,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let kv: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileStore::open(config.data_dir.as_str()).await?);
        let ids: Arc<dyn IdGenerator> = Arc::new(UuidIdGenerator);
        let chat = OpenAiChatClient::from_config(&config)
            .map(|client| Arc::new(client) as Arc<dyn ChatCompletion>);
        Ok(Self::with_stores(config, kv, ids, chat))
    }

    pub fn with_stores(
        config: AppConfig,
        kv: Arc<dyn KeyValueStore>,
        ids: Arc<dyn IdGenerator>,
        chat: Option<Arc<dyn ChatCompletion>>,
    ) -> Self {
        let plans = PlanStore::new(kv.clone(), PlanCoercer::new(ids.clone()));
        let flags = FlagStore::new(kv.clone());
        Self {
            config,
            plans: plans.clone(),
            profile: ProfileStore::new(kv.clone()),
            products: ProductStore::new(kv.clone(), ids),
            branding: BrandingStore::new(kv),
            flags: flags.clone(),
            badges: BadgeService::new(plans, flags),
            generator: Generator::new(chat),
        }
    }
}
