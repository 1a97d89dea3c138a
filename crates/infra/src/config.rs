use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_env: String,
    pub log_level: String,
    pub data_dir: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_timeout_ms: u64,
    pub openai_temperature: f64,
    pub badge_poll_interval_ms: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let cfg = config::Config::builder()
            .set_default("app_env", "development")?
            .set_default("log_level", "info")?
            .set_default("data_dir", "./data")?
            .set_default("openai_api_key", "")?
            .set_default("openai_base_url", "https://api.openai.com/v1")?
            .set_default("openai_model", "gpt-4o-mini")?
            .set_default("openai_timeout_ms", 15_000)?
            .set_default("openai_temperature", 0.8)?
            .set_default("badge_poll_interval_ms", 15_000)?
            .add_source(config::Environment::default().separator("__"))
            .build()?;
        cfg.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// The remote generation credential; an empty or whitespace value
    /// means the pipeline runs local-only.
    pub fn openai_key(&self) -> Option<&str> {
        let key = self.openai_api_key.trim();
        if key.is_empty() { None } else { Some(key) }
    }
}
