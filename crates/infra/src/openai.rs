use std::time::Duration;

use serde_json::{Value, json};
use spark_domain::ports::BoxFuture;
use spark_domain::ports::chat::{ChatCompletion, ChatCompletionError};

use crate::config::AppConfig;

/// Chat-completion adapter for the remote generation path. Built only
/// when a credential is configured; a `None` client means the pipeline
/// runs local-only from the start.
#[derive(Clone)]
pub struct OpenAiChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl OpenAiChatClient {
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        let api_key = config.openai_key()?.to_string();
        let timeout = Duration::from_millis(config.openai_timeout_ms.max(1));
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Some(Self {
            http,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.openai_model.clone(),
            temperature: config.openai_temperature,
        })
    }
}

impl ChatCompletion for OpenAiChatClient {
    fn complete(&self, prompt: &str) -> BoxFuture<'_, Result<String, ChatCompletionError>> {
        let payload = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.temperature,
        });
        Box::pin(async move {
            let url = format!("{}/chat/completions", self.base_url);
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&payload)
                .send()
                .await
                .map_err(|err| {
                    tracing::warn!(error = %err, "chat completion transport failed");
                    ChatCompletionError::Transport(err.to_string())
                })?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), "chat completion upstream error");
                return Err(ChatCompletionError::Upstream(format!(
                    "status {}: {message}",
                    status.as_u16()
                )));
            }

            let body = response
                .json::<Value>()
                .await
                .map_err(|err| ChatCompletionError::InvalidResponse(err.to_string()))?;
            extract_content(&body).ok_or_else(|| {
                tracing::warn!("chat completion body had no message content");
                ChatCompletionError::InvalidResponse("missing message content".to_string())
            })
        })
    }
}

fn extract_content(body: &Value) -> Option<String> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}
