//! OpenAI 兼容接口的文本生成实现

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::TextGeneration;
use crate::config::AppConfig;
use crate::errors::{EvalHubError, Result};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiEngine {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl OpenAiEngine {
    pub fn new() -> Result<Self> {
        let config = AppConfig::get();
        let engine = &config.engine;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(engine.timeout_secs))
            .build()
            .map_err(|e| EvalHubError::engine_failure(format!("构建 HTTP 客户端失败: {e}")))?;

        Ok(Self {
            client,
            base_url: engine.base_url.trim_end_matches('/').to_string(),
            api_key: engine.api_key.clone(),
            model: engine.model.clone(),
            max_tokens: engine.max_tokens,
            temperature: engine.temperature,
        })
    }
}

#[async_trait]
impl TextGeneration for OpenAiEngine {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        let request_body = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Engine API returned {}: {}", status, body);
            return Err(EvalHubError::engine_failure(format!(
                "Engine API returned {status}"
            )));
        }

        let chat: ChatResponse = response.json().await?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| EvalHubError::engine_failure("Engine returned empty content"))?;

        debug!("Engine call succeeded, {} chars generated", content.len());
        Ok(content)
    }
}
