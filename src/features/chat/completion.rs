//! Completion API client and its caching wrapper

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::json;

use super::cache::ResponseCache;

/// System prompt pinned for every relayed message.
const SYSTEM_PROMPT: &str =
    "You are a helpful assistant inside a chat bot. Keep answers short and to the point.";

const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 200;

/// A remote language-model completion call.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct HttpCompletionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl HttpCompletionClient {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        HttpCompletionClient {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("completion request failed")?
            .error_for_status()
            .context("completion endpoint returned an error status")?;

        let body: CompletionResponse = response
            .json()
            .await
            .context("malformed completion response")?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| anyhow!("completion response contained no content"))
    }
}

/// Caching wrapper: identical prompts within the TTL are answered from the
/// cache without touching the API.
pub struct CachedCompletion<C> {
    inner: C,
    cache: ResponseCache,
}

impl<C> CachedCompletion<C> {
    pub fn new(inner: C, cache: ResponseCache) -> Self {
        CachedCompletion { inner, cache }
    }
}

#[async_trait]
impl<C: CompletionClient> CompletionClient for CachedCompletion<C> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let key = format!("gpt:{prompt}");
        if let Some(hit) = self.cache.get(&key) {
            debug!("completion cache hit");
            return Ok(hit);
        }

        let answer = self.inner.complete(prompt).await?;
        self.cache.set(&key, answer.clone());
        Ok(answer)
    }
}
