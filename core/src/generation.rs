use std::{sync::Arc, time::{Duration, Instant}};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;


/// A text-generation service that turns one prompt into one completion.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError>;

    fn model(&self) -> &str;
}


#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            timeout: Duration::from_secs(60),
        }
    }
}


/// Chat completions client. One attempt per call, bounded by the timeout
/// set on the underlying `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: Option<Arc<String>>,
    settings: Arc<GenerationSettings>,
}

impl OpenAiClient {
    pub fn new_w_client(client: reqwest::Client, api_key: Option<String>, settings: GenerationSettings) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()).map(Arc::new),
            settings: Arc::new(settings),
        }
    }

    pub fn new(api_key: Option<String>, settings: GenerationSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self::new_w_client(client, api_key, settings))
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.settings.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        let api_key = self.api_key.as_ref().ok_or(UpstreamError::MissingCredential)?;

        let body = ChatRequest {
            model: &self.settings.model,
            messages: [ChatMessage { role: "user", content: prompt }],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let started = Instant::now();
        tracing::debug!(model = %self.settings.model, prompt_len = prompt.len(), "calling generation service");

        let res = self.client
            .post(self.url())
            .bearer_auth(api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status: status.as_u16(), body });
        }

        let res: ChatResponse = res.json().await?;
        tracing::info!(
            model = %self.settings.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generation service responded"
        );

        res.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(UpstreamError::EmptyCompletion)
    }

    fn model(&self) -> &str {
        &self.settings.model
    }
}


#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}
