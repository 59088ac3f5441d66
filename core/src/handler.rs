//! The lookup endpoint, independent of whichever server hosts it.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::config::Config;
use crate::error::{HandlerError, Rejection, UpstreamError};
use crate::fallback::fallback;
use crate::generation::{CompletionClient, OpenAiClient};
use crate::interpret::{interpret, CompletenessPolicy, GeneratedPayload};
use crate::model::OpportunityRequest;
use crate::prompt;


pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "Content-Type"),
];


/// Status plus an already serialized JSON body. `None` means an empty body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<String>,
}

impl ApiResponse {
    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body: Some(body) },
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response body");
                Self {
                    status: 500,
                    body: Some(r#"{"message":"Failed to fetch opportunities"}"#.to_string()),
                }
            }
        }
    }
}


/// What a lookup settled on. Callers get the same response shape either way;
/// only the logs tell the two apart.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Generated(GeneratedPayload),
    Fallback(Rejection),
}

impl Lookup {
    pub fn to_response(&self) -> ApiResponse {
        match self {
            Lookup::Generated(payload) => ApiResponse::json(200, payload),
            Lookup::Fallback(_) => ApiResponse::json(200, fallback()),
        }
    }
}


/// Prompt, one completion, interpretation, fallback.
#[derive(Clone)]
pub struct OpportunityFinder {
    client: Arc<dyn CompletionClient>,
    policy: CompletenessPolicy,
}

impl OpportunityFinder {
    pub fn new(client: Arc<dyn CompletionClient>, policy: CompletenessPolicy) -> Self {
        Self { client, policy }
    }

    pub async fn find(&self, request: &OpportunityRequest) -> Result<Lookup, UpstreamError> {
        let prompt = prompt::build(request, Utc::now().date_naive(), &self.policy);
        tracing::debug!(prompt_len = prompt.len(), "prompt built");

        let text = self.client.complete(&prompt).await?;

        let lookup = match interpret(&text, &self.policy) {
            Ok(payload) => {
                tracing::info!(model = self.client.model(), "returning generated opportunities");
                Lookup::Generated(payload)
            }
            Err(reason) => {
                tracing::warn!(%reason, model = self.client.model(), "substituting fallback opportunities");
                Lookup::Fallback(reason)
            }
        };

        Ok(lookup)
    }
}


#[derive(Clone)]
pub struct App {
    finder: OpportunityFinder,
    expose_error_details: bool,
}

impl App {
    pub fn new(finder: OpportunityFinder, expose_error_details: bool) -> Self {
        Self { finder, expose_error_details }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = OpenAiClient::new(config.api_key.clone(), config.generation.clone())?;
        let finder = OpportunityFinder::new(Arc::new(client), config.policy);
        Ok(Self::new(finder, config.expose_error_details))
    }

    /// Answers one call. POST bodies always get 200 or 500.
    pub async fn handle(&self, method: &str, body: &[u8]) -> ApiResponse {
        tracing::info!(method, "opportunity lookup received");

        match self.dispatch(method, body).await {
            Ok(response) => response,
            Err(e) => {
                if let HandlerError::Upstream(upstream) = &e {
                    tracing::error!(error = %upstream, "generation service call failed");
                }
                ApiResponse::json(e.status(), &e.body(self.expose_error_details))
            }
        }
    }

    async fn dispatch(&self, method: &str, body: &[u8]) -> Result<ApiResponse, HandlerError> {
        match method {
            "OPTIONS" => return Ok(ApiResponse::empty(200)),
            "POST" => {}
            _ => return Err(HandlerError::MethodNotAllowed),
        }

        let request = OpportunityRequest::from_body(body);
        let lookup = self.finder.find(&request).await?;

        Ok(lookup.to_response())
    }
}
