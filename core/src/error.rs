use crate::model::State;


/// Failures talking to the generation service. These are never papered over
/// with fallback data.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("OPENAI_API_KEY is not configured")]
    MissingCredential,
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("generation service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("generation service returned no completion")]
    EmptyCompletion,
}


/// Why a completion was not usable as-is. Always recovered by substituting
/// the fallback payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("insufficient results: {total} events, {min_total} required, empty states {empty_states:?}")]
    InsufficientResults {
        total: usize,
        min_total: usize,
        empty_states: Vec<State>,
    },
}


#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl HandlerError {
    pub fn status(&self) -> u16 {
        match self {
            HandlerError::MethodNotAllowed => 405,
            HandlerError::Upstream(_) => 500,
        }
    }

    /// JSON body for the error. `expose_details` adds the debug form of the
    /// error, which is only meant for development deployments.
    pub fn body(&self, expose_details: bool) -> serde_json::Value {
        match self {
            HandlerError::MethodNotAllowed => serde_json::json!({
                "message": "Method not allowed"
            }),
            HandlerError::Upstream(e) => {
                let mut body = serde_json::json!({
                    "message": "Failed to fetch opportunities",
                    "error": e.to_string(),
                });
                if expose_details {
                    body["details"] = serde_json::Value::String(format!("{:?}", e));
                }
                body
            }
        }
    }
}


#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("MIN_TOTAL_EVENTS={min_total} is more than the {available} fallback events")]
    ThresholdAboveFallback { min_total: usize, available: usize },
}
