//! Finds upcoming outreach events for BBB service areas by asking a
//! text-generation service, and falls back to bundled events when the answer
//! isn't usable.

pub mod config;
pub mod error;
pub mod fallback;
pub mod generation;
pub mod handler;
pub mod interpret;
pub mod model;
pub mod prompt;

#[cfg(test)]
mod test_server;

pub use config::Config;
pub use error::{ConfigError, HandlerError, Rejection, UpstreamError};
pub use fallback::fallback;
pub use generation::{CompletionClient, GenerationSettings, OpenAiClient};
pub use handler::{ApiResponse, App, Lookup, OpportunityFinder, CORS_HEADERS};
pub use interpret::{interpret, strip_code_fences, CompletenessPolicy, GeneratedPayload};
pub use model::{Event, OpportunityRequest, Opportunities, State};
