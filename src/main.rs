use std::sync::Arc;
use axum::{
    body::Bytes,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Extension, Router,
};
use dotenvy::dotenv;
use opportunity_core::{ApiResponse, App, Config};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;


type GenericError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), GenericError> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set, lookups will fail");
    }
    let app = Arc::new(App::from_config(&config)?);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let router = Router::new()
        .route("/api/find-opportunities", any(find_opportunities))
        .layer(cors)
        .layer(Extension(app));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router).await?;

    Ok(())
}

async fn find_opportunities(Extension(app): Extension<Arc<App>>, method: Method, body: Bytes) -> Reply {
    Reply(app.handle(method.as_str(), &body).await)
}


pub struct Reply(pub ApiResponse);

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.0.body {
            Some(json) => (
                status,
                [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
                json,
            ).into_response(),
            None => status.into_response(),
        }
    }
}
