use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, Response};
use opportunity_core::{App, Config, CORS_HEADERS};

async fn function_handler(app: &App, event: Request) -> Result<Response<Body>, Error> {
    let reply = app.handle(event.method().as_str(), event.body().as_ref()).await;

    let mut builder = Response::builder().status(reply.status);
    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }

    let body = match reply.body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json)
        }
        None => Body::Empty,
    };

    Ok(builder.body(body)?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set, lookups will fail");
    }
    let app = App::from_config(&config)?;

    run(service_fn(|event| function_handler(&app, event))).await
}
