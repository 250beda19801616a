//! AWS Lambda entry point for Forum Pulse.
//!
//! Deploy with `cargo lambda build --release --features lambda`
//! and attach a recurring schedule (e.g. `rate(6 hours)`).
//!
//! ## Environment Variables
//!
//! - `FORUM_SOURCES`: Comma separated sources (default: `n8n,automation`)
//! - `FETCH_LIMIT`, `TOP_N`, `REQUEST_DELAY_MS`, `HTTP_TIMEOUT_SECS`
//! - `DOCUMENT_COLLECTION`, `DOCUMENT_ID`: Stored document coordinates
//! - `DOCUMENT_BUCKET`, `DOCUMENT_PREFIX`: S3 location when using the execution role
//! - `SERVICE_ACCOUNT_JSON`: Static service account, overrides the execution role
//! - `RUST_LOG`: Log level (e.g., `info`, `debug`)

use lambda_runtime::{Error as LambdaError, service_fn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    // Initialize tracing for Lambda
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Forum Pulse Lambda starting...");

    lambda_runtime::run(service_fn(forum_pulse::lambda::handler)).await
}
