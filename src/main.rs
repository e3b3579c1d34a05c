//! Research relay binary entrypoint.
//! Boots the Axum HTTP server with the LLM, vision, news and keyword-search routes.

use research_relay::{config::AppConfig, metrics::Metrics, router, Services};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs; level from RUST_LOG, defaulting to info for this crate.
/// `try_init` keeps this a no-op when the runtime already installed a subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("research_relay=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AppConfig::load()?;
    let services = Services::from_config(&cfg);

    let metrics = Metrics::init(services.generator.is_enabled(), services.news.is_enabled())?;
    let app = router(services).merge(metrics.router());

    Ok(app.into())
}
