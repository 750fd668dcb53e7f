//! Feedback Signals Service: binary entrypoint.
//! Boots the Axum HTTP server with the deterministic summary and ranking engines.

use feedback_signals::devlog::{is_dev_env, ENV_DEV_LOG};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - SIGNALS_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var(ENV_DEV_LOG).ok().is_some_and(|v| v == "1");

    if !(dev_flag && (cfg!(debug_assertions) || is_dev_env())) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("signals=info,relevance=info,warn"));

    // Shuttle may already have installed a subscriber; keep whichever came first.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    // Lexicon and roster problems are fatal: the engine has no meaningful fallback.
    let router = feedback_signals::app()
        .await
        .map_err(shuttle_runtime::Error::Custom)?;

    Ok(router.into())
}
