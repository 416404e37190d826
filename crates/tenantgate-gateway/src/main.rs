//! tenantgate gateway process.
//!
//! - Loads config (first argument, default `tenantgate.yaml`)
//! - Seeds the plan store and builds the policy cache
//! - Runs the cache sweeper until Ctrl-C

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use tenantgate_gateway::{app_state, config};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "tenantgate.yaml".to_string());
    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%path, error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };
    let sweep_every = cfg.cache.cleanup_interval();

    let state = match app_state::AppState::new(cfg) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "tenant manager setup failed");
            return ExitCode::FAILURE;
        }
    };

    for (tier, p) in state.catalog().iter() {
        tracing::info!(
            %tier,
            topics = %p.num_of_topics,
            namespaces = %p.num_of_namespaces,
            retention_hours = p.message_hour_retention(),
            features = %p.feature_codes,
            "plan tier"
        );
    }

    let cache = state.cache();
    let sweeper = cache.spawn_sweeper(sweep_every);
    tracing::info!(
        ttl_secs = cache.ttl().as_secs(),
        super_roles = state.cfg().auth.super_roles.len(),
        "tenantgate-gateway ready"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "signal handler failed");
    }
    sweeper.abort();
    tracing::info!("tenantgate-gateway stopped");
    ExitCode::SUCCESS
}
