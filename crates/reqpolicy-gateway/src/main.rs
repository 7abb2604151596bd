//! reqpolicy gateway
//!
//! - Loads the policy config (first CLI argument, default `reqpolicy.yaml`)
//! - Compiles whitelist/blacklist rules once at startup
//! - Serves every request through the admission filter

use tracing_subscriber::{fmt, EnvFilter};

use reqpolicy_core::error::{ReqPolicyError, Result};
use reqpolicy_gateway::{app_state, config, router};

const DEFAULT_CONFIG_PATH: &str = "reqpolicy.yaml";

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, kind = e.kind().as_str(), "reqpolicy-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let cfg = config::load_from_file(&path)?;
    let listen = cfg.gateway.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(&state, router::default_downstream());

    tracing::info!(
        %listen,
        name = %state.cfg().gateway.name,
        config = %path,
        "reqpolicy-gateway starting"
    );
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| ReqPolicyError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ReqPolicyError::Internal(format!("server failed: {e}")))
}
