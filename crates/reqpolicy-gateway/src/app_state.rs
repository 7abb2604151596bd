//! Shared application state for the reqpolicy gateway.
//!
//! The policy is compiled exactly once here; startup fails with an error
//! instead of serving with a partial or default rule set.

use std::sync::Arc;

use reqpolicy_core::error::Result;

use crate::config::GatewayConfig;
use crate::filter::{RequestFilter, RequestPolicy};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    policy: Arc<RequestPolicy>,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let policy = RequestPolicy::new(cfg.gateway.name.clone(), &cfg.policy).map_err(|e| {
            tracing::error!(name = %cfg.gateway.name, error = %e, "request policy compile failed");
            e
        })?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                policy: Arc::new(policy),
            }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn policy(&self) -> Arc<RequestPolicy> {
        Arc::clone(&self.inner.policy)
    }

    pub fn filter(&self) -> Arc<dyn RequestFilter> {
        self.policy()
    }
}
