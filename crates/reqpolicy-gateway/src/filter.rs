//! Request admission middleware.
//!
//! `RequestFilter` is the handler capability the host pipeline calls once per
//! request: it either forwards the untouched request to `next` or answers
//! with `403 Forbidden` itself. `RequestPolicy` implements it on top of the
//! core [`PolicyEvaluator`].

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use percent_encoding::percent_decode_str;

use reqpolicy_core::error::Result;
use reqpolicy_core::{Decision, PolicyEvaluator, RulesConfig};

/// One operation: handle a request, delegating to `next` when admitted.
#[async_trait]
pub trait RequestFilter: Send + Sync {
    async fn handle(&self, req: Request, next: Next) -> Response;
}

/// Named whitelist/blacklist filter. Immutable; share via Arc.
#[derive(Debug)]
pub struct RequestPolicy {
    name: String,
    evaluator: PolicyEvaluator,
}

impl RequestPolicy {
    pub fn new(name: impl Into<String>, rules: &RulesConfig) -> Result<Self> {
        let name = name.into();
        let evaluator = PolicyEvaluator::build(rules)?;
        tracing::info!(
            name = %name,
            whitelist = rules.whitelist_paths.len(),
            blacklist = rules.blacklist_paths.len(),
            "request policy ready"
        );
        Ok(Self { name, evaluator })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluator(&self) -> &PolicyEvaluator {
        &self.evaluator
    }

    /// Decide for a request URI: decoded path, raw query (empty when absent).
    pub fn decide_uri(&self, uri: &axum::http::Uri) -> Decision {
        let path = percent_decode_str(uri.path()).decode_utf8_lossy();
        let query = uri.query().unwrap_or("");
        let eval = self.evaluator.evaluate(&path, query);

        tracing::debug!(
            name = %self.name,
            path = %path,
            decision = eval.decision.as_str(),
            rule = ?eval.matched,
            "request policy decision"
        );
        eval.decision
    }
}

#[async_trait]
impl RequestFilter for RequestPolicy {
    async fn handle(&self, req: Request, next: Next) -> Response {
        let decision = self.decide_uri(req.uri());
        match decision {
            Decision::Allow => next.run(req).await,
            Decision::Deny => forbidden(),
        }
    }
}

/// 403 with the standard reason text as a plain-text body.
pub fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        "Forbidden\n",
    )
        .into_response()
}

/// axum middleware entry point.
pub async fn enforce(
    State(filter): State<Arc<dyn RequestFilter>>,
    req: Request,
    next: Next,
) -> Response {
    filter.handle(req, next).await
}

/// Put `filter` in front of every route and the fallback of `downstream`.
pub fn wrap(downstream: Router, filter: Arc<dyn RequestFilter>) -> Router {
    downstream.layer(middleware::from_fn_with_state(filter, enforce))
}

/// Compile `rules` and wrap `downstream` with the resulting policy.
/// Fails without producing a router if any pattern is invalid.
pub fn build(rules: &RulesConfig, name: &str, downstream: Router) -> Result<Router> {
    let policy = RequestPolicy::new(name, rules)?;
    Ok(wrap(downstream, Arc::new(policy)))
}
