//! reqpolicy core: whitelist/blacklist request admission rules.
//!
//! This crate compiles path/query regex rules and evaluates them against a
//! request path and raw query string. It carries no HTTP or runtime
//! dependencies so the same evaluator can sit behind any handler chain.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Construction errors surface as `ReqPolicyError`; evaluation is infallible.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod dialect;
pub mod error;
pub mod evaluator;
pub mod rule;

/// Shared result type.
pub use error::{ErrorKind, Result, ReqPolicyError};
pub use evaluator::{Decision, Evaluation, MatchedRule, PolicyEvaluator};
pub use rule::{PatternField, Rule, RuleList, RuleSet, RuleSpec, RulesConfig};
