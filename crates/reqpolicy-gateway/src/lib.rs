//! reqpolicy gateway library entry.
//!
//! Wires the core rule evaluator into an axum middleware, together with the
//! strict config loader and shared state used by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod filter;
pub mod router;
