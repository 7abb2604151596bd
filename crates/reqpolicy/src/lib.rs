//! Top-level facade crate for reqpolicy.
//!
//! Re-exports the rule evaluator and the gateway middleware so users can depend on a single crate.

pub mod core {
    pub use reqpolicy_core::*;
}

pub mod gateway {
    pub use reqpolicy_gateway::*;
}
