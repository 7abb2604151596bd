use std::net::SocketAddr;

use reqpolicy_core::error::{ReqPolicyError, Result};
use reqpolicy_core::RulesConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub policy: RulesConfig,
}

impl GatewayConfig {
    /// Structural checks only; patterns are compiled when the policy is built.
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ReqPolicyError::UnsupportedVersion);
        }

        self.gateway.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Middleware instance name, used in logs.
    #[serde(default = "default_name")]
    pub name: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            name: default_name(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ReqPolicyError::BadConfig("gateway.name must not be empty".into()));
        }
        self.listen_addr()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            ReqPolicyError::BadConfig(format!(
                "gateway.listen must be a valid socket address ({}): {e}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_name() -> String {
    "requestpolicy".into()
}
