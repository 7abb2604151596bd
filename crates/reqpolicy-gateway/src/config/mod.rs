//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use reqpolicy_core::error::{ReqPolicyError, Result};

pub use schema::{GatewayConfig, GatewaySection};

/// Load config from disk. `.json` files are parsed as JSON, anything else as YAML.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<GatewayConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| {
        ReqPolicyError::Internal(format!("read config failed ({}): {e}", path.display()))
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        load_from_json_str(&s)
    } else {
        load_from_str(&s)
    }
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| ReqPolicyError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_json_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_json::from_str(s)
        .map_err(|e| ReqPolicyError::BadConfig(format!("invalid json: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
