//! Gateway config loader (strict parsing).
//!
//! One YAML document, `version: 1`, with four optional sections:
//!
//! - `auth.super_roles`: subjects allowed to mutate admin APIs and act as any tenant
//! - `cache`: policy TTL and sweeper interval, in seconds
//! - `tiers`: full replacements for built-in tier policies, validated together
//! - `tenants`: plans seeded into the in-memory store at startup
//!
//! Unknown keys are rejected at every level.

pub mod schema;

use std::fs;

use tenantgate_core::error::{Result, TenantGateError};

pub use schema::{AuthSection, CacheSection, GatewayConfig, TenantSeed, TierConfig};

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TenantGateError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| TenantGateError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
