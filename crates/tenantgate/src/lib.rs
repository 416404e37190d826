//! Top-level facade crate for tenantgate.
//!
//! Re-exports the core types (subject parsing, tier catalog, tenant plans,
//! feature checks) and the gateway library (YAML config with tiers and tenant
//! seeds, policy cache, evaluators, tenant resolution) so users can depend on
//! a single crate.

pub mod core {
    pub use tenantgate_core::*;
}

pub mod gateway {
    pub use tenantgate_gateway::*;
}
