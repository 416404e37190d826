//! Feature codes carried by a plan policy.
//!
//! A feature-code string is either a sentinel (`all-enabled`, `all-disabled`)
//! or a comma-separated list of capability tokens. Tokens match exactly.

/// Every feature is enabled.
pub const FEATURE_ALL_ENABLED: &str = "all-enabled";
/// Every feature is disabled.
pub const FEATURE_ALL_DISABLED: &str = "all-disabled";
/// Expose broker prometheus metrics to the tenant.
pub const BROKER_METRICS: &str = "broker-metrics";

/// Whether `feature` is enabled by `feature_codes`.
pub fn is_feature_supported(feature: &str, feature_codes: &str) -> bool {
    match feature_codes {
        FEATURE_ALL_ENABLED => true,
        FEATURE_ALL_DISABLED => false,
        codes => codes.split(',').any(|code| code == feature),
    }
}
