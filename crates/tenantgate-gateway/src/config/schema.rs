use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use tenantgate_core::error::{Result, TenantGateError};
use tenantgate_core::plan::feature::FEATURE_ALL_DISABLED;
use tenantgate_core::plan::{PlanCatalog, PlanPolicy, Quota, TenantPlan, TenantStatus, Tier};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub auth: AuthSection,

    #[serde(default)]
    pub cache: CacheSection,

    /// Overrides of the built-in tier table.
    #[serde(default)]
    pub tiers: Vec<TierConfig>,

    /// Initial tenant plans for the in-memory plan store.
    #[serde(default)]
    pub tenants: Vec<TenantSeed>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TenantGateError::UnsupportedVersion);
        }

        self.auth.validate()?;
        self.cache.validate()?;

        let catalog = self.catalog()?;

        let mut seen = HashSet::new();
        for t in &self.tenants {
            if !seen.insert(t.name.as_str()) {
                return Err(TenantGateError::BadRequest(format!(
                    "duplicate tenant: {}",
                    t.name
                )));
            }
            t.to_plan(&catalog)?;
        }

        Ok(())
    }

    /// Built-in catalog with every `tiers` override applied, validated as a
    /// whole. Entry order does not matter.
    pub fn catalog(&self) -> Result<PlanCatalog> {
        let mut seen = HashSet::new();
        let mut catalog = PlanCatalog::standard();
        for t in &self.tiers {
            let tier = Tier::parse(&t.name)
                .ok_or_else(|| TenantGateError::BadRequest(format!("unknown tier: {}", t.name)))?;
            if !seen.insert(tier) {
                return Err(TenantGateError::BadRequest(format!("duplicate tier: {tier}")));
            }
            catalog = catalog.replace(tier, t.to_policy());
        }
        catalog.validate()?;
        Ok(catalog)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    /// Subjects allowed to call mutating admin APIs and act as any tenant.
    #[serde(default)]
    pub super_roles: Vec<String>,
}

impl AuthSection {
    pub fn validate(&self) -> Result<()> {
        if self.super_roles.iter().any(|r| r.trim().is_empty()) {
            return Err(TenantGateError::BadRequest(
                "auth.super_roles must not contain empty entries".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSection {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl CacheSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=86400).contains(&self.ttl_secs) {
            return Err(TenantGateError::BadRequest(
                "cache.ttl_secs must be between 1 and 86400".into(),
            ));
        }
        if !(1..=86400).contains(&self.cleanup_interval_secs) {
            return Err(TenantGateError::BadRequest(
                "cache.cleanup_interval_secs must be between 1 and 86400".into(),
            ));
        }
        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

fn default_ttl_secs() -> u64 {
    15 * 60
}
fn default_cleanup_interval_secs() -> u64 {
    3 * 60 * 60
}

/// Full definition of one tier. Quotas take `-1` for unlimited.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    pub name: String,
    pub topics: Quota,
    pub namespaces: Quota,
    pub producers: Quota,
    pub consumers: Quota,
    pub functions: Quota,
    pub retention_hours: u64,
    #[serde(default = "default_feature_codes")]
    pub feature_codes: String,
}

impl TierConfig {
    pub fn to_policy(&self) -> PlanPolicy {
        PlanPolicy {
            name: self.name.clone(),
            num_of_topics: self.topics,
            num_of_namespaces: self.namespaces,
            message_retention: Duration::from_secs(self.retention_hours.saturating_mul(3600)),
            num_of_producers: self.producers,
            num_of_consumers: self.consumers,
            functions: self.functions,
            feature_codes: self.feature_codes.clone(),
        }
    }
}

fn default_feature_codes() -> String {
    FEATURE_ALL_DISABLED.into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantSeed {
    pub name: String,
    pub plan_type: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub users: String,
}

fn default_status() -> String {
    TenantStatus::Activated.as_str().into()
}

impl TenantSeed {
    pub fn to_plan(&self, catalog: &PlanCatalog) -> Result<TenantPlan> {
        if self.name.trim().is_empty() {
            return Err(TenantGateError::BadRequest("tenants[].name must not be empty".into()));
        }
        let tier = Tier::parse(&self.plan_type).ok_or_else(|| {
            TenantGateError::BadRequest(format!(
                "tenant {}: unknown plan_type {}",
                self.name, self.plan_type
            ))
        })?;
        let status = TenantStatus::parse(&self.status).ok_or_else(|| {
            TenantGateError::BadRequest(format!(
                "tenant {}: unknown status {}",
                self.name, self.status
            ))
        })?;

        let mut plan = TenantPlan::new(self.name.clone(), tier, catalog);
        plan.tenant_status = status;
        plan.org = self.org.clone();
        plan.users = self.users.clone();
        plan.audit = format!("{} config: seeded as {status}", plan.updated_at.to_rfc3339());
        Ok(plan)
    }
}
