//! Shared application state for the tenantgate gateway.
//!
//! Built once at startup from validated config, then cloned into every
//! request handler. Holds no process-wide singletons: tests build isolated
//! instances with their own cache and store.

use std::sync::Arc;

use tenantgate_core::error::{Result, TenantGateError};
use tenantgate_core::plan::{PlanCatalog, TenantPlan};

use crate::config::GatewayConfig;
use crate::policy::{
    AdminApiEvaluator, MemoryPlanStore, PolicyCache, StoreEvaluator, SuperRoles,
    TenantPlanStore, TenantPolicyEvaluator,
};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    cache: Arc<PolicyCache>,
    evaluator: Arc<StoreEvaluator>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    catalog: Arc<PlanCatalog>,
    admin: AdminApiEvaluator,
}

impl AppState {
    /// Build state over an in-memory plan store seeded from `cfg.tenants`.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let catalog = cfg.catalog()?;
        let plans = cfg
            .tenants
            .iter()
            .map(|t| t.to_plan(&catalog))
            .collect::<Result<Vec<TenantPlan>>>()
            .map_err(|e| TenantGateError::BadRequest(format!("tenant seed failed: {e}")))?;

        let store = MemoryPlanStore::with_plans(plans);
        tracing::info!(tenants = store.len(), "plan store seeded");
        Self::with_store(cfg, Arc::new(store))
    }

    /// Build state over an externally provided plan store.
    pub fn with_store(cfg: GatewayConfig, store: Arc<dyn TenantPlanStore>) -> Result<Self> {
        let catalog = Arc::new(cfg.catalog()?);
        let cache = Arc::new(PolicyCache::new(cfg.cache.ttl()));
        let evaluator = Arc::new(StoreEvaluator::new(
            store,
            Arc::clone(&catalog),
            Arc::clone(&cache),
        ));
        let admin = AdminApiEvaluator::new(SuperRoles::new(cfg.auth.super_roles.iter().cloned()));

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, catalog, admin }),
            cache,
            evaluator,
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn catalog(&self) -> &PlanCatalog {
        &self.inner.catalog
    }

    pub fn admin(&self) -> &AdminApiEvaluator {
        &self.inner.admin
    }

    pub fn cache(&self) -> Arc<PolicyCache> {
        Arc::clone(&self.cache)
    }

    pub fn evaluator(&self) -> Arc<dyn TenantPolicyEvaluator> {
        self.evaluator.clone()
    }

    /// Persist a tenant plan and refresh its cached policy.
    pub async fn assign_plan(&self, plan: TenantPlan) -> Result<()> {
        tracing::info!(
            tenant = %plan.name,
            plan = %plan.plan_type,
            status = %plan.tenant_status,
            "assigning tenant plan"
        );
        self.evaluator.put_plan(plan).await
    }
}
