//! Tenant plan storage seam.
//!
//! The durable store lives outside this crate; `MemoryPlanStore` backs the
//! binary (seeded from config) and tests.

use async_trait::async_trait;
use dashmap::DashMap;

use tenantgate_core::error::Result;
use tenantgate_core::plan::TenantPlan;

/// Backing store of tenant plans.
#[async_trait]
pub trait TenantPlanStore: Send + Sync {
    /// `Ok(None)` when the tenant has no plan.
    async fn load_plan(&self, tenant: &str) -> Result<Option<TenantPlan>>;
    /// Insert or replace the plan keyed by `plan.name`.
    async fn save_plan(&self, plan: TenantPlan) -> Result<()>;
}

/// In-process plan store.
#[derive(Debug, Default)]
pub struct MemoryPlanStore {
    plans: DashMap<String, TenantPlan>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self {
            plans: DashMap::new(),
        }
    }

    pub fn with_plans(plans: impl IntoIterator<Item = TenantPlan>) -> Self {
        let store = Self::new();
        for p in plans {
            store.plans.insert(p.name.clone(), p);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

#[async_trait]
impl TenantPlanStore for MemoryPlanStore {
    async fn load_plan(&self, tenant: &str) -> Result<Option<TenantPlan>> {
        Ok(self.plans.get(tenant).map(|p| p.value().clone()))
    }

    async fn save_plan(&self, plan: TenantPlan) -> Result<()> {
        self.plans.insert(plan.name.clone(), plan);
        Ok(())
    }
}
