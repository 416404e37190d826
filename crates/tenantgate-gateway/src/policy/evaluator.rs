use std::sync::Arc;

use async_trait::async_trait;

use tenantgate_core::error::{Result, TenantGateError};
use tenantgate_core::plan::{PlanCatalog, PlanPolicy, TenantPlan};

use super::cache::PolicyCache;
use super::store::TenantPlanStore;

/// Resolves and gates tenant plans.
#[async_trait]
pub trait TenantPolicyEvaluator: Send + Sync {
    /// Policy in force for `tenant`, `None` when the tenant has no usable plan.
    async fn get_plan_policy(&self, tenant: &str) -> Option<PlanPolicy>;

    /// Fails unless `tenant` exists and is activated.
    async fn evaluate(&self, tenant: &str) -> Result<()>;
}

/// Evaluator backed by a plan store, fronted by the policy cache.
///
/// Cache misses load the tenant plan, resolve its policy against the catalog
/// and refresh the cache. Status checks always go to the store.
pub struct StoreEvaluator {
    store: Arc<dyn TenantPlanStore>,
    catalog: Arc<PlanCatalog>,
    cache: Arc<PolicyCache>,
}

impl StoreEvaluator {
    pub fn new(
        store: Arc<dyn TenantPlanStore>,
        catalog: Arc<PlanCatalog>,
        cache: Arc<PolicyCache>,
    ) -> Self {
        Self { store, catalog, cache }
    }

    /// Persist `plan` and refresh its cached policy.
    pub async fn put_plan(&self, plan: TenantPlan) -> Result<()> {
        let tenant = plan.name.clone();
        let policy = plan.effective_policy(&self.catalog);
        self.store.save_plan(plan).await?;
        match policy {
            Some(p) => self.cache.update(&tenant, p),
            None => self.cache.invalidate(&tenant),
        }
        Ok(())
    }

    /// Drop the cached policy and resolve it again from the store.
    pub async fn refresh(&self, tenant: &str) -> Option<PlanPolicy> {
        self.cache.invalidate(tenant);
        self.get_plan_policy(tenant).await
    }

    async fn load(&self, tenant: &str) -> Result<TenantPlan> {
        self.store
            .load_plan(tenant)
            .await?
            .ok_or_else(|| TenantGateError::NotFound(tenant.to_string()))
    }
}

#[async_trait]
impl TenantPolicyEvaluator for StoreEvaluator {
    async fn get_plan_policy(&self, tenant: &str) -> Option<PlanPolicy> {
        if let Some(p) = self.cache.get(tenant) {
            return Some(p);
        }

        let plan = match self.load(tenant).await {
            Ok(plan) => plan,
            Err(TenantGateError::NotFound(_)) => return None,
            Err(e) => {
                tracing::warn!(%tenant, error = %e, "plan store lookup failed");
                return None;
            }
        };

        let Some(policy) = plan.effective_policy(&self.catalog) else {
            tracing::warn!(%tenant, plan_type = %plan.plan_type, "tenant plan names no known tier");
            return None;
        };
        tracing::debug!(%tenant, plan = %policy.name, "policy cache refreshed");
        self.cache.update(tenant, policy.clone());
        Some(policy)
    }

    async fn evaluate(&self, tenant: &str) -> Result<()> {
        let plan = self.load(tenant).await?;
        if !plan.is_active() {
            return Err(TenantGateError::NotAllowed(format!(
                "tenant {tenant} is {}",
                plan.tenant_status
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use std::time::Duration;

    use tenantgate_core::plan::{TenantStatus, Tier};

    use super::*;
    use crate::policy::store::{MemoryPlanStore, TenantPlanStore};

    fn setup(plans: Vec<TenantPlan>) -> (StoreEvaluator, Arc<MemoryPlanStore>, Arc<PolicyCache>) {
        let store = Arc::new(MemoryPlanStore::with_plans(plans));
        let cache = Arc::new(PolicyCache::new(Duration::from_secs(60)));
        let eval = StoreEvaluator::new(
            store.clone(),
            Arc::new(PlanCatalog::standard()),
            cache.clone(),
        );
        (eval, store, cache)
    }

    fn plan(name: &str, tier: Tier, status: TenantStatus) -> TenantPlan {
        let mut p = TenantPlan::new(name, tier, &PlanCatalog::standard());
        p.tenant_status = status;
        p
    }

    #[tokio::test]
    async fn miss_populates_cache() {
        let (eval, _, cache) = setup(vec![plan("acme", Tier::Starter, TenantStatus::Activated)]);
        assert!(cache.get("acme").is_none());

        let p = eval.get_plan_policy("acme").await.expect("policy");
        assert_eq!(p.name, "starter");
        assert_eq!(cache.get("acme"), Some(p));
    }

    #[tokio::test]
    async fn cache_hit_skips_store() {
        let (eval, store, cache) = setup(vec![]);
        cache.update("ghost", PlanCatalog::standard().get(Tier::Free).clone());
        assert!(store.is_empty());
        assert_eq!(eval.get_plan_policy("ghost").await.map(|p| p.name), Some("free".into()));
    }

    #[tokio::test]
    async fn unknown_tenant() {
        let (eval, _, cache) = setup(vec![]);
        assert!(eval.get_plan_policy("nobody").await.is_none());
        assert!(cache.is_empty());
        let err = eval.evaluate("nobody").await.expect_err("unknown");
        assert_eq!(err.client_code().as_str(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn only_activated_tenants_pass() {
        let (eval, _, _) = setup(vec![
            plan("on", Tier::Free, TenantStatus::Activated),
            plan("off", Tier::Free, TenantStatus::Deactivated),
            plan("held", Tier::Free, TenantStatus::Suspended),
            plan("gone", Tier::Free, TenantStatus::Deleted),
        ]);
        assert!(eval.evaluate("on").await.is_ok());
        for t in ["off", "held", "gone"] {
            let err = eval.evaluate(t).await.expect_err(t);
            assert_eq!(err.client_code().as_str(), "NOT_ALLOWED");
        }
    }

    #[tokio::test]
    async fn put_plan_refreshes_cache() {
        let (eval, store, cache) = setup(vec![plan("acme", Tier::Free, TenantStatus::Activated)]);
        assert_eq!(eval.get_plan_policy("acme").await.map(|p| p.name), Some("free".into()));

        let upgraded = plan("acme", Tier::Dedicated, TenantStatus::Activated);
        eval.put_plan(upgraded).await.expect("save");
        assert_eq!(cache.get("acme").map(|p| p.name), Some("dedicated".into()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn refresh_rereads_store() {
        let (eval, store, cache) = setup(vec![plan("acme", Tier::Free, TenantStatus::Activated)]);
        assert_eq!(eval.get_plan_policy("acme").await.map(|p| p.name), Some("free".into()));

        // written behind the cache's back
        let upgraded = plan("acme", Tier::Production, TenantStatus::Activated);
        store.save_plan(upgraded).await.expect("save");
        assert_eq!(eval.get_plan_policy("acme").await.map(|p| p.name), Some("free".into()));

        let p = eval.refresh("acme").await.expect("policy");
        assert_eq!(p.name, "production");
        assert_eq!(cache.get("acme"), Some(p));
    }

    #[tokio::test]
    async fn refresh_of_removed_tenant_clears_cache() {
        let (eval, _, cache) = setup(vec![]);
        cache.update("ghost", PlanCatalog::standard().get(Tier::Free).clone());
        assert!(eval.refresh("ghost").await.is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn plan_without_known_tier_yields_none() {
        let mut p = plan("acme", Tier::Free, TenantStatus::Activated);
        p.policy.name = "custom".into();
        p.plan_type = "custom".into();
        let (eval, _, cache) = setup(vec![p]);
        assert!(eval.get_plan_policy("acme").await.is_none());
        assert!(cache.is_empty());
    }
}
