use tenantgate_core::error::{Result, TenantGateError};
use tenantgate_core::plan::{PlanPolicy, QuotaKind};
use tenantgate_core::subject::{extract_tenant, verify_subject};

use crate::app_state::AppState;

/// Identity carried by the caller's credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectMeta {
    /// Raw subject.
    pub subject: String,
    /// Subject without its instance suffix.
    pub immediate: String,
    /// Owning tenant of a delegated identity; equal to `immediate` otherwise.
    pub root: String,
    /// Subject is in the superuser set.
    pub super_role: bool,
}

/// An authorized caller bound to a target tenant and its plan policy.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant: String,
    pub meta: SubjectMeta,
    pub policy: PlanPolicy,
}

impl TenantContext {
    pub fn tenant_id(&self) -> &str {
        &self.tenant
    }
    pub fn subject(&self) -> &str {
        &self.meta.subject
    }
    pub fn policy(&self) -> &PlanPolicy {
        &self.policy
    }

    pub fn check_quota(&self, kind: QuotaKind, in_use: u32) -> Result<()> {
        self.policy.check_quota(kind, in_use)
    }

    pub fn supports_feature(&self, feature: &str) -> bool {
        self.policy.supports_feature(feature)
    }
}

/// Authorize `subject` against `tenant` and resolve the tenant's policy.
///
/// Superusers act as any tenant; everyone else must authenticate as the tenant
/// itself or as one of its delegated `-client` identities. The tenant must be
/// activated and resolve to a known plan.
pub async fn resolve_tenant(
    state: &AppState,
    tenant: &str,
    subject: &str,
) -> Result<TenantContext> {
    let (immediate, root) = extract_tenant(subject);
    let super_role = state.admin().is_super_role(subject);

    if !super_role && !verify_subject(tenant, subject) {
        tracing::warn!(%tenant, %subject, "subject does not match tenant");
        return Err(TenantGateError::AuthFailed);
    }

    let evaluator = state.evaluator();
    evaluator.evaluate(tenant).await?;
    let policy = evaluator
        .get_plan_policy(tenant)
        .await
        .ok_or_else(|| TenantGateError::NotAllowed(format!("no plan policy for tenant {tenant}")))?;

    Ok(TenantContext {
        tenant: tenant.to_string(),
        meta: SubjectMeta {
            subject: subject.to_string(),
            immediate: immediate.to_string(),
            root: root.to_string(),
            super_role,
        },
        policy,
    })
}
