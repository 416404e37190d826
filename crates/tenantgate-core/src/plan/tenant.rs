use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TenantGateError};

use super::catalog::PlanCatalog;
use super::policy::{PlanPolicy, Tier};

/// Tenant lifecycle state.
///
/// ```text
/// Deactivated -> Activated | Deleted
/// Activated   -> Suspended | Deactivated
/// Suspended   -> Activated | Deleted
/// ```
///
/// Wire values start at 1; 0 is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum TenantStatus {
    /// The only state in which a tenant may act.
    Activated = 1,
    /// Initial state.
    #[default]
    Deactivated = 2,
    Suspended = 3,
    /// Terminal.
    Deleted = 4,
}

impl TenantStatus {
    pub fn parse(s: &str) -> Option<TenantStatus> {
        match s {
            "activated" => Some(TenantStatus::Activated),
            "deactivated" => Some(TenantStatus::Deactivated),
            "suspended" => Some(TenantStatus::Suspended),
            "deleted" => Some(TenantStatus::Deleted),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TenantStatus::Activated => "activated",
            TenantStatus::Deactivated => "deactivated",
            TenantStatus::Suspended => "suspended",
            TenantStatus::Deleted => "deleted",
        }
    }

    pub const fn is_active(self) -> bool {
        matches!(self, TenantStatus::Activated)
    }

    pub const fn can_transition_to(self, next: TenantStatus) -> bool {
        use TenantStatus::*;
        matches!(
            (self, next),
            (Deactivated, Activated)
                | (Deactivated, Deleted)
                | (Activated, Suspended)
                | (Activated, Deactivated)
                | (Suspended, Activated)
                | (Suspended, Deleted)
        )
    }
}

impl TryFrom<u8> for TenantStatus {
    type Error = String;

    fn try_from(v: u8) -> std::result::Result<Self, Self::Error> {
        match v {
            1 => Ok(TenantStatus::Activated),
            2 => Ok(TenantStatus::Deactivated),
            3 => Ok(TenantStatus::Suspended),
            4 => Ok(TenantStatus::Deleted),
            other => Err(format!("invalid tenant status {other}")),
        }
    }
}

impl From<TenantStatus> for u8 {
    fn from(s: TenantStatus) -> u8 {
        s as u8
    }
}

impl fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tenant's assigned plan as persisted by the tenant store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantPlan {
    pub name: String,
    pub tenant_status: TenantStatus,
    pub org: String,
    pub users: String,
    pub plan_type: String,
    pub updated_at: DateTime<Utc>,
    pub policy: PlanPolicy,
    /// Newline-separated audit trail.
    #[serde(default)]
    pub audit: String,
}

impl TenantPlan {
    /// New, deactivated plan carrying the catalog policy for `tier`.
    pub fn new(name: impl Into<String>, tier: Tier, catalog: &PlanCatalog) -> Self {
        Self {
            name: name.into(),
            tenant_status: TenantStatus::default(),
            org: String::new(),
            users: String::new(),
            plan_type: tier.as_str().to_string(),
            updated_at: Utc::now(),
            policy: catalog.get(tier).clone(),
            audit: String::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.tenant_status.is_active()
    }

    /// Tier named by `plan_type`, if it is a known tier.
    pub fn tier(&self) -> Option<Tier> {
        Tier::parse(&self.plan_type)
    }

    /// Policy in force for this plan.
    ///
    /// The stored policy wins when it names a known tier; otherwise the
    /// catalog entry for `plan_type` applies. `None` when neither is known.
    pub fn effective_policy(&self, catalog: &PlanCatalog) -> Option<PlanPolicy> {
        if self.policy.tier().is_some() {
            return Some(self.policy.clone());
        }
        catalog.lookup(&self.plan_type).cloned()
    }

    /// Move to `next`, stamping `updated_at` and appending to the audit trail.
    pub fn transition(&mut self, next: TenantStatus, actor: &str) -> Result<()> {
        let prev = self.tenant_status;
        if !prev.can_transition_to(next) {
            return Err(TenantGateError::NotAllowed(format!(
                "tenant {} cannot move from {prev} to {next}",
                self.name
            )));
        }
        let now = Utc::now();
        self.tenant_status = next;
        self.updated_at = now;
        self.record_audit(now, actor, &format!("{prev} -> {next}"));
        Ok(())
    }

    fn record_audit(&mut self, at: DateTime<Utc>, actor: &str, what: &str) {
        if !self.audit.is_empty() {
            self.audit.push('\n');
        }
        self.audit.push_str(&format!("{} {actor}: {what}", at.to_rfc3339()));
    }
}
