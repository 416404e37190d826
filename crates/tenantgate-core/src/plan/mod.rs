//! Plan model: tiers, quotas, plan policies and tenant plans.
//!
//! - `policy`: `Tier`, `Quota` and the immutable `PlanPolicy` bundle.
//! - `catalog`: the five-tier table, injectable and validated for monotonic ceilings.
//! - `tenant`: `TenantPlan` records and the `TenantStatus` state machine.
//! - `feature`: feature-code membership checks.

pub mod catalog;
pub mod feature;
pub mod policy;
pub mod tenant;

pub use catalog::PlanCatalog;
pub use feature::is_feature_supported;
pub use policy::{PlanPolicy, Quota, QuotaKind, Tier};
pub use tenant::{TenantPlan, TenantStatus};
