//! Policy layer (admin gate, plan cache, plan evaluation).
//!
//! Holds the runtime half of tenant authorization: the superuser admin gate,
//! the TTL cache of resolved plan policies, and the evaluator that fills it
//! from the plan store.

pub mod admin;
pub mod cache;
pub mod evaluator;
pub mod store;

pub use admin::{AdminApiEvaluator, SuperRoles};
pub use cache::PolicyCache;
pub use evaluator::{StoreEvaluator, TenantPolicyEvaluator};
pub use store::{MemoryPlanStore, TenantPlanStore};
