//! Tenant context: who is calling, which tenant they act as, under which plan.

pub mod tenant;

pub use tenant::{resolve_tenant, SubjectMeta, TenantContext};
