//! tenantgate core: subject parsing, tenant plan model, and error types.
//!
//! This crate holds the pure half of tenant authorization: turning an
//! authenticated subject into the tenant it acts for, and the tier/plan data
//! that quota and feature decisions are made against. It carries no runtime,
//! transport, or storage dependencies; every function here is synchronous and
//! safe to call from any number of threads.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Decisions on
//! unusual input degrade to a non-matching tenant or an absent policy.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod plan;
pub mod subject;

/// Shared result type.
pub use error::{Result, TenantGateError};
pub use subject::{extract_tenant, verify_subject};
