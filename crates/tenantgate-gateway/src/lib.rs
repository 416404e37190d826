//! tenantgate gateway library entry.
//!
//! This crate wires config, the admin gate, the plan policy cache and the
//! plan evaluator into the application state that request handlers consume.
//! It is used by the binary (`main.rs`) and by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app_state;
pub mod config;
pub mod context;
pub mod policy;
