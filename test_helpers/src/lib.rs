//! Test helpers shared across crates in the strata-config workspace.
//!
//! This crate currently provides environment variable guards.

pub mod env;
