// crates/tenant-dispatch-config/src/lib.rs
// ============================================================================
// Module: Tenant Dispatch Config Library
// Description: Workload configuration model, loading, and validation.
// Purpose: Single source of truth for tenant-dispatch.toml semantics.
// Dependencies: tenant-dispatch-core, serde, toml
// ============================================================================

//! ## Overview
//! `tenant-dispatch-config` loads the data models and scenarios a workload
//! run is built from, validates them fail-closed, and selects the audit sink
//! that receives tenant initialization events.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
