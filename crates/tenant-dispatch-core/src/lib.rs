// crates/tenant-dispatch-core/src/lib.rs
// ============================================================================
// Module: Tenant Dispatch Core Library
// Description: Public API surface for the tenant-scoped operation dispatcher.
// Purpose: Expose workload types, executor interfaces, and the dispatcher runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Tenant Dispatch core routes tenant-tagged operation requests to the
//! executable unit registered for their operation kind, and guarantees that
//! each tenant's one-time setup routine runs effectively once even when many
//! workers touch that tenant concurrently. Tenant initialization is tracked in
//! a compact Bloom filter owned by the dispatcher and guarded by a single
//! exclusive section.
//!
//! The load engine that produces requests, the data layer that executes them,
//! and the reporting of results live outside this crate and integrate through
//! the [`ExecutableUnit`] and [`UnitFactory`] interfaces.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::CONCURRENT_TABLE_MUTATION_CODE;
pub use interfaces::ExecutableUnit;
pub use interfaces::ExecutionError;
pub use interfaces::ExecutionErrorKind;
pub use interfaces::UnitFactory;
pub use runtime::DispatchError;
pub use runtime::FileInitAuditSink;
pub use runtime::FilterError;
pub use runtime::FilterKey;
pub use runtime::FilterStats;
pub use runtime::InitAuditSink;
pub use runtime::InitOutcome;
pub use runtime::KeySink;
pub use runtime::MembershipFilter;
pub use runtime::NoopInitAuditSink;
pub use runtime::OperationCatalog;
pub use runtime::OperationDispatcher;
pub use runtime::StderrInitAuditSink;
pub use runtime::SupplierRegistry;
pub use runtime::TENANT_FILTER_FALSE_POSITIVE_RATE;
pub use runtime::TenantInitAuditEvent;
pub use runtime::TenantInitGate;
