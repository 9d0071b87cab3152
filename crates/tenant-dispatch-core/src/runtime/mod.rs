// crates/tenant-dispatch-core/src/runtime/mod.rs
// ============================================================================
// Module: Tenant Dispatch Runtime
// Description: Catalog, registry, init gate, dispatcher, and audit sinks.
// Purpose: Route operation requests and gate first-use tenant setup.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules build the per-scenario operation catalog and supplier
//! registry, track initialized tenants in a Bloom filter behind a single
//! exclusive section, and expose both through [`OperationDispatcher`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod catalog;
pub mod dispatcher;
pub mod filter;
pub mod gate;
pub mod registry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileInitAuditSink;
pub use audit::InitAuditSink;
pub use audit::InitOutcome;
pub use audit::NoopInitAuditSink;
pub use audit::StderrInitAuditSink;
pub use audit::TenantInitAuditEvent;
pub use catalog::OperationCatalog;
pub use dispatcher::DispatchError;
pub use dispatcher::OperationDispatcher;
pub use filter::FilterError;
pub use filter::FilterKey;
pub use filter::FilterStats;
pub use filter::KeySink;
pub use filter::MembershipFilter;
pub use gate::TENANT_FILTER_FALSE_POSITIVE_RATE;
pub use gate::TenantInitGate;
pub use registry::SupplierRegistry;
