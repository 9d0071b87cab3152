// crates/tenant-dispatch-core/src/core/mod.rs
// ============================================================================
// Module: Tenant Dispatch Core Types
// Description: Identifiers, workload model, operations, and request records.
// Purpose: Provide stable, serializable types shared by config, runtime, and CLI.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types describe what a workload run is made of: the data model and its
//! scenarios, the operations configured for each scenario, and the requests
//! and result records exchanged with executable units.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod operation;
pub mod request;
pub mod scenario;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::OperationId;
pub use identifiers::TableName;
pub use identifiers::TenantGroupId;
pub use identifiers::TenantId;
pub use operation::Operation;
pub use operation::OperationKind;
pub use operation::OperationPayload;
pub use request::OperationRequest;
pub use request::OperationResult;
pub use request::TenantViewKey;
pub use scenario::DataModel;
pub use scenario::Ddl;
pub use scenario::IdleTime;
pub use scenario::LoadProfile;
pub use scenario::OperationGroup;
pub use scenario::Query;
pub use scenario::QuerySet;
pub use scenario::Scenario;
pub use scenario::TenantGroup;
pub use scenario::Upsert;
pub use scenario::UserDefined;
