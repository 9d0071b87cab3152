// crates/tenant-dispatch-core/src/core/request.rs
// ============================================================================
// Module: Tenant Dispatch Requests
// Description: Operation requests, result records, and tenant view keys.
// Purpose: Define the records exchanged between the load engine and executors.
// Dependencies: crate::core::{identifiers, operation}, serde
// ============================================================================

//! ## Overview
//! An [`OperationRequest`] is one unit of load: a tenant, the scenario scope
//! it belongs to, and the [`Operation`] to execute. Executors answer with an
//! [`OperationResult`], which the dispatcher passes through untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::OperationId;
use crate::core::identifiers::TableName;
use crate::core::identifiers::TenantGroupId;
use crate::core::identifiers::TenantId;
use crate::core::operation::Operation;
use crate::core::operation::OperationKind;

// ============================================================================
// SECTION: Tenant View Key
// ============================================================================

/// Per-tenant schema unit subject to one-time setup.
///
/// # Invariants
/// - Equality and hashing use both fields by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TenantViewKey {
    /// Tenant identifier.
    pub tenant_id: TenantId,
    /// View (table) name the tenant's setup creates.
    pub view_name: TableName,
}

impl TenantViewKey {
    /// Creates a new tenant view key.
    #[must_use]
    pub const fn new(tenant_id: TenantId, view_name: TableName) -> Self {
        Self {
            tenant_id,
            view_name,
        }
    }
}

// ============================================================================
// SECTION: Operation Request
// ============================================================================

/// Operation request produced by the load engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRequest {
    /// Data model name.
    pub model_name: String,
    /// Scenario name.
    pub scenario_name: String,
    /// Table the scenario operates on.
    pub table_name: TableName,
    /// Tenant group the tenant belongs to.
    pub tenant_group_id: TenantGroupId,
    /// Tenant the request runs as.
    pub tenant_id: TenantId,
    /// Operation to execute.
    pub operation: Operation,
}

impl OperationRequest {
    /// Returns the kind of the carried operation.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.operation.kind()
    }

    /// Returns a copy of this request carrying a different operation.
    #[must_use]
    pub fn with_operation(&self, operation: Operation) -> Self {
        Self {
            model_name: self.model_name.clone(),
            scenario_name: self.scenario_name.clone(),
            table_name: self.table_name.clone(),
            tenant_group_id: self.tenant_group_id.clone(),
            tenant_id: self.tenant_id.clone(),
            operation,
        }
    }
}

// ============================================================================
// SECTION: Operation Result
// ============================================================================

/// Result record returned by an executable unit.
///
/// # Invariants
/// - Produced and consumed outside the dispatcher; never interpreted by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Identifier of the executed operation.
    pub operation_id: OperationId,
    /// Kind of the executed operation.
    pub kind: OperationKind,
    /// Tenant the operation ran as.
    pub tenant_id: TenantId,
    /// Executor status code (zero on success).
    pub status: i32,
    /// Rows read or written.
    pub row_count: u64,
    /// Start time in milliseconds since epoch.
    pub started_at_ms: u64,
    /// Execution duration in nanoseconds.
    pub duration_nanos: u64,
    /// Identifier of the worker or handler that executed the operation.
    pub handler_id: String,
}
