// crates/tenant-dispatch-core/src/runtime/dispatcher.rs
// ============================================================================
// Module: Operation Dispatcher
// Description: Facade composing the catalog, registry, and tenant init gate.
// Purpose: Provide the single entry point the load engine talks to.
// Dependencies: crate::{core, interfaces, runtime}, thiserror
// ============================================================================

//! ## Overview
//! An [`OperationDispatcher`] is built once per (model, scenario) workload run
//! and shared by every worker of that run. Workers call
//! [`OperationDispatcher::initialize_tenant`] before a tenant's work, then
//! resolve the unit for the request's kind with
//! [`OperationDispatcher::operation_supplier`] and execute it. Only tenant
//! initialization is serialized; unit lookup and execution run in parallel.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::DataModel;
use crate::core::Operation;
use crate::core::OperationKind;
use crate::core::OperationRequest;
use crate::core::OperationResult;
use crate::core::Scenario;
use crate::core::TableName;
use crate::core::TenantGroupId;
use crate::core::TenantId;
use crate::interfaces::ExecutableUnit;
use crate::interfaces::ExecutionError;
use crate::interfaces::UnitFactory;
use crate::runtime::audit::InitAuditSink;
use crate::runtime::catalog::OperationCatalog;
use crate::runtime::filter::FilterStats;
use crate::runtime::gate::TenantInitGate;
use crate::runtime::registry::SupplierRegistry;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors surfaced by the dispatcher.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Benign setup races are recovered internally and never surface here.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No unit is registered for the requested operation kind.
    #[error("unknown operation kind: {0}")]
    UnknownOperationKind(OperationKind),
    /// Tenant setup failed; the tenant remains uninitialized.
    #[error("failed to initialize tenant [{tenant_id}, {view_name}]: {message}")]
    Initialization {
        /// Tenant whose setup failed.
        tenant_id: TenantId,
        /// View the setup targeted.
        view_name: TableName,
        /// Executor failure detail.
        message: String,
    },
    /// Dispatcher could not be built from the given configuration.
    #[error("dispatcher construction failed: {0}")]
    Construction(String),
    /// A dispatched unit failed.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Tenant-scoped operation dispatcher for one (model, scenario) run.
pub struct OperationDispatcher {
    /// Data model the run belongs to.
    model: DataModel,
    /// Scenario being run.
    scenario: Scenario,
    /// Configured operations.
    catalog: OperationCatalog,
    /// Units keyed by operation kind.
    registry: SupplierRegistry,
    /// Once-per-tenant setup gate.
    gate: TenantInitGate,
}

impl OperationDispatcher {
    /// Builds the dispatcher for `scenario_name` within `model`.
    ///
    /// The init gate's filter is sized from the scenario's total tenant count.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Construction`] when the scenario is not part of
    /// the model, a unit cannot be built, or the filter cannot be sized.
    pub fn new(
        factory: &dyn UnitFactory,
        model: &DataModel,
        scenario_name: &str,
        audit: Arc<dyn InitAuditSink>,
    ) -> Result<Self, DispatchError> {
        let scenario = model.scenario(scenario_name).cloned().ok_or_else(|| {
            DispatchError::Construction(format!(
                "scenario {scenario_name} not found in model {}",
                model.name
            ))
        })?;
        let catalog = OperationCatalog::from_scenario(&scenario);
        let registry = SupplierRegistry::build(&catalog, factory, model, &scenario)?;
        let setup = match catalog.setup_operation() {
            Some(operation) => Some((operation.clone(), registry.supplier(OperationKind::PreRun)?)),
            None => None,
        };
        let gate = TenantInitGate::new(
            scenario.table_name.clone(),
            setup,
            scenario.total_tenants(),
            audit,
        )?;
        Ok(Self {
            model: model.clone(),
            scenario,
            catalog,
            registry,
            gate,
        })
    }

    /// Returns the steady-state operations the load engine plans from.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        self.catalog.operations()
    }

    /// Returns the data model.
    #[must_use]
    pub const fn model(&self) -> &DataModel {
        &self.model
    }

    /// Returns the scenario.
    #[must_use]
    pub const fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Returns the operation catalog, including the setup operation.
    #[must_use]
    pub const fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    /// Returns the kinds that have a registered unit, in index order.
    #[must_use]
    pub fn registered_kinds(&self) -> Vec<OperationKind> {
        self.registry.registered_kinds()
    }

    /// Builds a request scoped to this dispatcher's model, scenario, and table.
    #[must_use]
    pub fn request(
        &self,
        tenant_group_id: TenantGroupId,
        tenant_id: TenantId,
        operation: Operation,
    ) -> OperationRequest {
        OperationRequest {
            model_name: self.model.name.clone(),
            scenario_name: self.scenario.name.clone(),
            table_name: self.scenario.table_name.clone(),
            tenant_group_id,
            tenant_id,
            operation,
        }
    }

    /// Ensures the request's tenant has completed its one-time setup.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Initialization`] when setup fails.
    pub fn initialize_tenant(&self, request: &OperationRequest) -> Result<(), DispatchError> {
        self.gate.initialize(request)
    }

    /// Returns the unit that executes the request's operation kind.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownOperationKind`] when the kind is not configured.
    pub fn operation_supplier(
        &self,
        request: &OperationRequest,
    ) -> Result<Arc<dyn ExecutableUnit>, DispatchError> {
        self.registry.supplier(request.kind())
    }

    /// Executes the request on its unit without touching the init gate.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when lookup or execution fails.
    pub fn execute(&self, request: &OperationRequest) -> Result<OperationResult, DispatchError> {
        let unit = self.operation_supplier(request)?;
        Ok(unit.execute(request)?)
    }

    /// Initializes the tenant, then executes the request on its unit.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when initialization, lookup, or execution fails.
    pub fn dispatch(&self, request: &OperationRequest) -> Result<OperationResult, DispatchError> {
        self.initialize_tenant(request)?;
        self.execute(request)
    }

    /// Returns true when the tenant is reported as initialized.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Initialization`] when the init section is poisoned.
    pub fn is_tenant_initialized(&self, tenant_id: &TenantId) -> Result<bool, DispatchError> {
        self.gate.is_initialized(tenant_id)
    }

    /// Returns the init gate filter's sizing and occupancy.
    #[must_use]
    pub fn filter_stats(&self) -> FilterStats {
        self.gate.filter_stats()
    }
}
