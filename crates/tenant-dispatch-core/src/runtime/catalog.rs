// crates/tenant-dispatch-core/src/runtime/catalog.rs
// ============================================================================
// Module: Operation Catalog
// Description: Materializes configured operations for one scenario.
// Purpose: Give the load engine a flat, read-only list of operations to plan from.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The catalog is built once per (model, scenario). Every steady-state
//! configuration entry becomes one [`Operation`], appended in the order
//! upserts, queries (flattened across query sets), idle times, user-defined.
//! Setup statements are not steady-state work: they become the single
//! `PRE_RUN` operation the tenant init gate runs on first use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Operation;
use crate::core::OperationKind;
use crate::core::Scenario;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Operations configured for one scenario.
///
/// # Invariants
/// - `operations` never contains a `PRE_RUN` operation.
/// - `setup` is present iff the scenario declares at least one setup statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationCatalog {
    /// Setup operation run by the tenant init gate.
    setup: Option<Operation>,
    /// Steady-state operations in configuration order.
    operations: Vec<Operation>,
}

impl OperationCatalog {
    /// Builds the catalog from a scenario definition.
    #[must_use]
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let setup = if scenario.pre_scenario_ddls.is_empty() {
            None
        } else {
            Some(Operation::pre_run(scenario.pre_scenario_ddls.clone()))
        };
        let operations = scenario
            .upserts
            .iter()
            .map(Operation::upsert)
            .chain(scenario.queries().map(Operation::select))
            .chain(scenario.idle_times.iter().map(Operation::idle_time))
            .chain(scenario.udfs.iter().map(Operation::user_defined))
            .collect();
        Self {
            setup,
            operations,
        }
    }

    /// Returns the steady-state operations.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the setup operation, if the scenario declares setup statements.
    #[must_use]
    pub const fn setup_operation(&self) -> Option<&Operation> {
        self.setup.as_ref()
    }

    /// Returns the kinds with at least one configured entry, in index order.
    #[must_use]
    pub fn configured_kinds(&self) -> Vec<OperationKind> {
        OperationKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                OperationKind::PreRun => self.setup.is_some(),
                _ => self.operations.iter().any(|operation| operation.kind() == *kind),
            })
            .collect()
    }
}
