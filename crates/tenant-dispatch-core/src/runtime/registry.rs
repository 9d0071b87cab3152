// crates/tenant-dispatch-core/src/runtime/registry.rs
// ============================================================================
// Module: Supplier Registry
// Description: Dispatch table from operation kind to executable unit.
// Purpose: Route each request to the single unit serving its kind.
// Dependencies: crate::{core, interfaces, runtime::catalog}
// ============================================================================

//! ## Overview
//! The registry is a fixed table indexed by [`OperationKind::index`]. A slot
//! is filled exactly when the catalog has at least one entry of that kind, by
//! asking the [`UnitFactory`] once at construction. Lookups clone the unit's
//! `Arc`, so execution happens without holding any registry state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::DataModel;
use crate::core::OperationKind;
use crate::core::Scenario;
use crate::interfaces::ExecutableUnit;
use crate::interfaces::UnitFactory;
use crate::runtime::catalog::OperationCatalog;
use crate::runtime::dispatcher::DispatchError;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Executable units keyed by operation kind.
///
/// # Invariants
/// - Exactly one unit per configured kind; unconfigured kinds have no entry.
/// - Structure is immutable after construction.
pub struct SupplierRegistry {
    /// Dispatch table indexed by `OperationKind::index`.
    units: [Option<Arc<dyn ExecutableUnit>>; OperationKind::COUNT],
}

impl SupplierRegistry {
    /// Registers one unit per kind configured in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Construction`] when the factory cannot build a unit.
    pub fn build(
        catalog: &OperationCatalog,
        factory: &dyn UnitFactory,
        model: &DataModel,
        scenario: &Scenario,
    ) -> Result<Self, DispatchError> {
        let mut units: [Option<Arc<dyn ExecutableUnit>>; OperationKind::COUNT] =
            std::array::from_fn(|_| None);
        for kind in catalog.configured_kinds() {
            let unit = factory.create(kind, model, scenario).map_err(|err| {
                DispatchError::Construction(format!("unit for {kind} unavailable: {err}"))
            })?;
            units[kind.index()] = Some(unit);
        }
        Ok(Self {
            units,
        })
    }

    /// Returns the unit registered for the kind.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownOperationKind`] when no unit is registered.
    pub fn supplier(&self, kind: OperationKind) -> Result<Arc<dyn ExecutableUnit>, DispatchError> {
        self.units[kind.index()].clone().ok_or(DispatchError::UnknownOperationKind(kind))
    }

    /// Returns true when a unit is registered for the kind.
    #[must_use]
    pub fn contains(&self, kind: OperationKind) -> bool {
        self.units[kind.index()].is_some()
    }

    /// Returns the registered kinds in index order.
    #[must_use]
    pub fn registered_kinds(&self) -> Vec<OperationKind> {
        OperationKind::ALL.into_iter().filter(|kind| self.contains(*kind)).collect()
    }
}
