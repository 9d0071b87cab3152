// crates/tenant-dispatch-core/src/runtime/gate.rs
// ============================================================================
// Module: Tenant Init Gate
// Description: Once-per-tenant setup gate backed by a Bloom filter.
// Purpose: Run each tenant's setup routine effectively once under concurrency.
// Dependencies: crate::{core, interfaces, runtime::{audit, filter}}
// ============================================================================

//! ## Overview
//! The gate owns the membership filter inside a single `Mutex`. Every call to
//! [`TenantInitGate::initialize`] takes that section, tests the filter, runs
//! setup through the registered `PRE_RUN` unit when the tenant is absent, and
//! records the tenant only after setup completes. Test, act, and record all
//! happen under the one section, so setup runs at most once per tenant unless
//! the filter reports a false positive.
//!
//! The same section serves every tenant. First use of two different tenants
//! is serialized too, and so is the already-initialized fast path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::core::Operation;
use crate::core::OperationRequest;
use crate::core::TableName;
use crate::core::TenantId;
use crate::core::TenantViewKey;
use crate::interfaces::ExecutableUnit;
use crate::runtime::audit::InitAuditSink;
use crate::runtime::audit::InitOutcome;
use crate::runtime::audit::TenantInitAuditEvent;
use crate::runtime::dispatcher::DispatchError;
use crate::runtime::filter::FilterKey;
use crate::runtime::filter::FilterStats;
use crate::runtime::filter::KeySink;
use crate::runtime::filter::MembershipFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Target false-positive rate of the initialized-tenant filter.
pub const TENANT_FILTER_FALSE_POSITIVE_RATE: f64 = 0.000_000_1;

// ============================================================================
// SECTION: Filter Key
// ============================================================================

impl FilterKey for TenantViewKey {
    fn funnel(&self, sink: &mut KeySink) {
        sink.put_str(self.tenant_id.as_str()).put_str(self.view_name.as_str());
    }
}

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Setup operation paired with the unit that executes it.
struct SetupRoutine {
    /// Synthetic `PRE_RUN` operation carrying the setup statements.
    operation: Operation,
    /// Unit registered for `PRE_RUN`.
    unit: Arc<dyn ExecutableUnit>,
}

/// Concurrency-safe once-per-tenant setup gate.
///
/// # Invariants
/// - A key is added to the filter only after setup completed or lost a benign race.
/// - The section is acquired and released within one call; it is never re-entered.
pub struct TenantInitGate {
    /// View name every tenant key is scoped to.
    view_name: TableName,
    /// Setup routine, absent when no setup statements are configured.
    setup: Option<SetupRoutine>,
    /// Exclusive section owning the initialized-tenant filter.
    section: Mutex<MembershipFilter<TenantViewKey>>,
    /// Sink receiving one event per setup attempt.
    audit: Arc<dyn InitAuditSink>,
}

impl TenantInitGate {
    /// Creates a gate sized for `expected_tenants` distinct tenants.
    ///
    /// `setup` pairs the `PRE_RUN` operation with its unit; `None` makes the
    /// gate a no-op that treats every tenant as initialized.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Construction`] when the filter cannot be sized.
    pub fn new(
        view_name: TableName,
        setup: Option<(Operation, Arc<dyn ExecutableUnit>)>,
        expected_tenants: u64,
        audit: Arc<dyn InitAuditSink>,
    ) -> Result<Self, DispatchError> {
        let filter = MembershipFilter::new(expected_tenants, TENANT_FILTER_FALSE_POSITIVE_RATE)
            .map_err(|err| DispatchError::Construction(err.to_string()))?;
        Ok(Self {
            view_name,
            setup: setup.map(|(operation, unit)| SetupRoutine {
                operation,
                unit,
            }),
            section: Mutex::new(filter),
            audit,
        })
    }

    /// Ensures the request's tenant has completed setup.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Initialization`] when setup fails for any
    /// reason other than a benign creation race, or when the section is
    /// poisoned. The tenant stays uninitialized and the next call retries.
    pub fn initialize(&self, request: &OperationRequest) -> Result<(), DispatchError> {
        let key = TenantViewKey::new(request.tenant_id.clone(), self.view_name.clone());
        let mut filter = self.lock_section(&key)?;
        if filter.might_contain(&key) {
            return Ok(());
        }
        let Some(setup) = &self.setup else {
            filter.put(&key);
            return Ok(());
        };

        let setup_request = request.with_operation(setup.operation.clone());
        match setup.unit.execute(&setup_request) {
            Ok(result) => {
                self.audit.record(&TenantInitAuditEvent::new(
                    request,
                    &self.view_name,
                    InitOutcome::Initialized,
                    None,
                    Some(result),
                ));
                filter.put(&key);
                Ok(())
            }
            Err(err) if err.is_benign_race() => {
                self.audit.record(&TenantInitAuditEvent::new(
                    request,
                    &self.view_name,
                    InitOutcome::BenignRace,
                    Some(err.message),
                    None,
                ));
                filter.put(&key);
                Ok(())
            }
            Err(err) => {
                self.audit.record(&TenantInitAuditEvent::new(
                    request,
                    &self.view_name,
                    InitOutcome::Failed,
                    Some(err.message.clone()),
                    None,
                ));
                Err(DispatchError::Initialization {
                    tenant_id: key.tenant_id,
                    view_name: key.view_name,
                    message: err.message,
                })
            }
        }
    }

    /// Returns true when the tenant is reported as initialized.
    ///
    /// Always true when no setup routine is configured.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Initialization`] when the section is poisoned.
    pub fn is_initialized(&self, tenant_id: &TenantId) -> Result<bool, DispatchError> {
        if self.setup.is_none() {
            return Ok(true);
        }
        let key = TenantViewKey::new(tenant_id.clone(), self.view_name.clone());
        let filter = self.lock_section(&key)?;
        Ok(filter.might_contain(&key))
    }

    /// Returns true when a setup routine is configured.
    #[must_use]
    pub const fn has_setup(&self) -> bool {
        self.setup.is_some()
    }

    /// Returns a snapshot of the filter's sizing and occupancy.
    ///
    /// Reads through a poisoned section; the filter only ever gains bits.
    #[must_use]
    pub fn filter_stats(&self) -> FilterStats {
        self.section.lock().unwrap_or_else(PoisonError::into_inner).stats()
    }

    /// Acquires the exclusive section.
    fn lock_section(
        &self,
        key: &TenantViewKey,
    ) -> Result<MutexGuard<'_, MembershipFilter<TenantViewKey>>, DispatchError> {
        self.section.lock().map_err(|_| DispatchError::Initialization {
            tenant_id: key.tenant_id.clone(),
            view_name: key.view_name.clone(),
            message: "tenant init section poisoned".to_string(),
        })
    }
}
