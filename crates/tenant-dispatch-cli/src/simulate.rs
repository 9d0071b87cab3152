// crates/tenant-dispatch-cli/src/simulate.rs
// ============================================================================
// Module: Dry-Run Simulation
// Description: Dry-run executable units and a threaded dispatch loop.
// Purpose: Exercise a dispatcher end to end without a data layer.
// Dependencies: tenant-dispatch-core, serde
// ============================================================================

//! ## Overview
//! Simulation builds an [`OperationDispatcher`] over dry-run units that count
//! executions instead of touching a database, then drives it from a pool of
//! worker threads. Request `i` targets tenant `i mod total` of the load
//! profile and operation `i mod len` of the catalog, so every tenant is
//! touched concurrently by several workers once the request count exceeds
//! the tenant population.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Instant;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use tenant_dispatch_core::DataModel;
use tenant_dispatch_core::DispatchError;
use tenant_dispatch_core::ExecutableUnit;
use tenant_dispatch_core::ExecutionError;
use tenant_dispatch_core::FilterStats;
use tenant_dispatch_core::InitAuditSink;
use tenant_dispatch_core::OperationDispatcher;
use tenant_dispatch_core::OperationKind;
use tenant_dispatch_core::OperationPayload;
use tenant_dispatch_core::OperationRequest;
use tenant_dispatch_core::OperationResult;
use tenant_dispatch_core::Scenario;
use tenant_dispatch_core::TenantGroupId;
use tenant_dispatch_core::TenantId;
use tenant_dispatch_core::UnitFactory;
use thiserror::Error;

// ============================================================================
// SECTION: Dry-Run Units
// ============================================================================

/// Execution counters shared by every dry-run unit of one simulation.
#[derive(Debug, Default)]
pub(crate) struct DryRunCounters {
    /// Executions per kind, indexed by `OperationKind::index`.
    executions: [AtomicU64; OperationKind::COUNT],
}

impl DryRunCounters {
    /// Records one execution of `kind`.
    fn record(&self, kind: OperationKind) {
        self.executions[kind.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Returns executions recorded for `kind`.
    pub(crate) fn executions(&self, kind: OperationKind) -> u64 {
        self.executions[kind.index()].load(Ordering::Relaxed)
    }
}

/// Unit that answers every request of its kind without side effects.
struct DryRunUnit {
    /// Kind this unit serves.
    kind: OperationKind,
    /// Shared execution counters.
    counters: Arc<DryRunCounters>,
}

impl ExecutableUnit for DryRunUnit {
    fn execute(&self, request: &OperationRequest) -> Result<OperationResult, ExecutionError> {
        if request.kind() != self.kind {
            return Err(ExecutionError::failed(format!(
                "{} unit received {} request",
                self.kind,
                request.kind()
            )));
        }
        let started = Instant::now();
        let started_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        let row_count = match &request.operation.payload {
            OperationPayload::Select(query) => query.expected_row_count.unwrap_or(0),
            OperationPayload::Upsert(_) | OperationPayload::UserDefined(_) => 1,
            OperationPayload::PreRun(ddls) => u64::try_from(ddls.len()).unwrap_or(u64::MAX),
            OperationPayload::IdleTime(_) => 0,
        };
        self.counters.record(self.kind);
        Ok(OperationResult {
            operation_id: request.operation.id.clone(),
            kind: self.kind,
            tenant_id: request.tenant_id.clone(),
            status: 0,
            row_count,
            started_at_ms,
            duration_nanos: u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX),
            handler_id: format!("dry-run-{}", self.kind.as_str().to_ascii_lowercase()),
        })
    }
}

/// Factory producing one dry-run unit per kind.
pub(crate) struct DryRunFactory {
    /// Counters shared with every unit built.
    counters: Arc<DryRunCounters>,
}

impl DryRunFactory {
    /// Creates a factory with fresh counters.
    pub(crate) fn new() -> Self {
        Self {
            counters: Arc::new(DryRunCounters::default()),
        }
    }

    /// Returns the shared execution counters.
    pub(crate) const fn counters(&self) -> &Arc<DryRunCounters> {
        &self.counters
    }
}

impl UnitFactory for DryRunFactory {
    fn create(
        &self,
        kind: OperationKind,
        _model: &DataModel,
        _scenario: &Scenario,
    ) -> Result<Arc<dyn ExecutableUnit>, ExecutionError> {
        Ok(Arc::new(DryRunUnit {
            kind,
            counters: Arc::clone(&self.counters),
        }))
    }
}

// ============================================================================
// SECTION: Tenant Plan
// ============================================================================

/// Deterministic mapping from a request index to a tenant of the load profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TenantPlan {
    /// Tenant groups with the exclusive end of their cumulative index range.
    groups: Vec<(TenantGroupId, u64)>,
    /// Total tenants across every group.
    total: u64,
}

impl TenantPlan {
    /// Builds the plan from a scenario's tenant distribution.
    pub(crate) fn from_scenario(scenario: &Scenario) -> Self {
        let mut total = 0_u64;
        let groups = scenario
            .load_profile
            .tenant_distribution
            .iter()
            .map(|group| {
                total = total.saturating_add(u64::from(group.num_tenants));
                (group.id.clone(), total)
            })
            .collect();
        Self {
            groups,
            total,
        }
    }

    /// Returns the total tenant count.
    pub(crate) const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the tenant serving request `index`, or `None` for an empty plan.
    ///
    /// Tenant ids are `<group>-<index>` so ids from different groups never collide.
    pub(crate) fn tenant_at(&self, index: u64) -> Option<(TenantGroupId, TenantId)> {
        if self.total == 0 {
            return None;
        }
        let slot = index % self.total;
        let mut start = 0_u64;
        for (group, end) in &self.groups {
            if slot < *end {
                let tenant = TenantId::new(format!("{group}-{:06}", slot - start));
                return Some((group.clone(), tenant));
            }
            start = *end;
        }
        None
    }
}

// ============================================================================
// SECTION: Simulation
// ============================================================================

/// Simulation parameters.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SimulationOptions {
    /// Worker threads.
    pub(crate) workers: usize,
    /// Total requests to dispatch.
    pub(crate) requests: u64,
}

/// Summary printed after a simulation.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SimulationSummary {
    /// Data model name.
    pub(crate) model: String,
    /// Scenario name.
    pub(crate) scenario: String,
    /// Worker threads used.
    pub(crate) workers: usize,
    /// Requests dispatched.
    pub(crate) requests: u64,
    /// Requests that completed.
    pub(crate) executed: u64,
    /// Requests that failed.
    pub(crate) failed: u64,
    /// Distinct tenants targeted.
    pub(crate) tenants: u64,
    /// Setup routine executions.
    pub(crate) setup_executions: u64,
    /// Steady-state executions per operation kind.
    pub(crate) executions_by_kind: BTreeMap<OperationKind, u64>,
    /// First failure observed, if any.
    pub(crate) first_error: Option<String>,
    /// Init gate filter snapshot at the end of the run.
    pub(crate) filter: FilterStats,
}

/// Errors that prevent a simulation from starting.
#[derive(Debug, Error)]
pub(crate) enum SimulationError {
    /// Dispatcher construction failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// The scenario declares no steady-state operations.
    #[error("scenario {0} has no operations to dispatch")]
    NoOperations(String),
    /// The scenario declares no tenants.
    #[error("scenario {0} declares no tenants")]
    NoTenants(String),
    /// Worker count is zero.
    #[error("at least one worker is required")]
    NoWorkers,
}

/// Runs `options.requests` requests through a dry-run dispatcher.
///
/// # Errors
///
/// Returns [`SimulationError`] when the dispatcher cannot be built or the
/// scenario has nothing to dispatch. Per-request failures are counted in the
/// summary instead.
pub(crate) fn run_simulation(
    model: &DataModel,
    scenario_name: &str,
    options: SimulationOptions,
    audit: Arc<dyn InitAuditSink>,
) -> Result<SimulationSummary, SimulationError> {
    if options.workers == 0 {
        return Err(SimulationError::NoWorkers);
    }
    let factory = DryRunFactory::new();
    let dispatcher = OperationDispatcher::new(&factory, model, scenario_name, audit)?;
    if dispatcher.operations().is_empty() {
        return Err(SimulationError::NoOperations(scenario_name.to_string()));
    }
    let plan = TenantPlan::from_scenario(dispatcher.scenario());
    if plan.total() == 0 {
        return Err(SimulationError::NoTenants(scenario_name.to_string()));
    }

    let next = AtomicU64::new(0);
    let executed = AtomicU64::new(0);
    let failed = AtomicU64::new(0);
    let first_error: Mutex<Option<String>> = Mutex::new(None);
    thread::scope(|scope| {
        for _ in 0 .. options.workers {
            scope.spawn(|| {
                loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    if index >= options.requests {
                        break;
                    }
                    match dispatch_one(&dispatcher, &plan, index) {
                        Ok(_) => {
                            executed.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(err) => {
                            failed.fetch_add(1, Ordering::Relaxed);
                            if let Ok(mut slot) = first_error.lock() {
                                slot.get_or_insert_with(|| err.to_string());
                            }
                        }
                    }
                }
            });
        }
    });

    let counters = factory.counters();
    let executions_by_kind = dispatcher
        .registered_kinds()
        .into_iter()
        .filter(|kind| *kind != OperationKind::PreRun)
        .map(|kind| (kind, counters.executions(kind)))
        .collect();
    Ok(SimulationSummary {
        model: model.name.clone(),
        scenario: scenario_name.to_string(),
        workers: options.workers,
        requests: options.requests,
        executed: executed.into_inner(),
        failed: failed.into_inner(),
        tenants: plan.total().min(options.requests),
        setup_executions: counters.executions(OperationKind::PreRun),
        executions_by_kind,
        first_error: first_error.into_inner().unwrap_or_default(),
        filter: dispatcher.filter_stats(),
    })
}

/// Dispatches request `index` of the simulation.
fn dispatch_one(
    dispatcher: &OperationDispatcher,
    plan: &TenantPlan,
    index: u64,
) -> Result<OperationResult, DispatchError> {
    let operations = dispatcher.operations();
    let (group, tenant) = plan
        .tenant_at(index)
        .ok_or_else(|| DispatchError::Construction("tenant plan is empty".to_string()))?;
    let len = u64::try_from(operations.len()).unwrap_or(u64::MAX).max(1);
    let operation = usize::try_from(index % len)
        .ok()
        .and_then(|slot| operations.get(slot))
        .cloned()
        .ok_or_else(|| DispatchError::Construction("catalog is empty".to_string()))?;
    let request = dispatcher.request(group, tenant, operation);
    dispatcher.dispatch(&request)
}
