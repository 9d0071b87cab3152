// crates/tenant-dispatch-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared scenarios, scripted units, and recording sinks.
// Purpose: Provide reusable, deterministic dispatcher test infrastructure.
// Dependencies: tenant-dispatch-core
// ============================================================================

//! ## Overview
//! Fixtures build a small scenario, a factory handing out scripted executable
//! units, and an audit sink that keeps every event for assertions.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unwrap_in_result,
    clippy::panic,
    reason = "Test fixtures favor direct unwraps for setup clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use tenant_dispatch_core::DataModel;
use tenant_dispatch_core::Ddl;
use tenant_dispatch_core::ExecutableUnit;
use tenant_dispatch_core::ExecutionError;
use tenant_dispatch_core::IdleTime;
use tenant_dispatch_core::InitAuditSink;
use tenant_dispatch_core::LoadProfile;
use tenant_dispatch_core::OperationGroup;
use tenant_dispatch_core::OperationId;
use tenant_dispatch_core::OperationKind;
use tenant_dispatch_core::OperationRequest;
use tenant_dispatch_core::OperationResult;
use tenant_dispatch_core::Query;
use tenant_dispatch_core::QuerySet;
use tenant_dispatch_core::Scenario;
use tenant_dispatch_core::TableName;
use tenant_dispatch_core::TenantGroup;
use tenant_dispatch_core::TenantGroupId;
use tenant_dispatch_core::TenantInitAuditEvent;
use tenant_dispatch_core::UnitFactory;
use tenant_dispatch_core::Upsert;

// ============================================================================
// SECTION: Scenario Fixtures
// ============================================================================

/// Model name used by every fixture.
pub const MODEL: &str = "mt_model";
/// Scenario name used by every fixture.
pub const SCENARIO: &str = "mt_scenario";
/// Table name used by every fixture.
pub const TABLE: &str = "PHERF.TENANT_VIEW";

/// Scenario with setup, upserts, two query sets, and one idle time.
pub fn sample_scenario(num_tenants: u32) -> Scenario {
    Scenario {
        name: SCENARIO.to_string(),
        table_name: TableName::new(TABLE),
        load_profile: LoadProfile {
            batch_size: 1,
            num_operations: 100,
            tenant_distribution: vec![TenantGroup {
                id: TenantGroupId::new("tg1"),
                weight: 100,
                num_tenants,
            }],
            op_distribution: vec![OperationGroup {
                id: OperationId::new("upsert1"),
                weight: 100,
            }],
        },
        pre_scenario_ddls: vec![
            Ddl {
                statement: "CREATE VIEW IF NOT EXISTS PHERF.TENANT_VIEW AS SELECT * FROM PHERF.BASE"
                    .to_string(),
                table_name: None,
            },
            Ddl {
                statement: "CREATE INDEX IF NOT EXISTS IDX ON PHERF.TENANT_VIEW (COL1)".to_string(),
                table_name: None,
            },
        ],
        upserts: vec![
            Upsert {
                id: OperationId::new("upsert1"),
                statement: "UPSERT INTO PHERF.TENANT_VIEW VALUES (?, ?)".to_string(),
                use_global_connection: false,
            },
            Upsert {
                id: OperationId::new("upsert2"),
                statement: "UPSERT INTO PHERF.TENANT_VIEW VALUES (?)".to_string(),
                use_global_connection: true,
            },
        ],
        query_sets: vec![
            QuerySet {
                id: Some("qs1".to_string()),
                queries: vec![Query {
                    id: OperationId::new("q1"),
                    statement: "SELECT COUNT(*) FROM PHERF.TENANT_VIEW".to_string(),
                    expected_row_count: Some(1),
                }],
            },
            QuerySet {
                id: None,
                queries: vec![Query {
                    id: OperationId::new("q2"),
                    statement: "SELECT * FROM PHERF.TENANT_VIEW LIMIT 10".to_string(),
                    expected_row_count: None,
                }],
            },
        ],
        idle_times: vec![IdleTime {
            id: OperationId::new("idle1"),
            idle_time_ms: 5,
        }],
        udfs: Vec::new(),
    }
}

/// Wraps a scenario in the fixture model.
pub fn sample_model(scenario: Scenario) -> DataModel {
    DataModel {
        name: MODEL.to_string(),
        scenarios: vec![scenario],
    }
}

// ============================================================================
// SECTION: Scripted Unit
// ============================================================================

/// Executable unit that counts calls and replays scripted failures.
#[derive(Default)]
pub struct ScriptedUnit {
    /// Outcomes for successive calls; empty means success.
    script: Mutex<VecDeque<Option<ExecutionError>>>,
    /// Calls per tenant.
    calls: Mutex<BTreeMap<String, usize>>,
    /// Ordered start/end markers.
    events: Mutex<Vec<String>>,
    /// Calls currently running.
    active: AtomicUsize,
    /// Highest observed concurrent calls.
    max_active: AtomicUsize,
    /// Delay applied inside each call.
    delay: Duration,
}

impl ScriptedUnit {
    /// Unit that always succeeds immediately.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Unit that sleeps inside every call.
    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Self::default()
        })
    }

    /// Unit replaying `script` on successive calls, then succeeding.
    pub fn scripted(script: Vec<Option<ExecutionError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            ..Self::default()
        })
    }

    /// Total calls across all tenants.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Calls made for one tenant.
    pub fn calls_for(&self, tenant: &str) -> usize {
        self.calls.lock().unwrap().get(tenant).copied().unwrap_or(0)
    }

    /// Ordered start/end markers.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Highest observed concurrent calls.
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

impl ExecutableUnit for ScriptedUnit {
    fn execute(&self, request: &OperationRequest) -> Result<OperationResult, ExecutionError> {
        let tenant = request.tenant_id.as_str().to_string();
        let running = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(running, Ordering::SeqCst);
        self.events.lock().unwrap().push(format!("start:{tenant}"));
        *self.calls.lock().unwrap().entry(tenant.clone()).or_insert(0) += 1;
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        let scripted = self.script.lock().unwrap().pop_front().flatten();
        self.events.lock().unwrap().push(format!("end:{tenant}"));
        self.active.fetch_sub(1, Ordering::SeqCst);
        match scripted {
            Some(err) => Err(err),
            None => Ok(result_for(request)),
        }
    }
}

/// Builds a result record echoing the request.
pub fn result_for(request: &OperationRequest) -> OperationResult {
    OperationResult {
        operation_id: request.operation.id.clone(),
        kind: request.kind(),
        tenant_id: request.tenant_id.clone(),
        status: 0,
        row_count: 1,
        started_at_ms: 0,
        duration_nanos: 0,
        handler_id: "test-handler".to_string(),
    }
}

// ============================================================================
// SECTION: Factories
// ============================================================================

/// Factory handing out one unit for setup and one shared unit for everything else.
pub struct SplitFactory {
    /// Unit returned for `PRE_RUN`.
    pub setup: Arc<ScriptedUnit>,
    /// Unit returned for every other kind.
    pub steady: Arc<ScriptedUnit>,
    /// Kinds the factory was asked for, in call order.
    pub created: Mutex<Vec<OperationKind>>,
}

impl SplitFactory {
    /// Creates a factory around the given setup unit.
    pub fn new(setup: Arc<ScriptedUnit>) -> Self {
        Self {
            setup,
            steady: ScriptedUnit::new(),
            created: Mutex::new(Vec::new()),
        }
    }

    /// Kinds the factory was asked for.
    pub fn created(&self) -> Vec<OperationKind> {
        self.created.lock().unwrap().clone()
    }
}

impl UnitFactory for SplitFactory {
    fn create(
        &self,
        kind: OperationKind,
        _model: &DataModel,
        _scenario: &Scenario,
    ) -> Result<Arc<dyn ExecutableUnit>, ExecutionError> {
        self.created.lock().unwrap().push(kind);
        let unit: Arc<dyn ExecutableUnit> = if kind == OperationKind::PreRun {
            self.setup.clone()
        } else {
            self.steady.clone()
        };
        Ok(unit)
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink keeping every event in memory.
#[derive(Default)]
pub struct RecordingAudit {
    /// Recorded events.
    events: Mutex<Vec<TenantInitAuditEvent>>,
}

impl RecordingAudit {
    /// Creates an empty sink.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Recorded events.
    pub fn events(&self) -> Vec<TenantInitAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl InitAuditSink for RecordingAudit {
    fn record(&self, event: &TenantInitAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
