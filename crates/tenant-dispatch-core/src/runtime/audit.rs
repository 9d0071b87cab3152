// crates/tenant-dispatch-core/src/runtime/audit.rs
// ============================================================================
// Module: Tenant Init Audit Logging
// Description: Structured audit events for tenant initialization attempts.
// Purpose: Emit JSON-line records of every first-use setup outcome.
// Dependencies: crate::core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every setup attempt made by the tenant init gate is recorded as a
//! [`TenantInitAuditEvent`] before the gate commits its decision, so first-use
//! behavior can be audited after a run. Sinks are pluggable; the stock sinks
//! write JSON lines to stderr or to an append-only file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::OperationRequest;
use crate::core::OperationResult;
use crate::core::TableName;
use crate::core::TenantGroupId;
use crate::core::TenantId;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of a tenant setup attempt.
///
/// # Invariants
/// - Variants are stable for audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitOutcome {
    /// Setup completed.
    Initialized,
    /// Setup lost a creation race to a concurrent actor; treated as initialized.
    BenignRace,
    /// Setup failed; the tenant stays uninitialized.
    Failed,
}

/// Tenant initialization audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct TenantInitAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Data model name.
    pub model: String,
    /// Scenario name.
    pub scenario: String,
    /// Tenant group identifier.
    pub tenant_group_id: TenantGroupId,
    /// Tenant identifier.
    pub tenant_id: TenantId,
    /// View whose setup was attempted.
    pub view_name: TableName,
    /// Attempt outcome.
    pub outcome: InitOutcome,
    /// Executor error message, when setup did not complete cleanly.
    pub error: Option<String>,
    /// Setup result record, when setup completed.
    pub result: Option<OperationResult>,
}

impl TenantInitAuditEvent {
    /// Creates a new audit event for a setup request with a consistent timestamp.
    #[must_use]
    pub fn new(
        request: &OperationRequest,
        view_name: &TableName,
        outcome: InitOutcome,
        error: Option<String>,
        result: Option<OperationResult>,
    ) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "tenant_init",
            timestamp_ms,
            model: request.model_name.clone(),
            scenario: request.scenario_name.clone(),
            tenant_group_id: request.tenant_group_id.clone(),
            tenant_id: request.tenant_id.clone(),
            view_name: view_name.clone(),
            outcome,
            error,
            result,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for tenant initialization events.
pub trait InitAuditSink: Send + Sync {
    /// Record an initialization event.
    fn record(&self, event: &TenantInitAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrInitAuditSink;

impl InitAuditSink for StderrInitAuditSink {
    fn record(&self, event: &TenantInitAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileInitAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileInitAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl InitAuditSink for FileInitAuditSink {
    fn record(&self, event: &TenantInitAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopInitAuditSink;

impl InitAuditSink for NoopInitAuditSink {
    fn record(&self, _event: &TenantInitAuditEvent) {}
}
