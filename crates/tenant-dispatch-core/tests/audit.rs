// crates/tenant-dispatch-core/tests/audit.rs
// ============================================================================
// Module: Tenant Init Audit Tests
// Description: Tests for JSON-line audit sinks.
// ============================================================================
//! ## Overview
//! Validates that the file sink appends one parseable JSON line per setup
//! attempt with stable labels.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;

use serde_json::Value;
use tenant_dispatch_core::ExecutionError;
use tenant_dispatch_core::FileInitAuditSink;
use tenant_dispatch_core::OperationDispatcher;
use tenant_dispatch_core::TenantGroupId;
use tenant_dispatch_core::TenantId;

use crate::common::SCENARIO;
use crate::common::ScriptedUnit;
use crate::common::SplitFactory;
use crate::common::TABLE;
use crate::common::sample_model;
use crate::common::sample_scenario;

#[test]
fn file_sink_appends_one_json_line_per_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tenant-init.jsonl");
    let sink = Arc::new(FileInitAuditSink::new(&path).unwrap());
    let factory = SplitFactory::new(ScriptedUnit::scripted(vec![
        Some(ExecutionError::failed("boom")),
        Some(ExecutionError::concurrent_mutation("exists")),
    ]));
    let model = sample_model(sample_scenario(2));
    let dispatcher = OperationDispatcher::new(&factory, &model, SCENARIO, sink).unwrap();
    let operation = dispatcher.operations()[0].clone();

    for tenant in ["t1", "t1", "t1", "t2"] {
        let request =
            dispatcher.request(TenantGroupId::new("tg1"), TenantId::new(tenant), operation.clone());
        let _ = dispatcher.initialize_tenant(&request);
    }

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 3);
    let outcomes: Vec<&str> = lines.iter().map(|line| line["outcome"].as_str().unwrap()).collect();
    assert_eq!(outcomes, vec!["failed", "benign_race", "initialized"]);
    assert_eq!(lines[0]["event"], "tenant_init");
    assert_eq!(lines[0]["tenant_id"], "t1");
    assert_eq!(lines[0]["view_name"], TABLE);
    assert_eq!(lines[0]["error"], "boom");
    assert!(lines[0]["result"].is_null());
    assert_eq!(lines[2]["tenant_id"], "t2");
    assert_eq!(lines[2]["result"]["kind"], "PRE_RUN");
}

#[test]
fn file_sink_appends_to_existing_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tenant-init.jsonl");
    std::fs::write(&path, "{\"event\":\"earlier\"}\n").unwrap();
    let sink = Arc::new(FileInitAuditSink::new(&path).unwrap());
    let factory = SplitFactory::new(ScriptedUnit::new());
    let model = sample_model(sample_scenario(1));
    let dispatcher = OperationDispatcher::new(&factory, &model, SCENARIO, sink).unwrap();
    let request = dispatcher.request(
        TenantGroupId::new("tg1"),
        TenantId::new("t1"),
        dispatcher.operations()[0].clone(),
    );

    dispatcher.initialize_tenant(&request).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.starts_with("{\"event\":\"earlier\"}"));
}
