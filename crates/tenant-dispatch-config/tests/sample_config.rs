//! Sample workload config tests for tenant-dispatch-config.
// crates/tenant-dispatch-config/tests/sample_config.rs
// =============================================================================
// Module: Sample Config Tests
// Description: Validate the checked-in sample workload configuration.
// Purpose: Keep the demo config loadable as the model evolves.
// =============================================================================

use std::path::Path;

use tenant_dispatch_config::AuditSinkKind;
use tenant_dispatch_config::WorkloadConfig;

type TestResult = Result<(), String>;

#[test]
fn sample_config_loads_and_validates() -> TestResult {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/tenant-dispatch.toml");
    let config = WorkloadConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.audit.sink != AuditSinkKind::Stderr {
        return Err("sample config should log to stderr".to_string());
    }
    let scenario = config.scenario("pherf_mt", "tenant_views").map_err(|err| err.to_string())?;
    if scenario.total_tenants() != 50 {
        return Err(format!("unexpected tenant count {}", scenario.total_tenants()));
    }
    if scenario.pre_scenario_ddls.len() != 2 || scenario.queries().count() != 2 {
        return Err("sample scenario lost entries".to_string());
    }
    Ok(())
}
