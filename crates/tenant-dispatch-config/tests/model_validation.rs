//! Model and audit validation tests for tenant-dispatch-config.
// crates/tenant-dispatch-config/tests/model_validation.rs
// =============================================================================
// Module: Model Validation Tests
// Description: Validate model, scenario, and audit sink constraints.
// Purpose: Ensure inconsistent workload definitions fail closed.
// =============================================================================

use tenant_dispatch_config::ConfigError;
use tenant_dispatch_config::WorkloadConfig;

type TestResult = Result<(), String>;

/// Builds a config with one model holding the given scenario body.
fn config_with_scenario(scenario: &str) -> String {
    format!(
        r#"
[audit]
sink = "none"

[[models]]
name = "mt_model"

[[models.scenarios]]
name = "mt_scenario"
{scenario}
"#
    )
}

fn assert_invalid(result: Result<WorkloadConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(ConfigError::Invalid(message)) => {
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Err(other) => Err(format!("expected invalid config, got {other}")),
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn rejects_config_without_models() -> TestResult {
    assert_invalid(WorkloadConfig::from_toml("[audit]\nsink = \"none\"\n"), "at least one model")
}

#[test]
fn rejects_duplicate_model_names() -> TestResult {
    let content = "[[models]]\nname = \"m\"\n\n[[models]]\nname = \"m\"\n";
    assert_invalid(WorkloadConfig::from_toml(content), "duplicate model name: m")
}

#[test]
fn rejects_duplicate_scenario_names() -> TestResult {
    let content = r#"
[[models]]
name = "m"

[[models.scenarios]]
name = "s"
table_name = "T"

[[models.scenarios]]
name = "s"
table_name = "T"
"#;
    assert_invalid(WorkloadConfig::from_toml(content), "duplicate scenario name: s")
}

#[test]
fn rejects_empty_table_name() -> TestResult {
    let content = config_with_scenario("table_name = \"  \"");
    assert_invalid(WorkloadConfig::from_toml(&content), "table_name must be non-empty")
}

#[test]
fn rejects_duplicate_operation_ids_across_kinds() -> TestResult {
    let content = config_with_scenario(
        r#"table_name = "T"

[[models.scenarios.upserts]]
id = "op1"
statement = "UPSERT INTO T VALUES (?)"

[[models.scenarios.idle_times]]
id = "op1"
idle_time_ms = 10
"#,
    );
    assert_invalid(WorkloadConfig::from_toml(&content), "duplicate operation id: op1")
}

#[test]
fn rejects_empty_setup_statement() -> TestResult {
    let content = config_with_scenario(
        r#"table_name = "T"

[[models.scenarios.pre_scenario_ddls]]
statement = ""
"#,
    );
    assert_invalid(WorkloadConfig::from_toml(&content), "setup statements must be non-empty")
}

#[test]
fn rejects_tenant_group_without_tenants() -> TestResult {
    let content = config_with_scenario(
        r#"table_name = "T"

[[models.scenarios.load_profile.tenant_distribution]]
id = "tg1"
num_tenants = 0
"#,
    );
    assert_invalid(WorkloadConfig::from_toml(&content), "tenant group tg1")
}

#[test]
fn rejects_tenant_population_over_limit() -> TestResult {
    let content = config_with_scenario(
        r#"table_name = "T"

[[models.scenarios.load_profile.tenant_distribution]]
id = "tg1"
num_tenants = 60000000

[[models.scenarios.load_profile.tenant_distribution]]
id = "tg2"
num_tenants = 60000000
"#,
    );
    assert_invalid(WorkloadConfig::from_toml(&content), "total tenants 120000000 exceeds")
}

#[test]
fn rejects_idle_time_over_one_hour() -> TestResult {
    let content = config_with_scenario(
        r#"table_name = "T"

[[models.scenarios.idle_times]]
id = "nap"
idle_time_ms = 3600001
"#,
    );
    assert_invalid(WorkloadConfig::from_toml(&content), "idle time nap exceeds")
}

#[test]
fn rejects_file_sink_without_path() -> TestResult {
    let content = "[audit]\nsink = \"file\"\n\n[[models]]\nname = \"m\"\n";
    assert_invalid(WorkloadConfig::from_toml(content), "audit.path is required")
}

#[test]
fn file_sink_writes_to_configured_path() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("audit.jsonl");
    let content = format!(
        "[audit]\nsink = \"file\"\npath = \"{}\"\n\n[[models]]\nname = \"m\"\n",
        path.display()
    );
    let config = WorkloadConfig::from_toml(&content).map_err(|err| err.to_string())?;
    config.audit.build_sink().map_err(|err| err.to_string())?;
    if !path.exists() {
        return Err("audit log was not created".to_string());
    }
    Ok(())
}
