// crates/tenant-dispatch-config/src/config.rs
// ============================================================================
// Module: Tenant Dispatch Configuration
// Description: Configuration loading and validation for workload runs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: tenant-dispatch-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! A config declares one or more data models, each holding the scenarios a
//! dispatcher can be built for, plus the audit sink used for tenant
//! initialization events. Missing or invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use tenant_dispatch_core::DataModel;
use tenant_dispatch_core::FileInitAuditSink;
use tenant_dispatch_core::InitAuditSink;
use tenant_dispatch_core::NoopInitAuditSink;
use tenant_dispatch_core::Scenario;
use tenant_dispatch_core::StderrInitAuditSink;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "tenant-dispatch.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "TENANT_DISPATCH_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum tenants a single scenario may declare.
pub(crate) const MAX_SCENARIO_TENANTS: u64 = 100_000_000;
/// Maximum idle time in milliseconds.
pub(crate) const MAX_IDLE_TIME_MS: u64 = 60 * 60 * 1000;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Workload configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkloadConfig {
    /// Tenant initialization audit configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Data models available to workload runs.
    #[serde(default)]
    pub models: Vec<DataModel>,
}

impl WorkloadConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.audit.validate()?;
        if self.models.is_empty() {
            return Err(ConfigError::Invalid("at least one model is required".to_string()));
        }
        let mut names = BTreeSet::new();
        for model in &self.models {
            if model.name.trim().is_empty() {
                return Err(ConfigError::Invalid("model name must be non-empty".to_string()));
            }
            if !names.insert(model.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate model name: {}", model.name)));
            }
            validate_model(model)?;
        }
        Ok(())
    }

    /// Returns the named data model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when no model has that name.
    pub fn model(&self, name: &str) -> Result<&DataModel, ConfigError> {
        self.models
            .iter()
            .find(|model| model.name == name)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown model: {name}")))
    }

    /// Returns the named scenario of the named model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the model or scenario is unknown.
    pub fn scenario(&self, model: &str, name: &str) -> Result<&Scenario, ConfigError> {
        self.model(model)?
            .scenario(name)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown scenario {name} in model {model}")))
    }

    /// Returns the number of scenarios across every model.
    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.models.iter().map(|model| model.scenarios.len()).sum()
    }
}

// ============================================================================
// SECTION: Audit Config
// ============================================================================

/// Destination for tenant initialization audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
    /// Audit events are discarded.
    #[serde(rename = "none")]
    Noop,
}

/// Tenant initialization audit configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink receiving audit events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path (JSON lines), required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        if self.sink == AuditSinkKind::File && self.path.is_none() {
            return Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()));
        }
        Ok(())
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the audit log cannot be opened.
    pub fn build_sink(&self) -> Result<Arc<dyn InitAuditSink>, ConfigError> {
        match self.sink {
            AuditSinkKind::Stderr => Ok(Arc::new(StderrInitAuditSink)),
            AuditSinkKind::Noop => Ok(Arc::new(NoopInitAuditSink)),
            AuditSinkKind::File => {
                let path = self.path.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("audit.path is required for the file sink".to_string())
                })?;
                let sink = FileInitAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
        }
    }
}

// ============================================================================
// SECTION: Model Validation
// ============================================================================

/// Validates every scenario of a model.
fn validate_model(model: &DataModel) -> Result<(), ConfigError> {
    let mut names = BTreeSet::new();
    for scenario in &model.scenarios {
        if scenario.name.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "model {}: scenario name must be non-empty",
                model.name
            )));
        }
        if !names.insert(scenario.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "model {}: duplicate scenario name: {}",
                model.name, scenario.name
            )));
        }
        validate_scenario(scenario)
            .map_err(|message| ConfigError::Invalid(format!("scenario {}: {message}", scenario.name)))?;
    }
    Ok(())
}

/// Validates a scenario definition, returning a message on failure.
fn validate_scenario(scenario: &Scenario) -> Result<(), String> {
    if scenario.table_name.as_str().trim().is_empty() {
        return Err("table_name must be non-empty".to_string());
    }
    if scenario.pre_scenario_ddls.iter().any(|ddl| ddl.statement.trim().is_empty()) {
        return Err("setup statements must be non-empty".to_string());
    }

    let mut ids = BTreeSet::new();
    let configured = scenario
        .upserts
        .iter()
        .map(|upsert| &upsert.id)
        .chain(scenario.queries().map(|query| &query.id))
        .chain(scenario.idle_times.iter().map(|idle| &idle.id))
        .chain(scenario.udfs.iter().map(|udf| &udf.id));
    for id in configured {
        if id.as_str().trim().is_empty() {
            return Err("operation id must be non-empty".to_string());
        }
        if !ids.insert(id.as_str()) {
            return Err(format!("duplicate operation id: {id}"));
        }
    }

    if let Some(idle) = scenario.idle_times.iter().find(|idle| idle.idle_time_ms > MAX_IDLE_TIME_MS) {
        return Err(format!("idle time {} exceeds {MAX_IDLE_TIME_MS} ms", idle.id));
    }
    if let Some(udf) = scenario.udfs.iter().find(|udf| udf.class_name.trim().is_empty()) {
        return Err(format!("user-defined operation {} requires class_name", udf.id));
    }

    let mut groups = BTreeSet::new();
    for group in &scenario.load_profile.tenant_distribution {
        if group.num_tenants == 0 {
            return Err(format!("tenant group {} must declare at least one tenant", group.id));
        }
        if !groups.insert(group.id.as_str()) {
            return Err(format!("duplicate tenant group id: {}", group.id));
        }
    }
    let total = scenario.total_tenants();
    if total > MAX_SCENARIO_TENANTS {
        return Err(format!("total tenants {total} exceeds {MAX_SCENARIO_TENANTS}"));
    }
    if scenario.load_profile.batch_size == 0 {
        return Err("load_profile.batch_size must be at least 1".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn resolve_path_prefers_argument() {
        let resolved = resolve_path(Some(Path::new("custom.toml")));
        assert!(matches!(resolved, Ok(path) if path == Path::new("custom.toml")));
    }

    #[test]
    fn validate_path_string_rejects_blank() {
        let result = validate_path_string("audit.path", "   ");
        assert!(result.unwrap_err().to_string().contains("audit.path must be non-empty"));
    }

    #[test]
    fn validate_path_string_accepts_nested_path() {
        assert!(validate_path_string("audit.path", "logs/tenant-init.jsonl").is_ok());
    }
}
