// crates/tenant-dispatch-core/src/core/scenario.rs
// ============================================================================
// Module: Tenant Dispatch Workload Model
// Description: Data models, scenarios, operation definitions, and load profiles.
// Purpose: Define the static workload configuration the dispatcher is built from.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! A [`DataModel`] groups the [`Scenario`] definitions of one workload. Each
//! scenario names the table its tenants operate on, the setup statements every
//! tenant needs before its first operation, the steady-state operation groups,
//! and the load profile that sizes the tenant population.
//!
//! These types are pure data. Loading and validation live in the config crate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::OperationId;
use crate::core::identifiers::TableName;
use crate::core::identifiers::TenantGroupId;

// ============================================================================
// SECTION: Data Model
// ============================================================================

/// Named collection of scenarios sharing one data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataModel {
    /// Model name.
    pub name: String,
    /// Scenarios declared by the model.
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl DataModel {
    /// Returns the scenario with the given name.
    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.name == name)
    }
}

/// Scenario definition for one workload run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Table (view) the scenario's tenants operate on.
    pub table_name: TableName,
    /// Load profile describing tenant population and operation mix.
    #[serde(default)]
    pub load_profile: LoadProfile,
    /// Setup statements run once per tenant before its first operation.
    #[serde(default)]
    pub pre_scenario_ddls: Vec<Ddl>,
    /// Upsert operation definitions.
    #[serde(default)]
    pub upserts: Vec<Upsert>,
    /// Query sets holding query operation definitions.
    #[serde(default)]
    pub query_sets: Vec<QuerySet>,
    /// Idle-time operation definitions.
    #[serde(default)]
    pub idle_times: Vec<IdleTime>,
    /// User-defined operation definitions.
    #[serde(default)]
    pub udfs: Vec<UserDefined>,
}

impl Scenario {
    /// Returns every query across all query sets, in declaration order.
    pub fn queries(&self) -> impl Iterator<Item = &Query> {
        self.query_sets.iter().flat_map(|set| set.queries.iter())
    }

    /// Returns the total tenant count across every tenant group.
    #[must_use]
    pub fn total_tenants(&self) -> u64 {
        self.load_profile.total_tenants()
    }
}

// ============================================================================
// SECTION: Operation Definitions
// ============================================================================

/// Setup statement executed during tenant initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ddl {
    /// Statement text, possibly templated by the data layer.
    pub statement: String,
    /// Optional table the statement targets when it differs from the scenario table.
    #[serde(default)]
    pub table_name: Option<TableName>,
}

/// Upsert operation definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Upsert {
    /// Operation identifier.
    pub id: OperationId,
    /// Upsert statement text.
    pub statement: String,
    /// Run on a global (non-tenant) connection.
    #[serde(default)]
    pub use_global_connection: bool,
}

/// Group of related query definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuerySet {
    /// Optional query set label.
    #[serde(default)]
    pub id: Option<String>,
    /// Queries in declaration order.
    #[serde(default)]
    pub queries: Vec<Query>,
}

/// Query operation definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Query {
    /// Operation identifier.
    pub id: OperationId,
    /// Query statement text.
    pub statement: String,
    /// Expected row count, when the data layer should verify results.
    #[serde(default)]
    pub expected_row_count: Option<u64>,
}

/// Idle-time operation definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdleTime {
    /// Operation identifier.
    pub id: OperationId,
    /// Idle duration in milliseconds.
    pub idle_time_ms: u64,
}

/// User-defined operation definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserDefined {
    /// Operation identifier.
    pub id: OperationId,
    /// Name of the user function the data layer resolves.
    pub class_name: String,
    /// Arguments passed to the user function.
    #[serde(default)]
    pub args: Vec<String>,
}

// ============================================================================
// SECTION: Load Profile
// ============================================================================

/// Load profile for a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadProfile {
    /// Rows per upsert batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Total operations the load engine should generate.
    #[serde(default)]
    pub num_operations: u64,
    /// Tenant groups making up the tenant population.
    #[serde(default)]
    pub tenant_distribution: Vec<TenantGroup>,
    /// Weighted operation mix.
    #[serde(default)]
    pub op_distribution: Vec<OperationGroup>,
}

impl Default for LoadProfile {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            num_operations: 0,
            tenant_distribution: Vec::new(),
            op_distribution: Vec::new(),
        }
    }
}

impl LoadProfile {
    /// Returns the total tenant count across every tenant group.
    #[must_use]
    pub fn total_tenants(&self) -> u64 {
        self.tenant_distribution
            .iter()
            .fold(0_u64, |total, group| total.saturating_add(u64::from(group.num_tenants)))
    }
}

/// Default upsert batch size.
const fn default_batch_size() -> u32 {
    1
}

/// Tenant group within a load profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantGroup {
    /// Tenant group identifier.
    pub id: TenantGroupId,
    /// Relative share of generated load.
    #[serde(default)]
    pub weight: u32,
    /// Number of tenants in the group.
    pub num_tenants: u32,
}

/// Weighted entry of the operation mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationGroup {
    /// Operation identifier the weight applies to.
    pub id: OperationId,
    /// Relative share of generated load.
    pub weight: u32,
}
