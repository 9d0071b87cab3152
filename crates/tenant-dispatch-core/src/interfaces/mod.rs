// crates/tenant-dispatch-core/src/interfaces/mod.rs
// ============================================================================
// Module: Tenant Dispatch Interfaces
// Description: Executor contracts consumed by the dispatcher.
// Purpose: Define how operation requests reach the data layer.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The dispatcher never talks to a database itself. It hands requests to
//! [`ExecutableUnit`] implementations built by a caller-supplied
//! [`UnitFactory`], one unit per configured operation kind.
//!
//! Executors classify their own failures with [`ExecutionErrorKind`]. The
//! tenant init gate reads that tag to decide whether a setup failure was a
//! benign race with another creator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::core::DataModel;
use crate::core::OperationKind;
use crate::core::OperationRequest;
use crate::core::OperationResult;
use crate::core::Scenario;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Data layer error code reported when a concurrent actor mutated the same table.
pub const CONCURRENT_TABLE_MUTATION_CODE: i32 = 301;

// ============================================================================
// SECTION: Execution Errors
// ============================================================================

/// Classification of an executor failure.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionErrorKind {
    /// The target object already exists because a concurrent actor created it.
    ConcurrentMutation,
    /// Any other failure.
    Failed,
}

impl ExecutionErrorKind {
    /// Returns a stable label for the classification.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConcurrentMutation => "concurrent_mutation",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ExecutionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by an executable unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("execution error ({kind}): {message}")]
pub struct ExecutionError {
    /// Failure classification.
    pub kind: ExecutionErrorKind,
    /// Human-readable failure detail.
    pub message: String,
}

impl ExecutionError {
    /// Creates an error reporting a concurrent mutation of the target object.
    #[must_use]
    pub fn concurrent_mutation(message: impl Into<String>) -> Self {
        Self {
            kind: ExecutionErrorKind::ConcurrentMutation,
            message: message.into(),
        }
    }

    /// Creates an error reporting an unclassified failure.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            kind: ExecutionErrorKind::Failed,
            message: message.into(),
        }
    }

    /// Classifies a data layer error code.
    #[must_use]
    pub fn from_error_code(code: i32, message: impl Into<String>) -> Self {
        if code == CONCURRENT_TABLE_MUTATION_CODE {
            Self::concurrent_mutation(message)
        } else {
            Self::failed(message)
        }
    }

    /// Returns true when the failure is a recoverable concurrent-creation race.
    #[must_use]
    pub fn is_benign_race(&self) -> bool {
        self.kind == ExecutionErrorKind::ConcurrentMutation
    }
}

// ============================================================================
// SECTION: Executable Units
// ============================================================================

/// Executes any request of one operation kind.
pub trait ExecutableUnit: Send + Sync {
    /// Executes the request and returns its result record.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] when the data layer rejects the request.
    fn execute(&self, request: &OperationRequest) -> Result<OperationResult, ExecutionError>;
}

/// Builds the executable unit for each configured operation kind.
pub trait UnitFactory {
    /// Creates the unit serving `kind` for the given model and scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] when the unit cannot be constructed.
    fn create(
        &self,
        kind: OperationKind,
        model: &DataModel,
        scenario: &Scenario,
    ) -> Result<Arc<dyn ExecutableUnit>, ExecutionError>;
}
