// crates/tenant-dispatch-core/src/core/operation.rs
// ============================================================================
// Module: Tenant Dispatch Operations
// Description: Operation kinds and tagged operation entities.
// Purpose: Represent configured operations as immutable tagged values.
// Dependencies: crate::core::{identifiers, scenario}, serde
// ============================================================================

//! ## Overview
//! An [`Operation`] pairs an identifier with an [`OperationPayload`]. The
//! payload variant determines the [`OperationKind`], so the kind reported by
//! an operation can never disagree with the definition it carries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::OperationId;
use crate::core::scenario::Ddl;
use crate::core::scenario::IdleTime;
use crate::core::scenario::Query;
use crate::core::scenario::Upsert;
use crate::core::scenario::UserDefined;

// ============================================================================
// SECTION: Operation Kind
// ============================================================================

/// Category of work an operation performs.
///
/// # Invariants
/// - Variants and labels are stable; `index` is dense in `0 .. COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    /// One-time tenant setup.
    PreRun,
    /// Write.
    Upsert,
    /// Read.
    Select,
    /// Think time between operations.
    IdleTime,
    /// User-supplied function.
    UserDefined,
}

impl OperationKind {
    /// Number of operation kinds.
    pub const COUNT: usize = 5;

    /// All kinds in index order.
    pub const ALL: [Self; Self::COUNT] =
        [Self::PreRun, Self::Upsert, Self::Select, Self::IdleTime, Self::UserDefined];

    /// Returns the dense dispatch-table index for the kind.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::PreRun => 0,
            Self::Upsert => 1,
            Self::Select => 2,
            Self::IdleTime => 3,
            Self::UserDefined => 4,
        }
    }

    /// Returns the stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreRun => "PRE_RUN",
            Self::Upsert => "UPSERT",
            Self::Select => "SELECT",
            Self::IdleTime => "IDLE_TIME",
            Self::UserDefined => "USER_DEFINED",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Operation Entity
// ============================================================================

/// Definition carried by an operation, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "definition", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationPayload {
    /// Ordered setup statements.
    PreRun(Vec<Ddl>),
    /// Upsert definition.
    Upsert(Upsert),
    /// Query definition.
    Select(Query),
    /// Idle-time definition.
    IdleTime(IdleTime),
    /// User-defined function definition.
    UserDefined(UserDefined),
}

impl OperationPayload {
    /// Returns the kind matching the payload variant.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::PreRun(_) => OperationKind::PreRun,
            Self::Upsert(_) => OperationKind::Upsert,
            Self::Select(_) => OperationKind::Select,
            Self::IdleTime(_) => OperationKind::IdleTime,
            Self::UserDefined(_) => OperationKind::UserDefined,
        }
    }
}

/// Configured operation.
///
/// # Invariants
/// - Immutable after construction; `kind()` is derived from `payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Operation identifier.
    pub id: OperationId,
    /// Tagged operation definition.
    pub payload: OperationPayload,
}

impl Operation {
    /// Builds the setup operation carrying every setup statement in order.
    ///
    /// The identifier is the kind label, since a scenario has at most one.
    #[must_use]
    pub fn pre_run(ddls: Vec<Ddl>) -> Self {
        Self {
            id: OperationId::new(OperationKind::PreRun.as_str()),
            payload: OperationPayload::PreRun(ddls),
        }
    }

    /// Builds an upsert operation from its definition.
    #[must_use]
    pub fn upsert(upsert: &Upsert) -> Self {
        Self {
            id: upsert.id.clone(),
            payload: OperationPayload::Upsert(upsert.clone()),
        }
    }

    /// Builds a query operation from its definition.
    #[must_use]
    pub fn select(query: &Query) -> Self {
        Self {
            id: query.id.clone(),
            payload: OperationPayload::Select(query.clone()),
        }
    }

    /// Builds an idle-time operation from its definition.
    #[must_use]
    pub fn idle_time(idle_time: &IdleTime) -> Self {
        Self {
            id: idle_time.id.clone(),
            payload: OperationPayload::IdleTime(idle_time.clone()),
        }
    }

    /// Builds a user-defined operation from its definition.
    #[must_use]
    pub fn user_defined(udf: &UserDefined) -> Self {
        Self {
            id: udf.id.clone(),
            payload: OperationPayload::UserDefined(udf.clone()),
        }
    }

    /// Returns the operation kind.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.payload.kind()
    }
}
