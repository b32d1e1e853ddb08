// ABOUTME: Model module root with tenant identifier newtype and re-exports
// ABOUTME: Submodules cover assessments, plan documents, workflows, and progress
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

use std::fmt;

use serde::{Deserialize, Serialize};

/// User intake assessment types
pub mod assessment;
/// Plan document and generation types
pub mod plan;
/// Usage ledger and user progress types
pub mod progress;
/// Approval workflow types
pub mod workflow;

pub use assessment::{Assessment, ExperienceTier, Limitation, Severity};
pub use plan::{
    GenerationMetadata, Meditation, PhaseBlock, Plan, PlanStructure, Pose, Session, Week,
};
pub use progress::{Achievement, PlanUsage, User, UserProgress};
pub use workflow::{ApprovalStatus, ApprovalWorkflow, RevisionRequest};

/// Opaque tenant identifier.
///
/// Every entity and store query is scoped by tenant. The identifier is
/// resolved upstream (never trusted from a plan payload) and treated as an
/// opaque string here because tenants originate from external site
/// installations, not from this system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Create a tenant identifier from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for TenantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
