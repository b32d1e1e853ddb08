// ABOUTME: Approval workflow state, reviewer annotations, and revision requests
// ABOUTME: Plans are created pending and move only via explicit reviewer actions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Approval lifecycle status of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting first review
    #[default]
    Pending,
    /// Accepted by a reviewer; terminal
    Approved,
    /// Declined by a reviewer; terminal
    Rejected,
    /// Sent back with requested changes; may be re-reviewed
    RevisionRequested,
}

impl ApprovalStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::RevisionRequested => "revision_requested",
        }
    }

    /// Parse from string representation.
    ///
    /// Returns `None` for unknown statuses; reviewer-supplied statuses are
    /// out-of-domain input and must be rejected, not defaulted.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "revision_requested" => Some(Self::RevisionRequested),
            _ => None,
        }
    }

    /// Whether a plan in this status counts as the user's active plan
    /// for exclusivity purposes.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Whether this status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// One reviewer request for changes, appended on each
/// `revision_requested` transition. The list is append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionRequest {
    /// Reviewer who requested the revision
    pub requested_by: String,
    /// When the revision was requested
    pub requested_at: DateTime<Utc>,
    /// Why the plan was sent back
    pub reason: String,
    /// What should change
    pub changes_requested: String,
}

/// Review lifecycle record attached to every plan.
///
/// Created in `Pending` at plan creation; `approved_at` is set only on a
/// transition into `Approved`. Plan records are retained forever, never
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApprovalWorkflow {
    /// Current lifecycle status
    pub status: ApprovalStatus,
    /// Reviewer who made the most recent decision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    /// Notes from the most recent review
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    /// Set only when the plan transitioned into `Approved`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    /// Append-only revision history
    #[serde(default)]
    pub revision_requests: Vec<RevisionRequest>,
}
