// ABOUTME: Approval workflow finite-state machine with an explicit transition table
// ABOUTME: Validates transitions before mutating; appends revision requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

//! # Approval Workflow
//!
//! State machine governing a plan's lifecycle from creation to
//! active/rejected:
//!
//! - `pending` -> `approved` | `rejected` | `revision_requested`
//! - `revision_requested` -> `approved` | `rejected` | `revision_requested`
//! - `approved`, `rejected`: terminal
//!
//! Transitions happen only via an explicit reviewer action and are
//! validated against the table before any mutation, so an invalid target
//! never half-updates a record.

use chrono::{DateTime, Utc};
use lotus_core::models::{ApprovalStatus, ApprovalWorkflow, RevisionRequest};

use crate::errors::{AppError, AppResult};

/// A reviewer decision to apply to a plan's workflow
#[derive(Debug, Clone)]
pub struct ReviewAction {
    /// Target status; must be a reviewer-reachable state
    pub target: ApprovalStatus,
    /// Reviewer identifier
    pub reviewer_id: String,
    /// Review notes
    pub notes: Option<String>,
    /// Reason for the revision, required when `target` is
    /// `RevisionRequested`
    pub revision_reason: Option<String>,
    /// Concrete changes requested, for `RevisionRequested`
    pub changes_requested: Option<String>,
}

/// Whether the transition table permits `from -> to`.
#[must_use]
pub const fn can_transition(from: ApprovalStatus, to: ApprovalStatus) -> bool {
    match from {
        ApprovalStatus::Pending | ApprovalStatus::RevisionRequested => matches!(
            to,
            ApprovalStatus::Approved
                | ApprovalStatus::Rejected
                | ApprovalStatus::RevisionRequested
        ),
        ApprovalStatus::Approved | ApprovalStatus::Rejected => false,
    }
}

/// Apply a reviewer action to a workflow record at `now`.
///
/// Sets `reviewed_by` and `review_notes`; sets `approved_at` only on a
/// transition into `Approved`; appends exactly one [`RevisionRequest`]
/// entry on `RevisionRequested`, leaving prior entries intact.
///
/// # Errors
///
/// Returns `InvalidTransition` (before any mutation) when the target is
/// `Pending` or the transition table disallows the move.
pub fn apply_review(
    workflow: &mut ApprovalWorkflow,
    action: &ReviewAction,
    now: DateTime<Utc>,
) -> AppResult<()> {
    if action.target == ApprovalStatus::Pending {
        return Err(AppError::invalid_transition(
            "Target status must be approved, rejected, or revision_requested",
        ));
    }
    if !can_transition(workflow.status, action.target) {
        return Err(AppError::invalid_transition(format!(
            "Cannot move a plan from {} to {}",
            workflow.status.as_str(),
            action.target.as_str()
        )));
    }

    workflow.status = action.target;
    workflow.reviewed_by = Some(action.reviewer_id.clone());
    workflow.review_notes = action.notes.clone();

    match action.target {
        ApprovalStatus::Approved => workflow.approved_at = Some(now),
        ApprovalStatus::RevisionRequested => workflow.revision_requests.push(RevisionRequest {
            requested_by: action.reviewer_id.clone(),
            requested_at: now,
            reason: action.revision_reason.clone().unwrap_or_default(),
            changes_requested: action.changes_requested.clone().unwrap_or_default(),
        }),
        ApprovalStatus::Rejected | ApprovalStatus::Pending => {}
    }
    Ok(())
}
