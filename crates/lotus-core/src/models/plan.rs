// ABOUTME: Plan aggregate root and generated program structure models
// ABOUTME: Poses, sessions, weeks, generation metadata, and the Plan document
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::assessment::{Assessment, ExperienceTier};
use super::progress::PlanUsage;
use super::workflow::ApprovalWorkflow;
use super::TenantId;

/// A single exercise ("pose") with safety metadata.
///
/// Poses are immutable reference data owned by the catalog. Plans clone
/// poses by value so later catalog edits never retroactively alter an
/// issued plan. Exactly one of `duration_seconds` / `duration_breaths`
/// should be meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// English pose name
    pub name: String,
    /// Traditional Sanskrit name, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanskrit_name: Option<String>,
    /// Hold duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    /// Hold duration as a breath count, for breath-paced poses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_breaths: Option<u32>,
    /// Ordered instruction steps
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Ordered modification suggestions
    #[serde(default)]
    pub modifications: Vec<String>,
    /// Free-text contraindication tags, matched case-insensitively
    /// against limitation types
    #[serde(default)]
    pub contraindications: Vec<String>,
    /// Benefit tags
    #[serde(default)]
    pub benefits: Vec<String>,
    /// Difficulty tier of the pose
    #[serde(default)]
    pub difficulty_level: ExperienceTier,
}

/// One phase of a session (warm-up, main sequence, or cool-down)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseBlock {
    /// Phase length in minutes
    pub duration_minutes: u32,
    /// Ordered poses making up the phase
    pub poses: Vec<Pose>,
}

/// Optional guided meditation closing a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meditation {
    /// Meditation length in minutes
    pub duration_minutes: u32,
    /// Style tag, e.g. "breath awareness"
    #[serde(rename = "type")]
    pub style: String,
    /// Free-text guidance script
    pub instructions: String,
}

/// A single practice session within a week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// 1-based sequence number, unique within its week
    pub session_number: u32,
    /// Total session length in minutes
    pub duration_minutes: u32,
    /// Required warm-up phase
    pub warm_up: PhaseBlock,
    /// Required main sequence phase
    pub main_sequence: PhaseBlock,
    /// Required cool-down phase
    pub cool_down: PhaseBlock,
    /// Optional meditation phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meditation: Option<Meditation>,
}

/// One week of the program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    /// 1-based sequence number, unique within the plan
    pub week_number: u32,
    /// Theme label for the week
    pub theme: String,
    /// Focus-area tags
    pub focus_areas: Vec<String>,
    /// Sessions, length equals the assessment's sessions-per-week
    pub sessions: Vec<Session>,
}

/// The generated program structure.
///
/// Invariant: `total_sessions == duration_weeks * sessions_per_week` and
/// every week carries exactly `sessions_per_week` sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStructure {
    /// Program length in weeks
    pub duration_weeks: u32,
    /// Sessions per week
    pub sessions_per_week: u32,
    /// Overall difficulty tier
    pub difficulty_level: ExperienceTier,
    /// Total session count across all weeks
    pub total_sessions: u32,
    /// The weeks, in order
    pub weeks: Vec<Week>,
}

impl PlanStructure {
    /// Check the structural totals invariant.
    #[must_use]
    pub fn totals_consistent(&self) -> bool {
        let sum: usize = self.weeks.iter().map(|w| w.sessions.len()).sum();
        self.total_sessions == self.duration_weeks * self.sessions_per_week
            && self.weeks.len() == self.duration_weeks as usize
            && sum == self.total_sessions as usize
    }
}

/// Bookkeeping produced once per generation attempt.
///
/// Never mutated afterward, except that `generation_time_ms` is
/// overwritten with the final wall-clock value by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Provider identifier, e.g. "local_composer"
    pub model_used: String,
    /// Provider confidence in the generated plan (0-1)
    pub confidence_score: f64,
    /// Wall-clock generation latency in milliseconds
    pub generation_time_ms: u64,
    /// Token/resource cost of the generation attempt
    pub tokens_consumed: u64,
    /// Prompt/schema version tag
    pub prompt_version: String,
    /// Whether the safety validator passed the generated structure
    pub safety_checks_passed: bool,
}

/// The plan aggregate root: one generated, approvable program document
/// tied to one user and tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Plan identifier
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Owning tenant
    #[serde(rename = "tenantId")]
    pub tenant_id: TenantId,
    /// Owning user
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    /// Display title
    pub title: String,
    /// Short description
    pub description: String,
    /// The generated program
    #[serde(rename = "planStructure")]
    pub plan_structure: PlanStructure,
    /// Frozen copy of the originating assessment
    #[serde(rename = "userAssessment")]
    pub user_assessment: Assessment,
    /// Generation bookkeeping
    #[serde(rename = "aiMetadata")]
    pub generation_metadata: GenerationMetadata,
    /// Review lifecycle state
    #[serde(rename = "approvalWorkflow")]
    pub approval_workflow: ApprovalWorkflow,
    /// Plan-side usage ledger
    pub usage: PlanUsage,
    /// Creation timestamp
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
