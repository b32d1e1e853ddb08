// ABOUTME: Usage ledger types for plans and member progress records
// ABOUTME: Monotonic counters, streaks, achievements, and the User document
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TenantId;

/// Plan-side usage ledger, updated when a session is marked complete.
///
/// Counters are monotonically non-decreasing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlanUsage {
    /// Sessions completed against this plan
    pub sessions_completed: u32,
    /// Total practice minutes logged against this plan
    pub total_practice_time: u32,
    /// When the most recent session was completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_session_date: Option<DateTime<Utc>>,
    /// Fraction of the plan's sessions completed (0-1, capped)
    #[serde(default)]
    pub completion_rate: f64,
}

/// A milestone earned by a member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    /// Milestone name
    pub name: String,
    /// When it was earned
    pub earned_date: DateTime<Utc>,
    /// Human-readable description
    pub description: String,
}

/// User-side progress ledger, the aggregate across all of a member's plans.
///
/// Counters are monotonically non-decreasing. Streaks advance on
/// calendar-day adjacency (UTC): completing a session the day after the
/// previous `last_session_date` extends the streak, the same day leaves it
/// unchanged, and any gap resets it to 1.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserProgress {
    /// Sessions completed across all plans
    pub sessions_completed: u32,
    /// Total practice minutes across all plans
    pub total_minutes: u32,
    /// Current consecutive-day streak
    pub current_streak: u32,
    /// Longest consecutive-day streak ever reached
    pub longest_streak: u32,
    /// When the most recent session was completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_session_date: Option<DateTime<Utc>>,
    /// Milestones earned, append-only
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

/// A member of a tenant's studio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Owning tenant
    #[serde(rename = "tenantId")]
    pub tenant_id: TenantId,
    /// Display name
    pub name: String,
    /// Contact email, unique within a tenant
    pub email: String,
    /// Last assessed experience tier, updated on plan generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness_level: Option<String>,
    /// Aggregate progress ledger
    pub progress: UserProgress,
    /// Creation timestamp
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
