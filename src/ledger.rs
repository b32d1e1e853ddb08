// ABOUTME: Usage/progress ledger mutators applied on session completion
// ABOUTME: Monotonic counters, calendar-day streaks, and milestone achievements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

//! # Usage/Progress Ledger
//!
//! Pure mutators applied when a session is marked complete. The store
//! wraps both sides (plan usage and user progress) in one transaction;
//! these functions only compute the new ledger values.
//!
//! Streaks advance on UTC calendar-day adjacency: same day leaves the
//! streak unchanged, the day after the previous session extends it, any
//! gap resets it to 1.

use chrono::{DateTime, Utc};
use lotus_core::models::{Achievement, PlanUsage, UserProgress};

/// Sessions-completed milestones that earn an achievement, once each
const MILESTONES: &[(u32, &str, &str)] = &[
    (1, "First Practice", "Completed your first session"),
    (10, "Ten Sessions Strong", "Completed 10 sessions"),
    (25, "Quarter Century", "Completed 25 sessions"),
    (50, "Half Century", "Completed 50 sessions"),
    (100, "Centurion", "Completed 100 sessions"),
];

/// Apply a completed session to a plan's usage ledger.
///
/// `total_sessions` is the plan's session count, used for the
/// completion-rate denominator.
pub fn apply_plan_usage(
    usage: &mut PlanUsage,
    duration_minutes: u32,
    total_sessions: u32,
    now: DateTime<Utc>,
) {
    usage.sessions_completed += 1;
    usage.total_practice_time += duration_minutes;
    usage.last_session_date = Some(now);
    if total_sessions > 0 {
        usage.completion_rate =
            (f64::from(usage.sessions_completed) / f64::from(total_sessions)).min(1.0);
    }
}

/// Apply a completed session to a user's progress ledger: counters,
/// streak, and milestone achievements.
pub fn apply_user_progress(progress: &mut UserProgress, duration_minutes: u32, now: DateTime<Utc>) {
    advance_streak(progress, now);
    progress.sessions_completed += 1;
    progress.total_minutes += duration_minutes;
    progress.last_session_date = Some(now);
    award_milestones(progress, now);
}

fn advance_streak(progress: &mut UserProgress, now: DateTime<Utc>) {
    let today = now.date_naive();
    let previous = progress.last_session_date.map(|d| d.date_naive());
    match previous {
        Some(prev) if prev == today => {}
        Some(prev) if prev.succ_opt() == Some(today) => progress.current_streak += 1,
        _ => progress.current_streak = 1,
    }
    progress.longest_streak = progress.longest_streak.max(progress.current_streak);
}

fn award_milestones(progress: &mut UserProgress, now: DateTime<Utc>) {
    for (count, name, description) in MILESTONES {
        if progress.sessions_completed == *count
            && !progress.achievements.iter().any(|a| a.name == *name)
        {
            progress.achievements.push(Achievement {
                name: (*name).to_owned(),
                earned_date: now,
                description: (*description).to_owned(),
            });
        }
    }
}
