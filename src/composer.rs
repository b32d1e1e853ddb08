// ABOUTME: Deterministic local plan composer building week/session structures
// ABOUTME: Pure functions over an assessment and an injected pose catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

//! # Plan Composer
//!
//! Assembles a multi-week, multi-session program structure from an
//! assessment and a catalog. Composition is pure and deterministic given
//! the same catalog snapshot and assessment; selection is intentionally
//! simple, with no randomness, so the non-generative path stays testable
//! byte for byte.

use lotus_core::models::{
    Assessment, ExperienceTier, Meditation, PhaseBlock, PlanStructure, Session, Week,
};

use crate::catalog::PoseCatalog;

/// Cap on warm-up and cool-down phase length in minutes
const PHASE_CAP_MINUTES: u32 = 8;
/// Warm-up pose cap per session
const WARM_UP_POSE_CAP: usize = 2;

const BEGINNER_THEMES: &[&str] = &[
    "Foundations and Breath",
    "Building Steadiness",
    "Gentle Strength",
    "Flow and Release",
];

const INTERMEDIATE_THEMES: &[&str] = &[
    "Deepening the Practice",
    "Strength in Motion",
    "Balance and Focus",
    "Integrated Flow",
];

const ADVANCED_THEMES: &[&str] = &[
    "Precision and Power",
    "Inversions and Arm Balances",
    "Long Holds",
    "Self-Directed Practice",
];

/// Fixed week-number to focus-area table; weeks past the table default to
/// general practice.
const FOCUS_AREAS: &[&[&str]] = &[
    &["alignment", "breath awareness"],
    &["strength", "stability"],
    &["flexibility", "balance"],
    &["flow", "endurance"],
];

/// Compose a full program structure from an assessment and a catalog.
///
/// Deterministic: calling twice with the same inputs yields identical
/// structures. Poses are cloned out of the catalog so later catalog edits
/// never alter an issued plan.
#[must_use]
pub fn compose(assessment: &Assessment, catalog: &PoseCatalog) -> PlanStructure {
    let tier = assessment.experience_level;
    let weeks = (1..=assessment.duration_weeks)
        .map(|week_number| Week {
            week_number,
            theme: theme_for(tier, week_number),
            focus_areas: focus_areas_for(week_number),
            sessions: (1..=assessment.sessions_per_week)
                .map(|session_number| build_session(session_number, assessment, catalog))
                .collect(),
        })
        .collect();

    PlanStructure {
        duration_weeks: assessment.duration_weeks,
        sessions_per_week: assessment.sessions_per_week,
        difficulty_level: tier,
        total_sessions: assessment.duration_weeks * assessment.sessions_per_week,
        weeks,
    }
}

fn theme_for(tier: ExperienceTier, week_number: u32) -> String {
    let themes = match tier {
        ExperienceTier::Beginner => BEGINNER_THEMES,
        ExperienceTier::Intermediate => INTERMEDIATE_THEMES,
        ExperienceTier::Advanced => ADVANCED_THEMES,
    };
    themes.get(week_number as usize - 1).map_or_else(
        || format!("Week {week_number} - Progressive Practice"),
        |t| (*t).to_owned(),
    )
}

fn focus_areas_for(week_number: u32) -> Vec<String> {
    FOCUS_AREAS
        .get(week_number as usize - 1)
        .map_or_else(|| vec!["general practice"], |areas| areas.to_vec())
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn build_session(session_number: u32, assessment: &Assessment, catalog: &PoseCatalog) -> Session {
    let tier = assessment.experience_level;
    let duration = assessment.session_duration;

    let edge_minutes = PHASE_CAP_MINUTES.min(duration / 4);
    // The 60% main allocation would overrun short sessions once both edge
    // phases hit their floor; the three phases must fit the session.
    let main_minutes = (duration * 3 / 5).min(duration - 2 * edge_minutes);

    let poses = catalog.poses_for(tier);

    let warm_up_poses: Vec<_> = poses
        .iter()
        .filter(|p| {
            p.benefits.iter().any(|b| {
                let b = b.to_lowercase();
                b.contains("warm") || b.contains("mobility")
            })
        })
        .take(WARM_UP_POSE_CAP)
        .cloned()
        .collect();

    let main_poses: Vec<_> = poses
        .iter()
        .take((duration / 10) as usize)
        .cloned()
        .collect();

    Session {
        session_number,
        duration_minutes: duration,
        warm_up: PhaseBlock {
            duration_minutes: edge_minutes,
            poses: warm_up_poses,
        },
        main_sequence: PhaseBlock {
            duration_minutes: main_minutes,
            poses: main_poses,
        },
        cool_down: PhaseBlock {
            duration_minutes: edge_minutes,
            poses: vec![catalog.relaxation_pose(tier).clone()],
        },
        meditation: build_meditation(assessment, duration, 2 * edge_minutes + main_minutes),
    }
}

/// Close sessions with a short guided meditation when the member asked for
/// it, filling whatever time the three phases left over.
fn build_meditation(
    assessment: &Assessment,
    session_duration: u32,
    phases_total: u32,
) -> Option<Meditation> {
    let wants_meditation = assessment
        .primary_goals
        .iter()
        .chain(assessment.preferred_styles.iter())
        .any(|s| {
            let s = s.to_lowercase();
            s.contains("stress") || s.contains("mindful") || s.contains("meditat")
        });
    let remaining = session_duration.saturating_sub(phases_total);
    if !wants_meditation || remaining == 0 {
        return None;
    }
    Some(Meditation {
        duration_minutes: remaining,
        style: "breath awareness".to_owned(),
        instructions: "Sit or lie comfortably. Rest attention on the natural breath, \
                       counting ten exhales, then begin again."
            .to_owned(),
    })
}
