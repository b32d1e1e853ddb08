// ABOUTME: Safety validator cross-checking plan poses against stated limitations
// ABOUTME: Case-insensitive substring match of contraindication tags, short-circuit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

//! # Safety Validator
//!
//! Walks every pose in a composed plan (depth-first, stable order:
//! weeks, sessions, warm-up/main/cool-down phases) against every stated
//! limitation. A pose fails when any of its contraindication tags
//! case-insensitively *contains* the limitation's type string — a
//! deliberately permissive substring match so "wrist injuries" catches a
//! stated "wrist" limitation.
//!
//! The validator only reports; the orchestrator decides that a finding
//! fails the generation outright, since contraindicated content is a
//! correctness defect, not a soft warning.

use lotus_core::models::{Assessment, PlanStructure, Pose};

/// The first offending pose/limitation pair found in a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyFinding {
    /// Name of the contraindicated pose
    pub pose_name: String,
    /// The matched contraindication tag on the pose
    pub contraindication: String,
    /// The limitation type that matched it
    pub limitation_type: String,
    /// Week the pose appears in (1-based)
    pub week_number: u32,
    /// Session the pose appears in (1-based, within the week)
    pub session_number: u32,
}

/// Validate a plan structure against the assessment's limitations.
///
/// Trivially passes when no limitations are stated. Short-circuits on the
/// first offending pair.
///
/// # Errors
///
/// Returns the offending [`SafetyFinding`] when any pose is
/// contraindicated for a stated limitation.
pub fn check(structure: &PlanStructure, assessment: &Assessment) -> Result<(), SafetyFinding> {
    if assessment.injuries_limitations.is_empty() {
        return Ok(());
    }

    for week in &structure.weeks {
        for session in &week.sessions {
            let phases = [
                &session.warm_up.poses,
                &session.main_sequence.poses,
                &session.cool_down.poses,
            ];
            for poses in phases {
                for pose in poses {
                    if let Some(finding) =
                        check_pose(pose, assessment, week.week_number, session.session_number)
                    {
                        return Err(finding);
                    }
                }
            }
        }
    }
    Ok(())
}

fn check_pose(
    pose: &Pose,
    assessment: &Assessment,
    week_number: u32,
    session_number: u32,
) -> Option<SafetyFinding> {
    for limitation in &assessment.injuries_limitations {
        let needle = limitation.limitation_type.to_lowercase();
        if needle.is_empty() {
            continue;
        }
        for tag in &pose.contraindications {
            if tag.to_lowercase().contains(&needle) {
                return Some(SafetyFinding {
                    pose_name: pose.name.clone(),
                    contraindication: tag.clone(),
                    limitation_type: limitation.limitation_type.clone(),
                    week_number,
                    session_number,
                });
            }
        }
    }
    None
}
