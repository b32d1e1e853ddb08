// ABOUTME: User intake assessment model with experience tiers and limitations
// ABOUTME: Immutable once submitted; a frozen copy travels with every generated plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

use serde::{Deserialize, Serialize};

/// Experience tier for members and poses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceTier {
    /// New to the practice
    #[default]
    Beginner,
    /// Comfortable with foundational poses
    Intermediate,
    /// Experienced practitioner
    Advanced,
}

impl ExperienceTier {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse from string representation (case-insensitive).
    ///
    /// Unknown tiers fall back to `Beginner`; this is a policy fallback,
    /// not a failure.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            _ => Self::Beginner,
        }
    }
}

/// Severity of a stated limitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Minor discomfort, most modifications acceptable
    #[default]
    Mild,
    /// Requires pose modifications
    Moderate,
    /// Poses touching the area must be avoided entirely
    Severe,
}

impl Severity {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

/// An injury or physical limitation stated in the intake assessment.
///
/// The `limitation_type` is free text matched case-insensitively against
/// pose contraindication tags by the safety validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limitation {
    /// Free-text limitation type, e.g. "wrist" or "lower back"
    #[serde(rename = "type")]
    pub limitation_type: String,
    /// How severe the limitation is
    #[serde(default)]
    pub severity: Severity,
    /// Optional free-text context from the member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

const fn default_session_duration() -> u32 {
    30
}

const fn default_sessions_per_week() -> u32 {
    3
}

const fn default_duration_weeks() -> u32 {
    4
}

/// User-submitted intake describing goals, limitations, and desired cadence.
///
/// Immutable once submitted; the orchestrator freezes a copy into every
/// plan it generates so later edits never alter an issued plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Self-reported experience tier
    pub experience_level: ExperienceTier,
    /// What the member wants out of the program
    #[serde(default)]
    pub primary_goals: Vec<String>,
    /// Stated injuries and limitations, drives safety validation
    #[serde(default)]
    pub injuries_limitations: Vec<Limitation>,
    /// Preferred practice styles, e.g. "vinyasa", "restorative"
    #[serde(default)]
    pub preferred_styles: Vec<String>,
    /// Desired session length in minutes
    #[serde(default = "default_session_duration")]
    pub session_duration: u32,
    /// Desired sessions per week
    #[serde(default = "default_sessions_per_week")]
    pub sessions_per_week: u32,
    /// Desired total program length in weeks
    #[serde(default = "default_duration_weeks")]
    pub duration_weeks: u32,
    /// Anything else the member wants the instructor to know
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

impl Assessment {
    /// Check the assessment invariants.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant:
    /// `sessions_per_week >= 1`, `session_duration >= 1`,
    /// `duration_weeks >= 1`.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.sessions_per_week < 1 {
            return Err("sessions_per_week must be at least 1");
        }
        if self.session_duration < 1 {
            return Err("session_duration must be at least 1 minute");
        }
        if self.duration_weeks < 1 {
            return Err("duration_weeks must be at least 1");
        }
        Ok(())
    }
}
