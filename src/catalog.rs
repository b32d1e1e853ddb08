// ABOUTME: Tiered, immutable pose catalog with safety metadata
// ABOUTME: Injectable reference data; tests substitute fixture catalogs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

//! # Pose Catalog
//!
//! Static, tiered collection of pose records, each carrying
//! contraindication and benefit tags. The catalog is an explicitly
//! constructed, immutable value injected into the composer rather than a
//! module-level constant, so tests can substitute controlled fixtures.
//!
//! Lookup is read-only and deterministic, and total over the tier enum;
//! unknown tier strings already fall back to beginner at parse time.

use lotus_core::models::{ExperienceTier, Pose};

/// Poses available to one experience tier, plus the tier's fixed
/// relaxation pose used to close every cool-down.
#[derive(Debug, Clone)]
pub struct TierPoses {
    /// Ordered pose sequence for the tier
    pub poses: Vec<Pose>,
    /// Fixed relaxation pose for cool-downs
    pub relaxation: Pose,
}

/// Immutable, tiered pose catalog
#[derive(Debug, Clone)]
pub struct PoseCatalog {
    beginner: TierPoses,
    intermediate: TierPoses,
    advanced: TierPoses,
}

impl PoseCatalog {
    /// Build a catalog from explicit tier sets
    #[must_use]
    pub const fn new(beginner: TierPoses, intermediate: TierPoses, advanced: TierPoses) -> Self {
        Self {
            beginner,
            intermediate,
            advanced,
        }
    }

    /// Ordered pose sequence for a tier
    #[must_use]
    pub fn poses_for(&self, tier: ExperienceTier) -> &[Pose] {
        &self.tier(tier).poses
    }

    /// The tier's fixed relaxation pose
    #[must_use]
    pub fn relaxation_pose(&self, tier: ExperienceTier) -> &Pose {
        &self.tier(tier).relaxation
    }

    const fn tier(&self, tier: ExperienceTier) -> &TierPoses {
        match tier {
            ExperienceTier::Beginner => &self.beginner,
            ExperienceTier::Intermediate => &self.intermediate,
            ExperienceTier::Advanced => &self.advanced,
        }
    }

    /// The built-in production catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(beginner_tier(), intermediate_tier(), advanced_tier())
    }
}

#[allow(clippy::too_many_arguments)]
fn pose(
    name: &str,
    sanskrit: &str,
    seconds: u32,
    tier: ExperienceTier,
    instructions: &[&str],
    modifications: &[&str],
    contraindications: &[&str],
    benefits: &[&str],
) -> Pose {
    Pose {
        name: name.to_owned(),
        sanskrit_name: Some(sanskrit.to_owned()),
        duration_seconds: Some(seconds),
        duration_breaths: None,
        instructions: instructions.iter().map(|s| (*s).to_owned()).collect(),
        modifications: modifications.iter().map(|s| (*s).to_owned()).collect(),
        contraindications: contraindications
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
        benefits: benefits.iter().map(|s| (*s).to_owned()).collect(),
        difficulty_level: tier,
    }
}

fn savasana() -> Pose {
    pose(
        "Corpse Pose",
        "Savasana",
        120,
        ExperienceTier::Beginner,
        &["Lie flat on your back", "Let the arms rest away from the body", "Release all effort"],
        &["Place a bolster under the knees"],
        &[],
        &["deep relaxation", "nervous system reset"],
    )
}

fn beginner_tier() -> TierPoses {
    TierPoses {
        poses: vec![
            pose(
                "Mountain Pose",
                "Tadasana",
                30,
                ExperienceTier::Beginner,
                &["Stand tall with feet hip-width apart", "Ground through all four corners of the feet", "Breathe deeply"],
                &["Stand with back against a wall"],
                &[],
                &["improves posture", "gentle warming", "body awareness"],
            ),
            pose(
                "Cat-Cow",
                "Marjaryasana-Bitilasana",
                60,
                ExperienceTier::Beginner,
                &["Start on hands and knees", "Alternate arching and rounding the spine with the breath"],
                &["Perform seated on a chair"],
                &["wrist injuries"],
                &["spinal mobility", "warms the back"],
            ),
            pose(
                "Downward-Facing Dog",
                "Adho Mukha Svanasana",
                45,
                ExperienceTier::Beginner,
                &["From hands and knees, lift the hips up and back", "Press the floor away through the hands"],
                &["Bend the knees generously", "Practice with forearms on a chair seat"],
                &["wrist injuries", "high blood pressure", "shoulder injuries"],
                &["full-body stretch", "builds upper body strength"],
            ),
            pose(
                "Warrior I",
                "Virabhadrasana I",
                45,
                ExperienceTier::Beginner,
                &["Step one foot forward into a lunge", "Square the hips", "Raise the arms overhead"],
                &["Shorten the stance", "Keep hands on hips"],
                &["knee injuries", "hip problems"],
                &["builds leg strength", "opens the hips"],
            ),
            pose(
                "Tree Pose",
                "Vrksasana",
                30,
                ExperienceTier::Beginner,
                &["Shift weight onto one leg", "Place the other foot on the calf or inner thigh", "Find a steady gaze point"],
                &["Keep toes on the floor", "Use a wall for support"],
                &["ankle instability"],
                &["balance", "concentration"],
            ),
            pose(
                "Child's Pose",
                "Balasana",
                60,
                ExperienceTier::Beginner,
                &["Kneel and fold forward", "Rest the forehead on the mat", "Soften the breath"],
                &["Place a cushion between heels and hips"],
                &["knee injuries", "pregnancy"],
                &["relaxation", "gentle back stretch"],
            ),
        ],
        relaxation: savasana(),
    }
}

fn intermediate_tier() -> TierPoses {
    TierPoses {
        poses: vec![
            pose(
                "Sun Salutation A",
                "Surya Namaskara A",
                90,
                ExperienceTier::Intermediate,
                &["Flow through the classical sequence", "Link each movement to one breath"],
                &["Step instead of jumping between positions"],
                &["wrist injuries", "lower back pain"],
                &["warms the whole body", "cardiovascular endurance"],
            ),
            pose(
                "Warrior II",
                "Virabhadrasana II",
                45,
                ExperienceTier::Intermediate,
                &["Open the hips to the side", "Extend the arms parallel to the floor", "Gaze over the front hand"],
                &["Shorten the stance"],
                &["knee injuries"],
                &["leg strength", "hip mobility"],
            ),
            pose(
                "Triangle Pose",
                "Trikonasana",
                45,
                ExperienceTier::Intermediate,
                &["Straighten the front leg", "Hinge at the hip and reach forward, then down"],
                &["Rest the lower hand on a block"],
                &["neck injuries", "low blood pressure"],
                &["hamstring flexibility", "side-body stretch"],
            ),
            pose(
                "Boat Pose",
                "Navasana",
                30,
                ExperienceTier::Intermediate,
                &["Balance on the sitting bones", "Lift the legs and extend the arms forward"],
                &["Keep the knees bent", "Hold behind the thighs"],
                &["lower back pain", "pregnancy"],
                &["core strength"],
            ),
            pose(
                "Bridge Pose",
                "Setu Bandha Sarvangasana",
                45,
                ExperienceTier::Intermediate,
                &["Lie on the back with knees bent", "Press into the feet and lift the hips"],
                &["Place a block under the sacrum"],
                &["neck injuries"],
                &["spinal mobility", "opens the chest"],
            ),
            pose(
                "Seated Forward Fold",
                "Paschimottanasana",
                60,
                ExperienceTier::Intermediate,
                &["Sit with legs extended", "Hinge forward from the hips over the legs"],
                &["Bend the knees", "Use a strap around the feet"],
                &["lower back pain", "hamstring tears"],
                &["hamstring flexibility", "calming"],
            ),
        ],
        relaxation: savasana(),
    }
}

fn advanced_tier() -> TierPoses {
    TierPoses {
        poses: vec![
            pose(
                "Sun Salutation B",
                "Surya Namaskara B",
                120,
                ExperienceTier::Advanced,
                &["Flow through the sequence including chair and warrior positions", "One breath per movement"],
                &[],
                &["wrist injuries", "knee injuries"],
                &["warms the whole body", "endurance", "full-body mobility"],
            ),
            pose(
                "Crow Pose",
                "Bakasana",
                20,
                ExperienceTier::Advanced,
                &["Plant the hands shoulder-width apart", "Place the knees on the upper arms", "Shift weight forward until the feet lift"],
                &["Rest the forehead on a block"],
                &["wrist injuries", "carpal tunnel", "shoulder injuries"],
                &["arm strength", "balance", "focus"],
            ),
            pose(
                "Headstand",
                "Sirsasana",
                60,
                ExperienceTier::Advanced,
                &["Interlace the fingers and cradle the head", "Walk the feet in and lift the legs with control"],
                &["Practice against a wall"],
                &["neck injuries", "high blood pressure", "glaucoma", "pregnancy"],
                &["balance", "circulation"],
            ),
            pose(
                "Wheel Pose",
                "Urdhva Dhanurasana",
                30,
                ExperienceTier::Advanced,
                &["Lie on the back, plant hands by the ears", "Press up into a full backbend"],
                &["Practice bridge pose instead"],
                &["wrist injuries", "lower back pain", "shoulder injuries"],
                &["spinal extension", "opens the chest", "energizing"],
            ),
            pose(
                "Half Moon Pose",
                "Ardha Chandrasana",
                30,
                ExperienceTier::Advanced,
                &["From triangle, shift weight onto the front leg", "Lift the back leg parallel to the floor"],
                &["Rest the lower hand on a block"],
                &["ankle instability", "low blood pressure"],
                &["balance", "leg strength", "hip mobility"],
            ),
            pose(
                "Pigeon Pose",
                "Eka Pada Rajakapotasana",
                90,
                ExperienceTier::Advanced,
                &["Bring one shin forward behind the wrists", "Extend the back leg and fold over the front shin"],
                &["Place a cushion under the front hip"],
                &["knee injuries", "hip problems"],
                &["deep hip mobility", "releases tension"],
            ),
        ],
        relaxation: savasana(),
    }
}
