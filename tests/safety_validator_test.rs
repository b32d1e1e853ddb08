// ABOUTME: Integration tests for the safety validator
// ABOUTME: Contraindication matching against stated limitations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{beginner_assessment, wrist_limitation};
use lotus_core::models::{Limitation, Severity};
use lotus_plan_server::catalog::PoseCatalog;
use lotus_plan_server::{composer, safety};

#[test]
fn plan_with_no_limitations_passes_trivially() {
    let catalog = PoseCatalog::builtin();
    let assessment = beginner_assessment();
    let structure = composer::compose(&assessment, &catalog);
    assert!(safety::check(&structure, &assessment).is_ok());
}

#[test]
fn wrist_limitation_flags_the_offending_pose() {
    let catalog = PoseCatalog::builtin();
    let mut assessment = beginner_assessment();
    assessment.injuries_limitations = vec![wrist_limitation()];
    let structure = composer::compose(&assessment, &catalog);

    let finding = safety::check(&structure, &assessment).unwrap_err();
    assert_eq!(finding.pose_name, "Cat-Cow");
    assert_eq!(finding.contraindication, "wrist injuries");
    assert_eq!(finding.limitation_type, "wrist");
    assert_eq!(finding.week_number, 1);
    assert_eq!(finding.session_number, 1);
}

#[test]
fn matching_is_case_insensitive() {
    let catalog = PoseCatalog::builtin();
    let mut assessment = beginner_assessment();
    assessment.injuries_limitations = vec![Limitation {
        limitation_type: "WRIST".to_owned(),
        severity: Severity::Mild,
        notes: None,
    }];
    let structure = composer::compose(&assessment, &catalog);
    assert!(safety::check(&structure, &assessment).is_err());
}

#[test]
fn unrelated_limitation_passes() {
    let catalog = PoseCatalog::builtin();
    let mut assessment = beginner_assessment();
    assessment.injuries_limitations = vec![Limitation {
        limitation_type: "tinnitus".to_owned(),
        severity: Severity::Mild,
        notes: None,
    }];
    let structure = composer::compose(&assessment, &catalog);
    assert!(safety::check(&structure, &assessment).is_ok());
}

#[test]
fn empty_limitation_type_is_ignored() {
    let catalog = PoseCatalog::builtin();
    let mut assessment = beginner_assessment();
    assessment.injuries_limitations = vec![Limitation {
        limitation_type: String::new(),
        severity: Severity::Mild,
        notes: None,
    }];
    let structure = composer::compose(&assessment, &catalog);
    assert!(safety::check(&structure, &assessment).is_ok());
}
