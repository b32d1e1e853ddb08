// ABOUTME: Shared fixtures for integration tests
// ABOUTME: In-memory store setup, assessment builders, and plan documents
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

#![allow(dead_code, clippy::unwrap_used)]

use chrono::Utc;
use lotus_core::models::{
    ApprovalWorkflow, Assessment, ExperienceTier, GenerationMetadata, Limitation, Plan, PlanUsage,
    Severity, TenantId, User, UserProgress,
};
use lotus_plan_server::catalog::PoseCatalog;
use lotus_plan_server::composer;
use lotus_plan_server::store::{PlanStore, SqliteStore};
use uuid::Uuid;

/// Fresh in-memory store with the schema applied
pub async fn setup_store() -> SqliteStore {
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
    store.migrate().await.unwrap();
    store
}

/// A plain beginner assessment: 30-minute sessions, 3x/week, 4 weeks
pub fn beginner_assessment() -> Assessment {
    Assessment {
        experience_level: ExperienceTier::Beginner,
        primary_goals: vec!["flexibility".to_owned()],
        injuries_limitations: vec![],
        preferred_styles: vec!["hatha".to_owned()],
        session_duration: 30,
        sessions_per_week: 3,
        duration_weeks: 4,
        additional_notes: None,
    }
}

/// A wrist limitation, which several built-in beginner poses
/// contraindicate
pub fn wrist_limitation() -> Limitation {
    Limitation {
        limitation_type: "wrist".to_owned(),
        severity: Severity::Moderate,
        notes: Some("old fracture".to_owned()),
    }
}

/// Create a member record and return its id
pub async fn create_user(store: &SqliteStore, tenant: &TenantId) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let user = User {
        id,
        tenant_id: tenant.clone(),
        name: "Asha Rao".to_owned(),
        email: format!("{id}@example.com"),
        fitness_level: None,
        progress: UserProgress::default(),
        created_at: now,
        updated_at: now,
    };
    store.create_user(&user).await.unwrap();
    id
}

/// A complete, locally composed plan document ready to insert
pub fn composed_plan(tenant: &TenantId, user_id: Uuid) -> Plan {
    let assessment = beginner_assessment();
    let structure = composer::compose(&assessment, &PoseCatalog::builtin());
    let now = Utc::now();
    Plan {
        id: Uuid::new_v4(),
        tenant_id: tenant.clone(),
        user_id,
        title: "beginner Yoga Plan".to_owned(),
        description: "Personalized 3x/week program".to_owned(),
        plan_structure: structure,
        user_assessment: assessment,
        generation_metadata: GenerationMetadata {
            model_used: "local_composer".to_owned(),
            confidence_score: 0.95,
            generation_time_ms: 1,
            tokens_consumed: 0,
            prompt_version: "v1.0".to_owned(),
            safety_checks_passed: true,
        },
        approval_workflow: ApprovalWorkflow::default(),
        usage: PlanUsage::default(),
        created_at: now,
        updated_at: now,
    }
}
