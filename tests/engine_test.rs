// ABOUTME: End-to-end tests for the plan engine
// ABOUTME: Generation flows, provider policy, safety gate, review, completion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{beginner_assessment, create_user, setup_store, wrist_limitation};
use lotus_core::models::{
    ApprovalStatus, Assessment, GenerationMetadata, PlanStructure, TenantId,
};
use lotus_plan_server::catalog::PoseCatalog;
use lotus_plan_server::composer;
use lotus_plan_server::errors::{AppError, AppResult, ErrorCode};
use lotus_plan_server::providers::PlanProvider;
use lotus_plan_server::store::{PlanStore, SqliteStore};
use lotus_plan_server::workflow::ReviewAction;
use lotus_plan_server::PlanEngine;
use uuid::Uuid;

/// Rich provider stub that always fails
struct DownProvider;

#[async_trait]
impl PlanProvider for DownProvider {
    fn name(&self) -> &str {
        "down_stub"
    }

    async fn generate(
        &self,
        _assessment: &Assessment,
    ) -> AppResult<(PlanStructure, GenerationMetadata)> {
        Err(AppError::provider_unavailable("stub endpoint is down"))
    }
}

/// Rich provider stub replaying a canned structure
struct CannedProvider {
    structure: PlanStructure,
}

#[async_trait]
impl PlanProvider for CannedProvider {
    fn name(&self) -> &str {
        "canned_stub"
    }

    async fn generate(
        &self,
        _assessment: &Assessment,
    ) -> AppResult<(PlanStructure, GenerationMetadata)> {
        Ok((
            self.structure.clone(),
            GenerationMetadata {
                model_used: "canned_stub".to_owned(),
                confidence_score: 0.9,
                generation_time_ms: 0,
                tokens_consumed: 42,
                prompt_version: "v2.1".to_owned(),
                safety_checks_passed: false,
            },
        ))
    }
}

async fn engine_without_rich() -> PlanEngine<SqliteStore> {
    PlanEngine::new(setup_store().await, PoseCatalog::builtin(), None)
}

async fn engine_with_rich(provider: Arc<dyn PlanProvider>) -> PlanEngine<SqliteStore> {
    PlanEngine::new(setup_store().await, PoseCatalog::builtin(), Some(provider))
}

fn approve_action() -> ReviewAction {
    ReviewAction {
        target: ApprovalStatus::Approved,
        reviewer_id: "instructor-7".to_owned(),
        notes: None,
        revision_reason: None,
        changes_requested: None,
    }
}

#[tokio::test]
async fn beginner_generation_end_to_end() {
    let engine = engine_without_rich().await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(engine.store(), &tenant).await;

    let plan = engine
        .generate_plan(&tenant, user_id, beginner_assessment())
        .await
        .unwrap();

    assert_eq!(plan.plan_structure.total_sessions, 12);
    assert_eq!(plan.plan_structure.weeks.len(), 4);
    assert_eq!(plan.plan_structure.difficulty_level.as_str(), "beginner");
    assert_eq!(plan.title, "beginner Yoga Plan");
    assert_eq!(plan.description, "Personalized 3x/week program");
    assert_eq!(plan.approval_workflow.status, ApprovalStatus::Pending);
    assert_eq!(plan.generation_metadata.model_used, "local_composer");
    assert!(plan.generation_metadata.safety_checks_passed);

    for week in &plan.plan_structure.weeks {
        for session in &week.sessions {
            let total = session.warm_up.duration_minutes
                + session.main_sequence.duration_minutes
                + session.cool_down.duration_minutes;
            assert!(total <= session.duration_minutes);
        }
    }

    // The assessed tier lands on the user record
    let user = engine
        .store()
        .get_user(&tenant, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.fitness_level.as_deref(), Some("beginner"));

    // And the plan is retrievable as the user's active plan
    let active = engine.get_active_plan(&tenant, user_id).await.unwrap();
    assert_eq!(active.id, plan.id);
}

#[tokio::test]
async fn invalid_assessment_is_a_validation_error() {
    let engine = engine_without_rich().await;
    let tenant = TenantId::new("studio-a");
    let mut assessment = beginner_assessment();
    assessment.session_duration = 0;

    let err = engine
        .generate_plan(&tenant, Uuid::new_v4(), assessment)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn second_generation_conflicts_until_the_first_is_rejected() {
    let engine = engine_without_rich().await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(engine.store(), &tenant).await;

    let first = engine
        .generate_plan(&tenant, user_id, beginner_assessment())
        .await
        .unwrap();

    let err = engine
        .generate_plan(&tenant, user_id, beginner_assessment())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ActivePlanExists);

    let mut reject = approve_action();
    reject.target = ApprovalStatus::Rejected;
    engine.review_plan(&tenant, first.id, &reject).await.unwrap();

    // Regeneration is allowed once the plan is terminal-inactive
    engine
        .generate_plan(&tenant, user_id, beginner_assessment())
        .await
        .unwrap();
}

#[tokio::test]
async fn limitations_require_the_rich_provider() {
    let engine = engine_without_rich().await;
    let tenant = TenantId::new("studio-a");
    let mut assessment = beginner_assessment();
    assessment.injuries_limitations = vec![wrist_limitation()];

    let err = engine
        .generate_plan(&tenant, Uuid::new_v4(), assessment)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ProviderUnavailable);
}

#[tokio::test]
async fn rich_provider_failure_surfaces_without_fallback() {
    let engine = engine_with_rich(Arc::new(DownProvider)).await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(engine.store(), &tenant).await;
    let mut assessment = beginner_assessment();
    assessment.injuries_limitations = vec![wrist_limitation()];

    let err = engine
        .generate_plan(&tenant, user_id, assessment)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ProviderUnavailable);

    // No partial plan was persisted
    let active = engine.get_active_plan(&tenant, user_id).await.unwrap_err();
    assert_eq!(active.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn contraindicated_rich_output_fails_the_safety_gate() {
    // Canned structure composed for the beginner tier, which includes
    // poses contraindicated for wrists (Cat-Cow, Downward-Facing Dog)
    let structure = composer::compose(&beginner_assessment(), &PoseCatalog::builtin());
    let engine = engine_with_rich(Arc::new(CannedProvider { structure })).await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(engine.store(), &tenant).await;
    let mut assessment = beginner_assessment();
    assessment.injuries_limitations = vec![wrist_limitation()];

    let err = engine
        .generate_plan(&tenant, user_id, assessment)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::SafetyViolation);
    assert!(err.message.contains("Cat-Cow"), "message: {}", err.message);

    let active = engine.get_active_plan(&tenant, user_id).await.unwrap_err();
    assert_eq!(active.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn review_approves_and_locks_the_plan() {
    let engine = engine_without_rich().await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(engine.store(), &tenant).await;
    let plan = engine
        .generate_plan(&tenant, user_id, beginner_assessment())
        .await
        .unwrap();

    let approved = engine
        .review_plan(&tenant, plan.id, &approve_action())
        .await
        .unwrap();
    assert_eq!(approved.approval_workflow.status, ApprovalStatus::Approved);
    assert!(approved.approval_workflow.approved_at.is_some());

    // Approved is terminal
    let err = engine
        .review_plan(&tenant, plan.id, &approve_action())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);

    // And the persisted record reflects the approval
    let loaded = engine.get_plan_by_id(&tenant, plan.id).await.unwrap();
    assert_eq!(loaded.approval_workflow.status, ApprovalStatus::Approved);
}

#[tokio::test]
async fn review_outside_the_tenant_is_not_found() {
    let engine = engine_without_rich().await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(engine.store(), &tenant).await;
    let plan = engine
        .generate_plan(&tenant, user_id, beginner_assessment())
        .await
        .unwrap();

    let err = engine
        .review_plan(&TenantId::new("studio-b"), plan.id, &approve_action())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn pending_listing_reflects_reviews() {
    let engine = engine_without_rich().await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(engine.store(), &tenant).await;
    let plan = engine
        .generate_plan(&tenant, user_id, beginner_assessment())
        .await
        .unwrap();

    let (pending, total) = engine.list_pending_plans(&tenant, 1, 10).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(pending[0].id, plan.id);

    engine
        .review_plan(&tenant, plan.id, &approve_action())
        .await
        .unwrap();

    let (pending, total) = engine.list_pending_plans(&tenant, 1, 10).await.unwrap();
    assert_eq!(total, 0);
    assert!(pending.is_empty());
}

#[tokio::test]
async fn out_of_range_session_numbers_are_invalid() {
    let engine = engine_without_rich().await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(engine.store(), &tenant).await;
    let plan = engine
        .generate_plan(&tenant, user_id, beginner_assessment())
        .await
        .unwrap();

    for session_number in [0, 13] {
        let err = engine
            .record_session_completion(&tenant, plan.id, user_id, session_number, 30)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSession);
    }

    // Nothing was recorded by the failed attempts
    let loaded = engine.get_plan_by_id(&tenant, plan.id).await.unwrap();
    assert_eq!(loaded.usage.sessions_completed, 0);
}

#[tokio::test]
async fn completions_accumulate_on_both_ledgers() {
    let engine = engine_without_rich().await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(engine.store(), &tenant).await;
    let plan = engine
        .generate_plan(&tenant, user_id, beginner_assessment())
        .await
        .unwrap();

    engine
        .record_session_completion(&tenant, plan.id, user_id, 1, 30)
        .await
        .unwrap();
    engine
        .record_session_completion(&tenant, plan.id, user_id, 2, 30)
        .await
        .unwrap();

    let loaded = engine.get_plan_by_id(&tenant, plan.id).await.unwrap();
    assert_eq!(loaded.usage.sessions_completed, 2);
    assert_eq!(loaded.usage.total_practice_time, 60);

    let user = engine
        .store()
        .get_user(&tenant, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.progress.sessions_completed, 2);
    assert_eq!(user.progress.total_minutes, 60);
}

#[tokio::test]
async fn completing_another_users_plan_is_not_found() {
    let engine = engine_without_rich().await;
    let tenant = TenantId::new("studio-a");
    let owner = create_user(engine.store(), &tenant).await;
    let intruder = create_user(engine.store(), &tenant).await;
    let plan = engine
        .generate_plan(&tenant, owner, beginner_assessment())
        .await
        .unwrap();

    let err = engine
        .record_session_completion(&tenant, plan.id, intruder, 1, 30)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}
