// ABOUTME: Integration tests for the SQLite store
// ABOUTME: Tenant scoping, active-plan exclusivity, pagination, ledger atomicity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, Utc};
use common::{composed_plan, create_user, setup_store};
use lotus_core::models::{ApprovalStatus, TenantId};
use lotus_plan_server::errors::ErrorCode;
use lotus_plan_server::store::PlanStore;
use uuid::Uuid;

#[tokio::test]
async fn user_roundtrip_is_tenant_scoped() {
    let store = setup_store().await;
    let tenant = TenantId::new("studio-a");
    let other = TenantId::new("studio-b");
    let user_id = create_user(&store, &tenant).await;

    let found = store.get_user(&tenant, user_id).await.unwrap();
    assert_eq!(found.unwrap().id, user_id);

    // Same id through another tenant is indistinguishable from absent
    assert!(store.get_user(&other, user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn second_active_plan_is_rejected_atomically() {
    let store = setup_store().await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(&store, &tenant).await;

    store
        .create_plan_if_no_active(&composed_plan(&tenant, user_id))
        .await
        .unwrap();

    let err = store
        .create_plan_if_no_active(&composed_plan(&tenant, user_id))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ActivePlanExists);
}

#[tokio::test]
async fn rejection_frees_the_user_for_a_new_plan() {
    let store = setup_store().await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(&store, &tenant).await;

    let first = composed_plan(&tenant, user_id);
    store.create_plan_if_no_active(&first).await.unwrap();

    let mut workflow = first.approval_workflow.clone();
    workflow.status = ApprovalStatus::Rejected;
    workflow.reviewed_by = Some("instructor-7".to_owned());
    store
        .update_workflow(&tenant, first.id, &workflow, Utc::now())
        .await
        .unwrap();

    assert!(store
        .find_active_plan(&tenant, user_id)
        .await
        .unwrap()
        .is_none());

    store
        .create_plan_if_no_active(&composed_plan(&tenant, user_id))
        .await
        .unwrap();
}

#[tokio::test]
async fn plan_roundtrip_preserves_the_document() {
    let store = setup_store().await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(&store, &tenant).await;

    let plan = composed_plan(&tenant, user_id);
    store.create_plan_if_no_active(&plan).await.unwrap();

    let loaded = store.get_plan(&tenant, plan.id).await.unwrap().unwrap();
    assert_eq!(loaded.id, plan.id);
    assert_eq!(loaded.user_id, user_id);
    assert_eq!(loaded.plan_structure, plan.plan_structure);
    assert_eq!(loaded.user_assessment.session_duration, 30);
    assert_eq!(loaded.generation_metadata, plan.generation_metadata);
    assert_eq!(loaded.approval_workflow.status, ApprovalStatus::Pending);

    // Cross-tenant lookup sees nothing
    let other = TenantId::new("studio-b");
    assert!(store.get_plan(&other, plan.id).await.unwrap().is_none());
}

#[tokio::test]
async fn update_workflow_outside_the_tenant_is_not_found() {
    let store = setup_store().await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(&store, &tenant).await;
    let plan = composed_plan(&tenant, user_id);
    store.create_plan_if_no_active(&plan).await.unwrap();

    let err = store
        .update_workflow(
            &TenantId::new("studio-b"),
            plan.id,
            &plan.approval_workflow,
            Utc::now(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn pending_list_paginates_newest_first() {
    let store = setup_store().await;
    let tenant = TenantId::new("studio-a");

    let mut newest_id = Uuid::nil();
    for i in 0..3_i64 {
        let user_id = create_user(&store, &tenant).await;
        let mut plan = composed_plan(&tenant, user_id);
        // Deterministic ordering without sleeping
        plan.created_at = Utc::now() + Duration::seconds(i);
        newest_id = plan.id;
        store.create_plan_if_no_active(&plan).await.unwrap();
    }
    // A different tenant's pending plan never leaks in
    let other = TenantId::new("studio-b");
    let other_user = create_user(&store, &other).await;
    store
        .create_plan_if_no_active(&composed_plan(&other, other_user))
        .await
        .unwrap();

    let (page_one, total) = store.list_pending(&tenant, 1, 2).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(page_one.len(), 2);
    assert_eq!(page_one[0].id, newest_id);

    let (page_two, total) = store.list_pending(&tenant, 2, 2).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(page_two.len(), 1);
}

#[tokio::test]
async fn session_completion_updates_both_ledgers() {
    let store = setup_store().await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(&store, &tenant).await;
    let plan = composed_plan(&tenant, user_id);
    store.create_plan_if_no_active(&plan).await.unwrap();

    let day_one = Utc::now();
    let day_two = day_one + Duration::days(1);
    store
        .record_session_completion(&tenant, plan.id, user_id, 30, day_one)
        .await
        .unwrap();
    store
        .record_session_completion(&tenant, plan.id, user_id, 30, day_two)
        .await
        .unwrap();

    let loaded = store.get_plan(&tenant, plan.id).await.unwrap().unwrap();
    assert_eq!(loaded.usage.sessions_completed, 2);
    assert_eq!(loaded.usage.total_practice_time, 60);
    assert!(loaded.usage.last_session_date.is_some());
    let expected_rate = 2.0 / f64::from(plan.plan_structure.total_sessions);
    assert!((loaded.usage.completion_rate - expected_rate).abs() < 1e-9);

    let user = store.get_user(&tenant, user_id).await.unwrap().unwrap();
    assert_eq!(user.progress.sessions_completed, 2);
    assert_eq!(user.progress.total_minutes, 60);
    assert_eq!(user.progress.current_streak, 2);
    assert_eq!(user.progress.longest_streak, 2);
    assert_eq!(user.progress.achievements.len(), 1);
    assert_eq!(user.progress.achievements[0].name, "First Practice");
}

#[tokio::test]
async fn completion_against_a_missing_plan_is_not_found() {
    let store = setup_store().await;
    let tenant = TenantId::new("studio-a");
    let user_id = create_user(&store, &tenant).await;

    let err = store
        .record_session_completion(&tenant, Uuid::new_v4(), user_id, 30, Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    // Nothing half-applied to the user ledger
    let user = store.get_user(&tenant, user_id).await.unwrap().unwrap();
    assert_eq!(user.progress.sessions_completed, 0);
}
