// ABOUTME: Store capability trait for tenant-scoped plan and user persistence
// ABOUTME: Defines the two transactional operations the engine's invariants need
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

//! # Plan Store
//!
//! The engine performs no I/O of its own; persistence is an injected
//! [`PlanStore`] capability. All operations are scoped by tenant, and
//! lookups filter by tenant before id so "wrong tenant" and "truly
//! absent" are indistinguishable to the caller.
//!
//! Two operations carry the engine's transactional invariants:
//!
//! - [`PlanStore::create_plan_if_no_active`]: the active-plan existence
//!   check and the insert are atomic per (tenant, user), so two racing
//!   generation requests cannot both succeed.
//! - [`PlanStore::record_session_completion`]: the plan-side and
//!   user-side ledger updates apply together or not at all.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lotus_core::models::{ApprovalWorkflow, Plan, TenantId, User};
use uuid::Uuid;

use crate::errors::AppResult;

/// SQLite store implementation
pub mod sqlite;

pub use sqlite::SqliteStore;

/// Tenant-scoped persistence capability for plans and users
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Set up the schema
    async fn migrate(&self) -> AppResult<()>;

    /// Create a user record
    async fn create_user(&self, user: &User) -> AppResult<()>;

    /// Get a user by id within a tenant
    async fn get_user(&self, tenant_id: &TenantId, user_id: Uuid) -> AppResult<Option<User>>;

    /// Update a user's assessed fitness level
    async fn update_user_fitness_level(
        &self,
        tenant_id: &TenantId,
        user_id: Uuid,
        fitness_level: &str,
    ) -> AppResult<()>;

    /// Insert a new plan, atomically failing with `ActivePlanExists` if
    /// the user already has a plan in a non-terminal status.
    async fn create_plan_if_no_active(&self, plan: &Plan) -> AppResult<()>;

    /// The user's most recent pending-or-approved plan, if any
    async fn find_active_plan(
        &self,
        tenant_id: &TenantId,
        user_id: Uuid,
    ) -> AppResult<Option<Plan>>;

    /// Get a plan by id within a tenant
    async fn get_plan(&self, tenant_id: &TenantId, plan_id: Uuid) -> AppResult<Option<Plan>>;

    /// Persist a reviewed workflow record, bumping the plan's
    /// `updated_at`. Returns `NotFound` if the plan is outside the
    /// tenant's scope.
    async fn update_workflow(
        &self,
        tenant_id: &TenantId,
        plan_id: Uuid,
        workflow: &ApprovalWorkflow,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Pending plans for review, newest first, with the total count.
    /// `page` is 1-based.
    async fn list_pending(
        &self,
        tenant_id: &TenantId,
        page: u32,
        page_size: u32,
    ) -> AppResult<(Vec<Plan>, u64)>;

    /// Apply a completed session to both the plan's usage ledger and the
    /// user's progress ledger in one transaction.
    async fn record_session_completion(
        &self,
        tenant_id: &TenantId,
        plan_id: Uuid,
        user_id: Uuid,
        duration_minutes: u32,
        completed_at: DateTime<Utc>,
    ) -> AppResult<()>;
}
