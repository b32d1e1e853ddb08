// ABOUTME: Plan engine orchestrating generation, review, and completion flows
// ABOUTME: Owns the provider policy, the safety gate, and the exclusivity check
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

//! # Plan Engine
//!
//! The engine is the only entry point callers use; it composes the
//! providers, the safety validator, the workflow state machine, and the
//! injected [`PlanStore`]. Generation never persists an unsafe or
//! partial plan: the safety gate runs on every provider's output, and
//! the active-plan exclusivity check is atomic at the store.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use lotus_core::models::{Assessment, Plan, PlanUsage, TenantId};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::PoseCatalog;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::providers::{LocalComposer, PlanProvider, ProviderChoice};
use crate::safety;
use crate::store::PlanStore;
use crate::workflow::{self, ReviewAction};

/// Orchestrator for the plan lifecycle.
///
/// Holds the store capability, the local composer, and an optional rich
/// provider. When the selection policy picks the rich path and none is
/// configured, generation fails with `ProviderUnavailable` rather than
/// silently downgrading to the local composer.
pub struct PlanEngine<S: PlanStore> {
    store: S,
    local: LocalComposer,
    rich: Option<Arc<dyn PlanProvider>>,
}

impl<S: PlanStore> PlanEngine<S> {
    /// Build an engine over a store, a pose catalog, and an optional rich
    /// provider
    #[must_use]
    pub fn new(store: S, catalog: PoseCatalog, rich: Option<Arc<dyn PlanProvider>>) -> Self {
        Self {
            store,
            local: LocalComposer::new(catalog),
            rich,
        }
    }

    /// The underlying store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Generate, safety-check, and persist a new plan for a user.
    ///
    /// The assessment is frozen into the plan document exactly as
    /// submitted. At most one pending-or-approved plan may exist per
    /// (tenant, user); the store enforces this atomically.
    ///
    /// # Errors
    ///
    /// - `ValidationError` when the assessment is structurally invalid
    /// - `ProviderUnavailable` when the selected provider fails or the
    ///   rich path is required but not configured
    /// - `SafetyViolation` when the generated plan contains a pose
    ///   contraindicated for a stated limitation
    /// - `ActivePlanExists` when the user already has an active plan
    pub async fn generate_plan(
        &self,
        tenant_id: &TenantId,
        user_id: Uuid,
        assessment: Assessment,
    ) -> AppResult<Plan> {
        if let Err(reason) = assessment.validate() {
            return Err(AppError::invalid_input(reason));
        }

        let choice = crate::providers::select_provider(&assessment);
        let provider: &dyn PlanProvider = match choice {
            ProviderChoice::Local => &self.local,
            ProviderChoice::Rich => self
                .rich
                .as_deref()
                .ok_or_else(|| {
                    AppError::provider_unavailable(
                        "This assessment requires the rich generation provider, \
                         but none is configured",
                    )
                })?,
        };

        debug!(
            tenant = %tenant_id,
            user = %user_id,
            provider = provider.name(),
            "Generating plan"
        );

        let started = Instant::now();
        let (structure, mut metadata) = provider.generate(&assessment).await?;
        metadata.generation_time_ms =
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if let Err(finding) = safety::check(&structure, &assessment) {
            warn!(
                tenant = %tenant_id,
                user = %user_id,
                provider = provider.name(),
                pose = %finding.pose_name,
                limitation = %finding.limitation_type,
                week = finding.week_number,
                session = finding.session_number,
                "Generated plan failed safety validation"
            );
            return Err(AppError::safety_violation(format!(
                "Pose '{}' is contraindicated for the stated limitation '{}'",
                finding.pose_name, finding.limitation_type
            )));
        }
        metadata.safety_checks_passed = true;

        let now = Utc::now();
        let plan = Plan {
            id: Uuid::new_v4(),
            tenant_id: tenant_id.clone(),
            user_id,
            title: format!("{} Yoga Plan", assessment.experience_level.as_str()),
            description: format!(
                "Personalized {}x/week program",
                assessment.sessions_per_week
            ),
            plan_structure: structure,
            user_assessment: assessment,
            generation_metadata: metadata,
            approval_workflow: lotus_core::models::ApprovalWorkflow::default(),
            usage: PlanUsage::default(),
            created_at: now,
            updated_at: now,
        };

        self.store.create_plan_if_no_active(&plan).await?;

        // Best effort: the assessed tier becomes the user's fitness level,
        // but a missing user record must not unwind an already persisted
        // plan.
        let tier = plan.user_assessment.experience_level.as_str();
        match self
            .store
            .update_user_fitness_level(tenant_id, user_id, tier)
            .await
        {
            Ok(()) => {}
            Err(e) if e.code == ErrorCode::NotFound => {
                debug!(tenant = %tenant_id, user = %user_id, "No user record to update");
            }
            Err(e) => return Err(e),
        }

        info!(
            tenant = %tenant_id,
            user = %user_id,
            plan = %plan.id,
            provider = %plan.generation_metadata.model_used,
            latency_ms = plan.generation_metadata.generation_time_ms,
            "Plan generated"
        );
        Ok(plan)
    }

    /// The user's current pending-or-approved plan.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the user has no active plan in this tenant.
    pub async fn get_active_plan(&self, tenant_id: &TenantId, user_id: Uuid) -> AppResult<Plan> {
        self.store
            .find_active_plan(tenant_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Active plan"))
    }

    /// Fetch one plan by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the plan does not exist in this tenant.
    pub async fn get_plan_by_id(&self, tenant_id: &TenantId, plan_id: Uuid) -> AppResult<Plan> {
        self.store
            .get_plan(tenant_id, plan_id)
            .await?
            .ok_or_else(|| AppError::not_found("Plan"))
    }

    /// Apply a reviewer decision to a plan's approval workflow.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the plan does not exist in this tenant and
    /// `InvalidTransition` when the workflow state machine disallows the
    /// move; in that case nothing is persisted.
    pub async fn review_plan(
        &self,
        tenant_id: &TenantId,
        plan_id: Uuid,
        action: &ReviewAction,
    ) -> AppResult<Plan> {
        let mut plan = self.get_plan_by_id(tenant_id, plan_id).await?;
        let now = Utc::now();
        workflow::apply_review(&mut plan.approval_workflow, action, now)?;
        plan.updated_at = now;

        self.store
            .update_workflow(tenant_id, plan_id, &plan.approval_workflow, now)
            .await?;

        info!(
            tenant = %tenant_id,
            plan = %plan_id,
            reviewer = %action.reviewer_id,
            status = plan.approval_workflow.status.as_str(),
            "Plan reviewed"
        );
        Ok(plan)
    }

    /// Pending plans awaiting review, newest first. `page` is 1-based;
    /// returns the page and the total pending count.
    ///
    /// # Errors
    ///
    /// Returns a database error when the store query fails.
    pub async fn list_pending_plans(
        &self,
        tenant_id: &TenantId,
        page: u32,
        page_size: u32,
    ) -> AppResult<(Vec<Plan>, u64)> {
        self.store.list_pending(tenant_id, page, page_size).await
    }

    /// Record a completed practice session against a plan.
    ///
    /// Updates the plan's usage ledger and the user's progress ledger
    /// atomically, including streak and milestone bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the plan does not exist in this tenant or
    /// belongs to a different user, and `InvalidSession` when
    /// `session_number` falls outside the plan's `1..=total_sessions`
    /// range.
    pub async fn record_session_completion(
        &self,
        tenant_id: &TenantId,
        plan_id: Uuid,
        user_id: Uuid,
        session_number: u32,
        duration_minutes: u32,
    ) -> AppResult<()> {
        let plan = self.get_plan_by_id(tenant_id, plan_id).await?;
        if plan.user_id != user_id {
            return Err(AppError::not_found("Plan"));
        }

        let total = plan.plan_structure.total_sessions;
        if session_number == 0 || session_number > total {
            return Err(AppError::invalid_session(format!(
                "Session number must be between 1 and {total}"
            )));
        }

        let completed_at = Utc::now();
        self.store
            .record_session_completion(tenant_id, plan_id, user_id, duration_minutes, completed_at)
            .await?;

        info!(
            tenant = %tenant_id,
            user = %user_id,
            plan = %plan_id,
            session = session_number,
            minutes = duration_minutes,
            "Session completion recorded"
        );
        Ok(())
    }
}
