// ABOUTME: SQLite implementation of the PlanStore capability over sqlx
// ABOUTME: Status and ledger fields as indexed columns, documents as JSON text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lotus_core::models::{
    ApprovalStatus, ApprovalWorkflow, Plan, PlanUsage, TenantId, User, UserProgress,
};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::PlanStore;
use crate::errors::{AppError, AppResult};
use crate::ledger;

/// SQLite-backed plan store.
///
/// Tenancy, workflow status, and ledger counters live in real columns so
/// the hot queries stay indexed; the structured documents (plan
/// structure, frozen assessment, generation metadata, workflow record)
/// are stored as JSON text.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap an existing pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a database URL.
    ///
    /// In-memory databases are pinned to a single connection, since each
    /// SQLite memory connection is otherwise its own database.
    ///
    /// # Errors
    ///
    /// Returns a database error if the connection cannot be established.
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;
        Ok(Self::new(pool))
    }

    /// The underlying pool, for test setup
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn parse_datetime(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid timestamp in database: {e}")))
}

fn parse_optional_datetime(value: Option<String>) -> AppResult<Option<DateTime<Utc>>> {
    value.as_deref().map(parse_datetime).transpose()
}

fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| AppError::database(format!("Invalid UUID in database: {e}")))
}

fn map_plan_row(row: &SqliteRow) -> AppResult<Plan> {
    let id: String = row.try_get("id")?;
    let tenant_id: String = row.try_get("tenant_id")?;
    let user_id: String = row.try_get("user_id")?;
    let plan_structure: String = row.try_get("plan_structure")?;
    let user_assessment: String = row.try_get("user_assessment")?;
    let generation_metadata: String = row.try_get("generation_metadata")?;
    let approval_workflow: String = row.try_get("approval_workflow")?;
    let last_session_date: Option<String> = row.try_get("last_session_date")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Plan {
        id: parse_uuid(&id)?,
        tenant_id: TenantId::new(tenant_id),
        user_id: parse_uuid(&user_id)?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        plan_structure: serde_json::from_str(&plan_structure)
            .map_err(|e| AppError::database(format!("Corrupt plan structure document: {e}")))?,
        user_assessment: serde_json::from_str(&user_assessment)
            .map_err(|e| AppError::database(format!("Corrupt assessment document: {e}")))?,
        generation_metadata: serde_json::from_str(&generation_metadata)
            .map_err(|e| AppError::database(format!("Corrupt metadata document: {e}")))?,
        approval_workflow: serde_json::from_str(&approval_workflow)
            .map_err(|e| AppError::database(format!("Corrupt workflow document: {e}")))?,
        usage: PlanUsage {
            sessions_completed: row.try_get::<i64, _>("sessions_completed")? as u32,
            total_practice_time: row.try_get::<i64, _>("total_practice_time")? as u32,
            last_session_date: parse_optional_datetime(last_session_date)?,
            completion_rate: row.try_get("completion_rate")?,
        },
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

fn map_user_row(row: &SqliteRow) -> AppResult<User> {
    let id: String = row.try_get("id")?;
    let tenant_id: String = row.try_get("tenant_id")?;
    let achievements: String = row.try_get("achievements")?;
    let last_session_date: Option<String> = row.try_get("last_session_date")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(User {
        id: parse_uuid(&id)?,
        tenant_id: TenantId::new(tenant_id),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        fitness_level: row.try_get("fitness_level")?,
        progress: UserProgress {
            sessions_completed: row.try_get::<i64, _>("sessions_completed")? as u32,
            total_minutes: row.try_get::<i64, _>("total_minutes")? as u32,
            current_streak: row.try_get::<i64, _>("current_streak")? as u32,
            longest_streak: row.try_get::<i64, _>("longest_streak")? as u32,
            last_session_date: parse_optional_datetime(last_session_date)?,
            achievements: serde_json::from_str(&achievements)
                .map_err(|e| AppError::database(format!("Corrupt achievements document: {e}")))?,
        },
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

#[async_trait]
impl PlanStore for SqliteStore {
    async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                fitness_level TEXT,
                sessions_completed INTEGER NOT NULL DEFAULT 0,
                total_minutes INTEGER NOT NULL DEFAULT 0,
                current_streak INTEGER NOT NULL DEFAULT 0,
                longest_streak INTEGER NOT NULL DEFAULT 0,
                last_session_date TEXT,
                achievements TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create users table: {e}")))?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_tenant_email
             ON users (tenant_id, email)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to index users: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS plans (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                approval_workflow TEXT NOT NULL,
                plan_structure TEXT NOT NULL,
                user_assessment TEXT NOT NULL,
                generation_metadata TEXT NOT NULL,
                total_sessions INTEGER NOT NULL,
                sessions_completed INTEGER NOT NULL DEFAULT 0,
                total_practice_time INTEGER NOT NULL DEFAULT 0,
                last_session_date TEXT,
                completion_rate REAL NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create plans table: {e}")))?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_plans_tenant_user ON plans (tenant_id, user_id)",
            "CREATE INDEX IF NOT EXISTS idx_plans_tenant_status ON plans (tenant_id, status)",
            "CREATE INDEX IF NOT EXISTS idx_plans_tenant_created ON plans (tenant_id, created_at)",
        ] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to index plans: {e}")))?;
        }

        Ok(())
    }

    async fn create_user(&self, user: &User) -> AppResult<()> {
        let achievements = serde_json::to_string(&user.progress.achievements)?;
        sqlx::query(
            r"
            INSERT INTO users (
                id, tenant_id, name, email, fitness_level,
                sessions_completed, total_minutes, current_streak, longest_streak,
                last_session_date, achievements, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(user.id.to_string())
        .bind(user.tenant_id.as_str())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.fitness_level)
        .bind(i64::from(user.progress.sessions_completed))
        .bind(i64::from(user.progress.total_minutes))
        .bind(i64::from(user.progress.current_streak))
        .bind(i64::from(user.progress.longest_streak))
        .bind(user.progress.last_session_date.map(|d| d.to_rfc3339()))
        .bind(&achievements)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create user: {e}")))?;
        Ok(())
    }

    async fn get_user(&self, tenant_id: &TenantId, user_id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id.as_str())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;
        row.as_ref().map(map_user_row).transpose()
    }

    async fn update_user_fitness_level(
        &self,
        tenant_id: &TenantId,
        user_id: Uuid,
        fitness_level: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET fitness_level = $1, updated_at = $2
             WHERE tenant_id = $3 AND id = $4",
        )
        .bind(fitness_level)
        .bind(Utc::now().to_rfc3339())
        .bind(tenant_id.as_str())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update fitness level: {e}")))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }

    async fn create_plan_if_no_active(&self, plan: &Plan) -> AppResult<()> {
        let structure = serde_json::to_string(&plan.plan_structure)?;
        let assessment = serde_json::to_string(&plan.user_assessment)?;
        let metadata = serde_json::to_string(&plan.generation_metadata)?;
        let workflow = serde_json::to_string(&plan.approval_workflow)?;

        // Single conditional insert: the active-plan existence check and
        // the insert cannot interleave with a concurrent request.
        let result = sqlx::query(
            r"
            INSERT INTO plans (
                id, tenant_id, user_id, title, description, status,
                approval_workflow, plan_structure, user_assessment, generation_metadata,
                total_sessions, sessions_completed, total_practice_time,
                last_session_date, completion_rate, created_at, updated_at
            )
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 0, 0, NULL, 0, $12, $13
            WHERE NOT EXISTS (
                SELECT 1 FROM plans
                WHERE tenant_id = $2 AND user_id = $3 AND status IN ('pending', 'approved')
            )
            ",
        )
        .bind(plan.id.to_string())
        .bind(plan.tenant_id.as_str())
        .bind(plan.user_id.to_string())
        .bind(&plan.title)
        .bind(&plan.description)
        .bind(plan.approval_workflow.status.as_str())
        .bind(&workflow)
        .bind(&structure)
        .bind(&assessment)
        .bind(&metadata)
        .bind(i64::from(plan.plan_structure.total_sessions))
        .bind(plan.created_at.to_rfc3339())
        .bind(plan.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create plan: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::active_plan_exists(
                "User already has an active plan",
            ));
        }
        Ok(())
    }

    async fn find_active_plan(
        &self,
        tenant_id: &TenantId,
        user_id: Uuid,
    ) -> AppResult<Option<Plan>> {
        let row = sqlx::query(
            r"
            SELECT * FROM plans
            WHERE tenant_id = $1 AND user_id = $2 AND status IN ('pending', 'approved')
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(tenant_id.as_str())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find active plan: {e}")))?;
        row.as_ref().map(map_plan_row).transpose()
    }

    async fn get_plan(&self, tenant_id: &TenantId, plan_id: Uuid) -> AppResult<Option<Plan>> {
        let row = sqlx::query("SELECT * FROM plans WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id.as_str())
            .bind(plan_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get plan: {e}")))?;
        row.as_ref().map(map_plan_row).transpose()
    }

    async fn update_workflow(
        &self,
        tenant_id: &TenantId,
        plan_id: Uuid,
        workflow: &ApprovalWorkflow,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let document = serde_json::to_string(workflow)?;
        let result = sqlx::query(
            "UPDATE plans SET status = $1, approval_workflow = $2, updated_at = $3
             WHERE tenant_id = $4 AND id = $5",
        )
        .bind(workflow.status.as_str())
        .bind(&document)
        .bind(updated_at.to_rfc3339())
        .bind(tenant_id.as_str())
        .bind(plan_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update workflow: {e}")))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Plan"));
        }
        Ok(())
    }

    async fn list_pending(
        &self,
        tenant_id: &TenantId,
        page: u32,
        page_size: u32,
    ) -> AppResult<(Vec<Plan>, u64)> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);
        let offset = i64::from(page - 1) * i64::from(page_size);

        let rows = sqlx::query(
            r"
            SELECT * FROM plans
            WHERE tenant_id = $1 AND status = $2
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(tenant_id.as_str())
        .bind(ApprovalStatus::Pending.as_str())
        .bind(i64::from(page_size))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list pending plans: {e}")))?;

        let plans = rows
            .iter()
            .map(map_plan_row)
            .collect::<AppResult<Vec<_>>>()?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM plans WHERE tenant_id = $1 AND status = $2")
                .bind(tenant_id.as_str())
                .bind(ApprovalStatus::Pending.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to count pending plans: {e}")))?;

        Ok((plans, total as u64))
    }

    async fn record_session_completion(
        &self,
        tenant_id: &TenantId,
        plan_id: Uuid,
        user_id: Uuid,
        duration_minutes: u32,
        completed_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let plan_row = sqlx::query(
            r"
            SELECT sessions_completed, total_practice_time, last_session_date,
                   completion_rate, total_sessions
            FROM plans WHERE tenant_id = $1 AND id = $2
            ",
        )
        .bind(tenant_id.as_str())
        .bind(plan_id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to read plan usage: {e}")))?
        .ok_or_else(|| AppError::not_found("Plan"))?;

        let last_session: Option<String> = plan_row.try_get("last_session_date")?;
        let mut usage = PlanUsage {
            sessions_completed: plan_row.try_get::<i64, _>("sessions_completed")? as u32,
            total_practice_time: plan_row.try_get::<i64, _>("total_practice_time")? as u32,
            last_session_date: parse_optional_datetime(last_session)?,
            completion_rate: plan_row.try_get("completion_rate")?,
        };
        let total_sessions = plan_row.try_get::<i64, _>("total_sessions")? as u32;
        ledger::apply_plan_usage(&mut usage, duration_minutes, total_sessions, completed_at);

        sqlx::query(
            r"
            UPDATE plans
            SET sessions_completed = $1, total_practice_time = $2,
                last_session_date = $3, completion_rate = $4, updated_at = $5
            WHERE tenant_id = $6 AND id = $7
            ",
        )
        .bind(i64::from(usage.sessions_completed))
        .bind(i64::from(usage.total_practice_time))
        .bind(completed_at.to_rfc3339())
        .bind(usage.completion_rate)
        .bind(completed_at.to_rfc3339())
        .bind(tenant_id.as_str())
        .bind(plan_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update plan usage: {e}")))?;

        let user_row = sqlx::query(
            r"
            SELECT sessions_completed, total_minutes, current_streak, longest_streak,
                   last_session_date, achievements
            FROM users WHERE tenant_id = $1 AND id = $2
            ",
        )
        .bind(tenant_id.as_str())
        .bind(user_id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to read user progress: {e}")))?
        .ok_or_else(|| AppError::not_found("User"))?;

        let last_session: Option<String> = user_row.try_get("last_session_date")?;
        let achievements: String = user_row.try_get("achievements")?;
        let mut progress = UserProgress {
            sessions_completed: user_row.try_get::<i64, _>("sessions_completed")? as u32,
            total_minutes: user_row.try_get::<i64, _>("total_minutes")? as u32,
            current_streak: user_row.try_get::<i64, _>("current_streak")? as u32,
            longest_streak: user_row.try_get::<i64, _>("longest_streak")? as u32,
            last_session_date: parse_optional_datetime(last_session)?,
            achievements: serde_json::from_str(&achievements)
                .map_err(|e| AppError::database(format!("Corrupt achievements document: {e}")))?,
        };
        ledger::apply_user_progress(&mut progress, duration_minutes, completed_at);
        let achievements = serde_json::to_string(&progress.achievements)?;

        sqlx::query(
            r"
            UPDATE users
            SET sessions_completed = $1, total_minutes = $2, current_streak = $3,
                longest_streak = $4, last_session_date = $5, achievements = $6, updated_at = $7
            WHERE tenant_id = $8 AND id = $9
            ",
        )
        .bind(i64::from(progress.sessions_completed))
        .bind(i64::from(progress.total_minutes))
        .bind(i64::from(progress.current_streak))
        .bind(i64::from(progress.longest_streak))
        .bind(completed_at.to_rfc3339())
        .bind(&achievements)
        .bind(completed_at.to_rfc3339())
        .bind(tenant_id.as_str())
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update user progress: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit completion: {e}")))?;
        Ok(())
    }
}
