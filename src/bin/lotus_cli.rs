// ABOUTME: Command-line front end for the plan engine
// ABOUTME: Thin clap wrapper: parse args, build the engine, print JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use lotus_core::models::{ApprovalStatus, Assessment, TenantId, User, UserProgress};
use lotus_plan_server::catalog::PoseCatalog;
use lotus_plan_server::config::ServerConfig;
use lotus_plan_server::providers::{HttpModelClient, PlanProvider, RichPlanProvider};
use lotus_plan_server::store::{PlanStore, SqliteStore};
use lotus_plan_server::workflow::ReviewAction;
use lotus_plan_server::{logging, PlanEngine};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "lotus-cli", about = "Yoga plan generation and review", version)]
struct Cli {
    /// Tenant all operations are scoped to
    #[arg(long, global = true, default_value = "default")]
    tenant: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a member record
    CreateUser {
        /// Display name
        #[arg(long)]
        name: String,
        /// Contact email, unique within the tenant
        #[arg(long)]
        email: String,
    },
    /// Generate a plan from an assessment JSON file
    Generate {
        /// Member id
        #[arg(long)]
        user: Uuid,
        /// Path to the assessment JSON document
        #[arg(long)]
        assessment: PathBuf,
    },
    /// Show one plan by id
    Show {
        /// Plan id
        plan: Uuid,
    },
    /// List plans pending review
    Pending {
        /// 1-based page
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
    /// Apply a reviewer decision to a plan
    Review {
        /// Plan id
        plan: Uuid,
        /// Target status: approved, rejected, or revision_requested
        #[arg(long)]
        status: String,
        /// Reviewer identifier
        #[arg(long)]
        reviewer: String,
        /// Review notes
        #[arg(long)]
        notes: Option<String>,
        /// Reason, when requesting a revision
        #[arg(long)]
        reason: Option<String>,
        /// Concrete changes requested, when requesting a revision
        #[arg(long)]
        changes: Option<String>,
    },
    /// Record a completed practice session
    CompleteSession {
        /// Plan id
        plan: Uuid,
        /// Member id
        #[arg(long)]
        user: Uuid,
        /// 1-based session number within the plan
        #[arg(long)]
        session: u32,
        /// Session length in minutes
        #[arg(long)]
        minutes: u32,
    },
}

fn build_rich_provider(config: &ServerConfig) -> Result<Option<Arc<dyn PlanProvider>>> {
    let Some(model) = &config.model else {
        return Ok(None);
    };
    let client = HttpModelClient::new(
        model.api_url.clone(),
        model.api_key.clone(),
        model.model.clone(),
        config.provider_timeout,
    )
    .context("Failed to build model client")?;
    Ok(Some(Arc::new(RichPlanProvider::new(Arc::new(client)))))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    logging::init(config.log_format);

    let store = SqliteStore::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    store.migrate().await.context("Failed to run migrations")?;

    let rich = build_rich_provider(&config)?;
    let engine = PlanEngine::new(store, PoseCatalog::builtin(), rich);
    let tenant = TenantId::new(cli.tenant);

    match cli.command {
        Command::CreateUser { name, email } => {
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4(),
                tenant_id: tenant.clone(),
                name,
                email,
                fitness_level: None,
                progress: UserProgress::default(),
                created_at: now,
                updated_at: now,
            };
            engine.store().create_user(&user).await?;
            print_json(&user)?;
        }
        Command::Generate { user, assessment } => {
            let raw = std::fs::read_to_string(&assessment)
                .with_context(|| format!("Failed to read {}", assessment.display()))?;
            let assessment: Assessment =
                serde_json::from_str(&raw).context("Invalid assessment document")?;
            let plan = engine.generate_plan(&tenant, user, assessment).await?;
            print_json(&plan)?;
        }
        Command::Show { plan } => {
            let plan = engine.get_plan_by_id(&tenant, plan).await?;
            print_json(&plan)?;
        }
        Command::Pending { page, page_size } => {
            let (plans, total) = engine.list_pending_plans(&tenant, page, page_size).await?;
            print_json(&serde_json::json!({ "plans": plans, "total": total, "page": page }))?;
        }
        Command::Review {
            plan,
            status,
            reviewer,
            notes,
            reason,
            changes,
        } => {
            let target = ApprovalStatus::parse(&status)
                .with_context(|| format!("Unknown status '{status}'"))?;
            let action = ReviewAction {
                target,
                reviewer_id: reviewer,
                notes,
                revision_reason: reason,
                changes_requested: changes,
            };
            let plan = engine.review_plan(&tenant, plan, &action).await?;
            print_json(&plan)?;
        }
        Command::CompleteSession {
            plan,
            user,
            session,
            minutes,
        } => {
            engine
                .record_session_completion(&tenant, plan, user, session, minutes)
                .await?;
            let updated = engine.get_plan_by_id(&tenant, plan).await?;
            print_json(&updated)?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
