// ABOUTME: Multi-tenant yoga plan generation and safety validation engine
// ABOUTME: Library root wiring the catalog, composer, providers, store, and engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

//! # Lotus Plan Server
//!
//! Plan generation and safety validation engine for multi-tenant yoga
//! studios. Given a member's intake assessment, the engine produces a
//! structured multi-week practice program, validates every pose against
//! the member's stated limitations, and manages the plan's approval
//! lifecycle and usage ledgers.
//!
//! The [`engine::PlanEngine`] is the public entry point; persistence is
//! an injected [`store::PlanStore`] capability and generation strategies
//! live behind [`providers::PlanProvider`].

/// Built-in pose catalog grouped by experience tier
pub mod catalog;
/// Deterministic plan composer
pub mod composer;
/// Environment-driven configuration
pub mod config;
/// Orchestration of generation, review, and completion flows
pub mod engine;
/// Error taxonomy and result alias
pub mod errors;
/// Usage and progress ledger arithmetic
pub mod ledger;
/// Structured logging setup
pub mod logging;
/// Plan generation providers and selection policy
pub mod providers;
/// Safety validation of plans against stated limitations
pub mod safety;
/// Persistence capability and the SQLite implementation
pub mod store;
/// Approval workflow state machine
pub mod workflow;

pub use engine::PlanEngine;
pub use errors::{AppError, AppResult, ErrorCode};
