// ABOUTME: Core domain models for the Lotus plan generation platform
// ABOUTME: Shared types consumed by the engine, store, and provider layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

//! # Lotus Core
//!
//! Domain model crate for the Lotus plan generation platform. Holds the
//! tenant-scoped aggregate types (plans, assessments, workflows, progress
//! ledgers) shared by the engine and its store implementations.
//!
//! Serialized field names preserve the persisted JSON document shape of the
//! pre-existing client API: aggregate-level fields are camelCase (including
//! the Mongo-era `_id`), nested structures are snake_case.

/// Domain data models
pub mod models;

pub use models::TenantId;
