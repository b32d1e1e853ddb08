// ABOUTME: Unified error handling with typed error codes for the engine
// ABOUTME: AppError/AppResult plus HTTP status mapping for the boundary layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

//! # Error Handling
//!
//! Errors are local, typed outcomes rather than crashes. Each [`AppError`]
//! carries an [`ErrorCode`] from the engine taxonomy so the thin boundary
//! layer can map outcomes to wire responses without string matching. Only
//! unexpected store-layer faults should propagate as fatal.

use serde::Serialize;
use thiserror::Error;

/// Result alias used throughout the engine
pub type AppResult<T> = Result<T, AppError>;

/// Engine error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed or missing required input; caller's fault, no retry
    ValidationError,
    /// The user already has a pending or approved plan
    ActivePlanExists,
    /// Rich generation provider failed or timed out; retryable
    ProviderUnavailable,
    /// The generated content itself is defective; never silently repaired
    SafetyViolation,
    /// Entity absent or outside the caller's tenant scope
    NotFound,
    /// Reviewer supplied an out-of-domain or disallowed status transition
    InvalidTransition,
    /// Session number does not exist in the plan
    InvalidSession,
    /// Store-layer fault
    DatabaseError,
    /// Unexpected internal fault
    InternalError,
}

impl ErrorCode {
    /// Stable snake_case code for wire responses
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::ActivePlanExists => "active_plan_exists",
            Self::ProviderUnavailable => "provider_unavailable",
            Self::SafetyViolation => "safety_violation",
            Self::NotFound => "not_found",
            Self::InvalidTransition => "invalid_transition",
            Self::InvalidSession => "invalid_session",
            Self::DatabaseError => "database_error",
            Self::InternalError => "internal_error",
        }
    }

    /// HTTP status the boundary layer should answer with
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::ValidationError => 400,
            Self::ActivePlanExists => 409,
            Self::ProviderUnavailable => 503,
            Self::SafetyViolation => 422,
            Self::NotFound => 404,
            Self::InvalidTransition | Self::InvalidSession => 400,
            Self::DatabaseError | Self::InternalError => 500,
        }
    }
}

/// Application error with a typed code and a caller-safe message
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// Taxonomy code
    pub code: ErrorCode,
    /// Human-readable message, safe to surface to the caller
    pub message: String,
}

impl AppError {
    /// Create an error with an explicit code
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Malformed or missing required input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// The user already has an active plan
    pub fn active_plan_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ActivePlanExists, message)
    }

    /// Rich provider failed, timed out, or returned unparsable content
    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProviderUnavailable, message)
    }

    /// Generated content failed safety validation
    pub fn safety_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SafetyViolation, message)
    }

    /// Entity absent or outside tenant scope
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, format!("{} not found", entity.into()))
    }

    /// Disallowed or unknown workflow transition
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidTransition, message)
    }

    /// Session number outside the plan's session range
    pub fn invalid_session(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidSession, message)
    }

    /// Store-layer fault
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Unexpected internal fault
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::database(format!("Database operation failed: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("Serialization failed: {err}"))
    }
}
