// ABOUTME: Pluggable plan generation providers behind one strategy interface
// ABOUTME: Selection policy, local deterministic composer, and the rich model path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

//! # Plan Generation Providers
//!
//! The engine works identically whether plan content comes from a rich
//! generative model or the local deterministic composer — both sit behind
//! [`PlanProvider`]. Selection is an explicit policy function on the
//! assessment, so additional providers can be added without touching the
//! orchestrator.

use async_trait::async_trait;
use lotus_core::models::{Assessment, ExperienceTier, GenerationMetadata, PlanStructure};

use crate::errors::AppResult;

/// Local deterministic composer provider
pub mod local;
/// Model client capability behind the rich provider
pub mod model_client;
/// Rich generative provider with prompt construction and reply parsing
pub mod rich;

pub use local::LocalComposer;
pub use model_client::{HttpModelClient, ModelReply, PlanModelClient};
pub use rich::RichPlanProvider;

/// A pluggable generator of plan content.
#[async_trait]
pub trait PlanProvider: Send + Sync {
    /// Provider identifier, recorded as `model_used` in metadata
    fn name(&self) -> &str;

    /// Generate a plan structure and its metadata from an assessment.
    ///
    /// The orchestrator overwrites `generation_time_ms` with the final
    /// wall-clock value and owns the safety gate; providers report their
    /// own confidence and token cost.
    ///
    /// # Errors
    ///
    /// Returns `ProviderUnavailable` when the generation call fails,
    /// times out, or produces unparsable content.
    async fn generate(
        &self,
        assessment: &Assessment,
    ) -> AppResult<(PlanStructure, GenerationMetadata)>;
}

/// Which provider the policy selected for an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderChoice {
    /// Rich external generation
    Rich,
    /// Local deterministic composer
    Local,
}

/// Provider selection policy.
///
/// The rich path handles assessments that need judgment: any stated
/// limitation, or an advanced practitioner. Everything else goes to the
/// local composer.
#[must_use]
pub fn select_provider(assessment: &Assessment) -> ProviderChoice {
    if !assessment.injuries_limitations.is_empty()
        || assessment.experience_level == ExperienceTier::Advanced
    {
        ProviderChoice::Rich
    } else {
        ProviderChoice::Local
    }
}
