// ABOUTME: Local deterministic provider wrapping the plan composer
// ABOUTME: Fixed confidence and zero token cost; no external calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

use async_trait::async_trait;
use lotus_core::models::{Assessment, GenerationMetadata, PlanStructure};

use super::PlanProvider;
use crate::catalog::PoseCatalog;
use crate::composer;
use crate::errors::AppResult;

/// Provider identifier recorded in metadata
pub const LOCAL_PROVIDER_NAME: &str = "local_composer";
/// Fixed confidence for the deterministic path
const LOCAL_CONFIDENCE: f64 = 0.95;
/// Prompt/schema version tag for the deterministic path
const LOCAL_PROMPT_VERSION: &str = "v1.0";

/// Deterministic provider backed by the local [`composer`].
///
/// Never fails and consumes no tokens; used for straightforward
/// assessments that need no external generation.
pub struct LocalComposer {
    catalog: PoseCatalog,
}

impl LocalComposer {
    /// Create a local provider over a catalog snapshot
    #[must_use]
    pub const fn new(catalog: PoseCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl PlanProvider for LocalComposer {
    fn name(&self) -> &str {
        LOCAL_PROVIDER_NAME
    }

    async fn generate(
        &self,
        assessment: &Assessment,
    ) -> AppResult<(PlanStructure, GenerationMetadata)> {
        let structure = composer::compose(assessment, &self.catalog);
        let metadata = GenerationMetadata {
            model_used: LOCAL_PROVIDER_NAME.to_owned(),
            confidence_score: LOCAL_CONFIDENCE,
            generation_time_ms: 0,
            tokens_consumed: 0,
            prompt_version: LOCAL_PROMPT_VERSION.to_owned(),
            safety_checks_passed: false,
        };
        Ok((structure, metadata))
    }
}
