// ABOUTME: Rich generative provider building structured prompts and parsing replies
// ABOUTME: Any transport failure or unparsable reply surfaces as ProviderUnavailable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use lotus_core::models::{Assessment, GenerationMetadata, PlanStructure};
use serde::Deserialize;

use super::model_client::PlanModelClient;
use super::PlanProvider;
use crate::errors::{AppError, AppResult};

/// Prompt/schema version tag for the rich path
const RICH_PROMPT_VERSION: &str = "v2.1";
/// Confidence recorded when the reply does not report one
const DEFAULT_RICH_CONFIDENCE: f64 = 0.9;

/// Expected reply envelope; a bare plan structure is also accepted.
#[derive(Debug, Deserialize)]
struct RichReply {
    plan_structure: PlanStructure,
    #[serde(default)]
    confidence_score: Option<f64>,
}

/// Rich generation provider driving an external model through a
/// [`PlanModelClient`].
///
/// Failures are never downgraded to the local composer; a provider fault
/// must stay visible to the caller.
pub struct RichPlanProvider {
    client: Arc<dyn PlanModelClient>,
}

impl RichPlanProvider {
    /// Create a rich provider over a model client
    #[must_use]
    pub fn new(client: Arc<dyn PlanModelClient>) -> Self {
        Self { client }
    }

    fn build_prompt(assessment: &Assessment) -> String {
        let mut prompt = String::with_capacity(1024);
        prompt.push_str(
            "You are an expert yoga instructor designing a personalized program.\n\n\
             Member assessment:\n",
        );
        let _ = writeln!(
            prompt,
            "- Experience level: {}",
            assessment.experience_level.as_str()
        );
        let _ = writeln!(prompt, "- Goals: {}", assessment.primary_goals.join(", "));
        let _ = writeln!(
            prompt,
            "- Preferred styles: {}",
            assessment.preferred_styles.join(", ")
        );
        let _ = writeln!(
            prompt,
            "- Session duration: {} minutes, {} sessions per week, {} weeks total",
            assessment.session_duration, assessment.sessions_per_week, assessment.duration_weeks
        );
        if assessment.injuries_limitations.is_empty() {
            prompt.push_str("- Limitations: none\n");
        } else {
            prompt.push_str("- Limitations:\n");
            for limitation in &assessment.injuries_limitations {
                let _ = writeln!(
                    prompt,
                    "  - {} (severity: {}){}",
                    limitation.limitation_type,
                    limitation.severity.as_str(),
                    limitation
                        .notes
                        .as_deref()
                        .map(|n| format!(" - {n}"))
                        .unwrap_or_default()
                );
            }
        }
        if let Some(notes) = &assessment.additional_notes {
            let _ = writeln!(prompt, "- Additional notes: {notes}");
        }
        prompt.push_str(
            "\nStrict requirements:\n\
             - NEVER include a pose contraindicated for any stated limitation.\n\
             - Every session must include a warm_up, main_sequence, and cool_down phase.\n\
             - Include modification suggestions for every pose and both English and Sanskrit names.\n\
             - Phase durations must not exceed the session duration.\n\
             \nReply with a single JSON object, no prose, of the form:\n\
             {\"plan_structure\": {\"duration_weeks\": ..., \"sessions_per_week\": ..., \
             \"difficulty_level\": ..., \"total_sessions\": ..., \"weeks\": [...]}, \
             \"confidence_score\": 0.0-1.0}\n",
        );
        prompt
    }

    /// Parse the model reply, tolerating a fenced code block and a bare
    /// plan structure without the envelope.
    fn parse_reply(content: &str) -> AppResult<(PlanStructure, Option<f64>)> {
        let trimmed = strip_code_fence(content);
        if let Ok(reply) = serde_json::from_str::<RichReply>(trimmed) {
            return Ok((reply.plan_structure, reply.confidence_score));
        }
        match serde_json::from_str::<PlanStructure>(trimmed) {
            Ok(structure) => Ok((structure, None)),
            Err(e) => Err(AppError::provider_unavailable(format!(
                "Model reply was not a valid plan structure: {e}"
            ))),
        }
    }
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

#[async_trait]
impl PlanProvider for RichPlanProvider {
    fn name(&self) -> &str {
        "rich_model"
    }

    async fn generate(
        &self,
        assessment: &Assessment,
    ) -> AppResult<(PlanStructure, GenerationMetadata)> {
        let prompt = Self::build_prompt(assessment);
        let reply = self.client.complete(&prompt).await?;
        let (structure, confidence) = Self::parse_reply(&reply.content)?;

        if !structure.totals_consistent() {
            return Err(AppError::provider_unavailable(
                "Model reply plan structure has inconsistent session totals",
            ));
        }

        let metadata = GenerationMetadata {
            model_used: reply.model,
            confidence_score: confidence
                .unwrap_or(DEFAULT_RICH_CONFIDENCE)
                .clamp(0.0, 1.0),
            generation_time_ms: 0,
            tokens_consumed: reply.tokens_consumed,
            prompt_version: RICH_PROMPT_VERSION.to_owned(),
            safety_checks_passed: false,
        };
        Ok((structure, metadata))
    }
}
