// ABOUTME: Model client capability behind the rich provider
// ABOUTME: HTTP chat-completions implementation with timeout handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

//! Completion client abstraction for the rich generation path.
//!
//! The rich provider only needs "prompt in, structured text out"; the
//! transport lives behind [`PlanModelClient`] so tests can inject stub
//! clients and deployments can swap model vendors. The bundled
//! [`HttpModelClient`] speaks the common chat-completions shape.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::errors::{AppError, AppResult};

/// A completion reply from the model
#[derive(Debug, Clone)]
pub struct ModelReply {
    /// Raw text content of the reply
    pub content: String,
    /// Model identifier the vendor reports
    pub model: String,
    /// Total tokens the call consumed
    pub tokens_consumed: u64,
}

/// Injected capability that turns a prompt into a completion.
///
/// The rich provider call is the only long-running or transiently failing
/// operation in the engine; implementations must apply a timeout and
/// report it as `ProviderUnavailable`.
#[async_trait]
pub trait PlanModelClient: Send + Sync {
    /// Run one completion.
    ///
    /// # Errors
    ///
    /// Returns `ProviderUnavailable` on transport failure, timeout, or a
    /// malformed vendor response.
    async fn complete(&self, prompt: &str) -> AppResult<ModelReply>;
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    #[serde(default)]
    total_tokens: u64,
}

/// Chat-completions HTTP client over reqwest with rustls.
pub struct HttpModelClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl HttpModelClient {
    /// Build a client for a chat-completions endpoint.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl PlanModelClient for HttpModelClient {
    async fn complete(&self, prompt: &str) -> AppResult<ModelReply> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0.2,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::provider_unavailable("Model provider timed out")
                } else {
                    AppError::provider_unavailable(format!("Model provider call failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(AppError::provider_unavailable(format!(
                "Model provider returned status {}",
                response.status()
            )));
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            AppError::provider_unavailable(format!("Malformed model provider response: {e}"))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                AppError::provider_unavailable("Model provider response carried no choices")
            })?;

        Ok(ModelReply {
            content,
            model: parsed.model.unwrap_or_else(|| self.model.clone()),
            tokens_consumed: parsed.usage.map_or(0, |u| u.total_tokens),
        })
    }
}
