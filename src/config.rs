// ABOUTME: Environment-driven server configuration
// ABOUTME: Database URL, optional rich model endpoint, timeouts, log format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Lotus Wellness Intelligence

use std::env;
use std::time::Duration;

use crate::errors::{AppError, AppResult};

/// Default provider call timeout in seconds
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
/// Default model identifier for the rich endpoint
const DEFAULT_MODEL_NAME: &str = "gpt-4o-mini";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable compact lines
    #[default]
    Compact,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Connection details for the rich model endpoint
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Chat-completions endpoint URL
    pub api_url: String,
    /// Bearer token for the endpoint
    pub api_key: String,
    /// Model identifier to request
    pub model: String,
}

/// Server configuration, read once at startup from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Database connection URL
    pub database_url: String,
    /// Rich model endpoint; `None` disables the rich generation path
    pub model: Option<ModelConfig>,
    /// Timeout applied to provider calls
    pub provider_timeout: Duration,
    /// Log output format
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from `LOTUS_*` environment variables.
    ///
    /// The rich model path is enabled only when `LOTUS_MODEL_API_URL` is
    /// set; the key defaults to empty (for local endpoints) and the model
    /// name to a sensible default.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a numeric or enum-valued variable
    /// cannot be parsed.
    pub fn from_env() -> AppResult<Self> {
        let database_url =
            env::var("LOTUS_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_owned());

        let model = env::var("LOTUS_MODEL_API_URL").ok().map(|api_url| ModelConfig {
            api_url,
            api_key: env::var("LOTUS_MODEL_API_KEY").unwrap_or_default(),
            model: env::var("LOTUS_MODEL_NAME")
                .unwrap_or_else(|_| DEFAULT_MODEL_NAME.to_owned()),
        });

        let provider_timeout = match env::var("LOTUS_PROVIDER_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                AppError::invalid_input(format!("Invalid LOTUS_PROVIDER_TIMEOUT_SECS: {e}"))
            })?),
            Err(_) => Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        };

        let log_format = match env::var("LOTUS_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw).ok_or_else(|| {
                AppError::invalid_input(format!(
                    "Invalid LOTUS_LOG_FORMAT '{raw}': expected 'compact' or 'json'"
                ))
            })?,
            Err(_) => LogFormat::default(),
        };

        Ok(Self {
            database_url,
            model,
            provider_timeout,
            log_format,
        })
    }
}
