// ABOUTME: Environment-based configuration for the training tracker server
// ABOUTME: Reads .env and process variables into typed plan, store, LLM, CORS and HTTP settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use std::env;
use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::constants::{defaults, env_vars};

/// Main server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listener settings
    pub http: HttpConfig,
    /// Plan file location
    pub plan: PlanConfig,
    /// Completion store backend
    pub store: StoreConfig,
    /// Text-generation service
    pub llm: LlmConfig,
    /// Cross-origin settings
    pub cors: CorsConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

/// Training plan source
#[derive(Debug, Clone)]
pub struct PlanConfig {
    /// Path of the CSV file loaded at startup
    pub path: PathBuf,
}

/// Completion store backend selection
#[derive(Clone)]
pub enum StoreConfig {
    /// Local SQLite database
    Sqlite {
        /// sqlx connection string
        url: String,
    },
    /// Hosted table behind a PostgREST endpoint
    Supabase {
        /// Project base URL
        url: String,
        /// Service key sent as `apikey` and bearer token
        key: String,
        /// Table name
        table: String,
    },
}

impl StoreConfig {
    /// Short backend name for logs
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } => "sqlite",
            Self::Supabase { .. } => "supabase",
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite { url } => f.debug_struct("Sqlite").field("url", url).finish(),
            Self::Supabase { url, table, .. } => f
                .debug_struct("Supabase")
                .field("url", url)
                .field("key", &"[REDACTED]")
                .field("table", table)
                .finish(),
        }
    }
}

/// Text-generation service configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// Gemini API key; feedback is disabled without one
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Whether coach feedback can be generated
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated origins, or `*`
    pub allowed_origins: String,
}

impl ServerConfig {
    /// Load configuration from `.env` and the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed, the store backend is
    /// unknown or the hosted store is selected without URL and key.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let config = Self {
            http: HttpConfig {
                host: env_var_or(env_vars::HTTP_HOST, defaults::HTTP_HOST),
                port: env_var_or(env_vars::HTTP_PORT, &defaults::HTTP_PORT.to_string())
                    .parse()
                    .context("Invalid HTTP_PORT value")?,
            },
            plan: PlanConfig {
                path: PathBuf::from(env_var_or(
                    env_vars::TRAINING_PLAN_PATH,
                    defaults::TRAINING_PLAN_PATH,
                )),
            },
            store: store_config_from_env()?,
            llm: LlmConfig {
                api_key: non_empty_var(env_vars::GEMINI_API_KEY),
                model: env_var_or(env_vars::GEMINI_MODEL, defaults::GEMINI_MODEL),
                base_url: env_var_or(env_vars::GEMINI_BASE_URL, defaults::GEMINI_BASE_URL),
                timeout_secs: env_var_or(
                    env_vars::LLM_TIMEOUT_SECS,
                    &defaults::LLM_TIMEOUT_SECS.to_string(),
                )
                .parse()
                .context("Invalid LLM_TIMEOUT_SECS value")?,
            },
            cors: CorsConfig {
                allowed_origins: env_var_or(
                    env_vars::CORS_ALLOWED_ORIGINS,
                    defaults::CORS_ALLOWED_ORIGINS,
                ),
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error for a zero timeout or a hosted store URL that is not HTTP(S).
    pub fn validate(&self) -> Result<()> {
        if self.llm.timeout_secs == 0 {
            return Err(anyhow::anyhow!("LLM_TIMEOUT_SECS must be greater than zero"));
        }

        if let StoreConfig::Supabase { url, .. } = &self.store {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!(
                    "SUPABASE_URL must start with http:// or https://"
                ));
            }
        }

        if !self.llm.is_enabled() {
            warn!("GEMINI_API_KEY is not set, coach feedback is disabled");
        }

        if !self.plan.path.exists() {
            warn!(
                path = %self.plan.path.display(),
                "Training plan file does not exist yet"
            );
        }

        Ok(())
    }

    /// Human-readable configuration summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Training Tracker Configuration:\n\
             - HTTP: {}:{}\n\
             - Training Plan: {}\n\
             - Completion Store: {}\n\
             - Coach Feedback: {}\n\
             - Feedback Model: {}\n\
             - CORS Origins: {}",
            self.http.host,
            self.http.port,
            self.plan.path.display(),
            self.store.backend_name(),
            if self.llm.is_enabled() {
                "Enabled"
            } else {
                "Disabled"
            },
            self.llm.model,
            self.cors.allowed_origins,
        )
    }
}

fn store_config_from_env() -> Result<StoreConfig> {
    let backend = env_var_or(env_vars::COMPLETION_STORE, defaults::COMPLETION_STORE);

    match backend.trim().to_lowercase().as_str() {
        "sqlite" => Ok(StoreConfig::Sqlite {
            url: env_var_or(env_vars::DATABASE_URL, defaults::DATABASE_URL),
        }),
        "supabase" | "postgrest" => Ok(StoreConfig::Supabase {
            url: non_empty_var(env_vars::SUPABASE_URL)
                .context("SUPABASE_URL is required when COMPLETION_STORE=supabase")?
                .trim_end_matches('/')
                .to_owned(),
            key: non_empty_var(env_vars::SUPABASE_KEY)
                .context("SUPABASE_KEY is required when COMPLETION_STORE=supabase")?,
            table: env_var_or(env_vars::SUPABASE_TABLE, defaults::SUPABASE_TABLE),
        }),
        other => Err(anyhow::anyhow!(
            "Unknown COMPLETION_STORE '{other}', expected 'sqlite' or 'supabase'"
        )),
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
