// ABOUTME: Environment variable names and defaults for the training tracker
// ABOUTME: Single place for ports, store, plan file and text-generation settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Environment variable names and their defaults. Values are read once by
//! `config::ServerConfig::from_env` at startup.

/// Service identity used in logs and health responses
pub mod service {
    /// Service name
    pub const SERVICE_NAME: &str = "training-tracker";

    /// Version from Cargo.toml
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Environment variable names
pub mod env_vars {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// HTTP listen address
    pub const HTTP_HOST: &str = "HTTP_HOST";
    /// Location of the plan CSV file
    pub const TRAINING_PLAN_PATH: &str = "TRAINING_PLAN_PATH";
    /// Store backend selector (`sqlite` or `supabase`)
    pub const COMPLETION_STORE: &str = "COMPLETION_STORE";
    /// SQLite connection string
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Hosted table base URL
    pub const SUPABASE_URL: &str = "SUPABASE_URL";
    /// Hosted table service key
    pub const SUPABASE_KEY: &str = "SUPABASE_KEY";
    /// Hosted table name
    pub const SUPABASE_TABLE: &str = "SUPABASE_TABLE";
    /// Gemini API key
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Gemini model name
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
    /// Gemini API base URL
    pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
    /// Text-generation request timeout in seconds
    pub const LLM_TIMEOUT_SECS: &str = "LLM_TIMEOUT_SECS";
    /// Comma-separated CORS origins
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
}

/// Default values
pub mod defaults {
    /// HTTP listen port
    pub const HTTP_PORT: u16 = 8081;
    /// HTTP listen address
    pub const HTTP_HOST: &str = "0.0.0.0";
    /// Plan CSV file
    pub const TRAINING_PLAN_PATH: &str = "data/treningsprogram.csv";
    /// Store backend
    pub const COMPLETION_STORE: &str = "sqlite";
    /// SQLite database, created on first start
    pub const DATABASE_URL: &str = "sqlite:data/tracker.db";
    /// Hosted table name
    pub const SUPABASE_TABLE: &str = "treningsprogram";
    /// Gemini model
    pub const GEMINI_MODEL: &str = "gemini-2.5-flash";
    /// Gemini API base URL
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    /// Text-generation request timeout
    pub const LLM_TIMEOUT_SECS: u64 = 30;
    /// Store request timeout
    pub const STORE_TIMEOUT_SECS: u64 = 10;
    /// CORS origins
    pub const CORS_ALLOWED_ORIGINS: &str = "*";
}
