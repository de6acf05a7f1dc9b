// ABOUTME: Configuration module for the training tracker server
// ABOUTME: Environment-driven settings for the plan file, store, text generation and HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration management

/// Environment-based server configuration
pub mod environment;

pub use environment::{CorsConfig, HttpConfig, LlmConfig, PlanConfig, ServerConfig, StoreConfig};
