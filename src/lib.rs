// ABOUTME: Main library entry point for the two-athlete training tracker
// ABOUTME: Plan loading, completion logging with a 48-hour window and AI coach feedback over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Training Tracker
//!
//! Backend for two athletes following the same 8-week running plan.
//!
//! - The plan is a CSV file loaded once at startup.
//! - Each athlete logs a session once, with RPE, pace and a comment, within
//!   48 hours of the session date. A logged session is permanent.
//! - After logging, a text-generation service writes short coach feedback,
//!   stored next to the session. Feedback failures never undo a completion.
//!
//! ## Architecture
//!
//! - **plan**: CSV plan loader
//! - **store**: completion store (SQLite or a hosted PostgREST table)
//! - **llm**: text-generation provider (Gemini)
//! - **feedback**: coaching prompt and feedback composer
//! - **services**: completion service enforcing the completion policy
//! - **routes** / **server**: axum HTTP surface

/// Configuration management
pub mod config;

/// Environment variable names and defaults
pub mod constants;

/// Unified error handling
pub mod errors;

/// AI coach feedback
pub mod feedback;

/// Text-generation providers
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Training plan loader
pub mod plan;

/// HTTP routes
pub mod routes;

/// Server assembly
pub mod server;

/// Domain services
pub mod services;

/// Completion store backends
pub mod store;

/// Domain models
pub use tracker_core::models;

/// Completion policy
pub use tracker_core::policy;
