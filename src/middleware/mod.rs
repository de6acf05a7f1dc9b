// ABOUTME: HTTP middleware for the training tracker
// ABOUTME: CORS configuration; request ids and tracing come from tower-http layers in the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS middleware configuration
pub mod cors;

pub use cors::setup_cors;
