// ABOUTME: Error handling re-exports for the training tracker server
// ABOUTME: The error types live in tracker-core so every layer shares one definition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Unified error handling, re-exported from `tracker_core::errors`

pub use tracker_core::errors::*;
