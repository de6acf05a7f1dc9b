// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Completion submission and the per-athlete plan board
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Protocol-agnostic business logic. Route handlers parse requests and map
//! results; the rules live here.

/// Completion submission, policy enforcement and the plan board
pub mod completion;

pub use completion::{Board, BoardDay, CompletionInput, CompletionOutcome, CompletionService};
