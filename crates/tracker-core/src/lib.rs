// ABOUTME: Core types and completion policy for the two-athlete training tracker
// ABOUTME: Foundation crate with error handling, domain models and the completion rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Tracker Core
//!
//! Foundation crate for the training tracker. It is free of I/O so the
//! completion rules can be tested in isolation from the store and the
//! text-generation service.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: Athletes, plan days, completion records and patches
//! - **policy**: The completion latch and the 48-hour logging window

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Domain models shared by every layer
pub mod models;

/// Completion policy (one-way latch and logging window)
pub mod policy;
