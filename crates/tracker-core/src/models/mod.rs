// ABOUTME: Domain models for the training tracker
// ABOUTME: Athletes, plan days and completion records shared by every layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

mod athlete;
mod completion;
mod plan;

pub use athlete::{Athlete, AthleteColumn};
pub use completion::{
    AthleteCompletion, CompletionPatch, CompletionRecord, CompletionSubmission, PatchChange,
    RPE_MAX, RPE_MIN,
};
pub use plan::TrainingDay;
