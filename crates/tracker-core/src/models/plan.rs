// ABOUTME: Training plan entries as loaded from the plan file
// ABOUTME: Immutable per-date session descriptions with per-athlete pace targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Athlete;

/// One scheduled day of the training plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDay {
    /// Calendar date, unique within a plan
    pub date: NaiveDate,
    /// Weekday label as written in the plan
    pub weekday: String,
    /// Week number within the program (1-based)
    pub week_number: u32,
    /// Focus of the session
    pub focus: String,
    /// Session description
    pub description: String,
    /// Target pace per athlete
    pub pace_targets: BTreeMap<Athlete, String>,
    /// Free-text annotation from the plan author
    pub planned_comment: String,
}

impl TrainingDay {
    /// Target pace for an athlete, if the plan sets one
    #[must_use]
    pub fn pace_target(&self, athlete: Athlete) -> Option<&str> {
        self.pace_targets
            .get(&athlete)
            .map(String::as_str)
            .filter(|pace| !pace.is_empty())
    }
}
