// ABOUTME: Completion records, athlete submissions and partial store writes
// ABOUTME: One record per plan date with an independent completion cell per athlete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Athlete;
use crate::errors::{AppError, AppResult};

/// Lowest accepted rate of perceived exertion
pub const RPE_MIN: u8 = 1;
/// Highest accepted rate of perceived exertion
pub const RPE_MAX: u8 = 10;

/// Completion state of one athlete for one date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteCompletion {
    /// Whether the session is logged. Once true it never goes back.
    pub completed: bool,
    /// When the session was logged; set iff `completed`
    pub completed_at: Option<DateTime<Utc>>,
    /// Rate of perceived exertion (1-10)
    pub rpe: Option<u8>,
    /// Pace actually run, free text such as "5:30"
    pub actual_pace: Option<String>,
    /// The athlete's own comment
    pub user_comment: Option<String>,
    /// Latest AI coach feedback
    pub coach_comment: Option<String>,
}

/// Stored completion state for a plan date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    /// Plan date this record belongs to
    pub date: NaiveDate,
    /// Per-athlete completion cells
    pub athletes: BTreeMap<Athlete, AthleteCompletion>,
}

impl CompletionRecord {
    /// An empty record: nobody has logged anything yet
    #[must_use]
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            athletes: Athlete::ALL
                .into_iter()
                .map(|athlete| (athlete, AthleteCompletion::default()))
                .collect(),
        }
    }

    /// Completion cell for an athlete (default when absent)
    #[must_use]
    pub fn athlete(&self, athlete: Athlete) -> AthleteCompletion {
        self.athletes.get(&athlete).cloned().unwrap_or_default()
    }

    /// Whether the athlete has logged this date
    #[must_use]
    pub fn is_completed(&self, athlete: Athlete) -> bool {
        self.athletes
            .get(&athlete)
            .is_some_and(|cell| cell.completed)
    }

    /// Apply a patch in place, touching only the patched athlete's fields
    pub fn apply(&mut self, patch: &CompletionPatch) {
        let cell = self.athletes.entry(patch.athlete).or_default();
        match &patch.change {
            PatchChange::Logged {
                completed_at,
                submission,
            } => {
                cell.completed = true;
                cell.completed_at = Some(*completed_at);
                cell.rpe = Some(submission.rpe);
                cell.actual_pace = Some(submission.actual_pace.clone());
                cell.user_comment = Some(submission.user_comment.clone());
            }
            PatchChange::CoachComment(text) => {
                cell.coach_comment = Some(text.clone());
            }
        }
    }
}

/// Fields an athlete supplies when logging a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSubmission {
    /// Rate of perceived exertion (1-10)
    pub rpe: u8,
    /// Pace actually run
    pub actual_pace: String,
    /// The athlete's own comment
    pub user_comment: String,
}

impl CompletionSubmission {
    /// Build a submission from optional request fields, validating it
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` when a field is absent or blank and
    /// `ValueOutOfRange` when the RPE is outside 1-10.
    pub fn from_parts(
        rpe: Option<i64>,
        actual_pace: Option<&str>,
        user_comment: Option<&str>,
    ) -> AppResult<Self> {
        let rpe = rpe.ok_or_else(|| AppError::missing_field("rpe"))?;
        let rpe = u8::try_from(rpe)
            .ok()
            .filter(|value| (RPE_MIN..=RPE_MAX).contains(value))
            .ok_or_else(|| {
                AppError::out_of_range(format!("RPE must be between {RPE_MIN} and {RPE_MAX}, got {rpe}"))
            })?;

        let submission = Self {
            rpe,
            actual_pace: actual_pace.unwrap_or_default().trim().to_owned(),
            user_comment: user_comment.unwrap_or_default().trim().to_owned(),
        };
        submission.validate()?;
        Ok(submission)
    }

    /// Check the invariants of a true-transition payload
    ///
    /// # Errors
    ///
    /// Returns an error when the RPE is out of range or pace/comment are blank.
    pub fn validate(&self) -> AppResult<()> {
        if !(RPE_MIN..=RPE_MAX).contains(&self.rpe) {
            return Err(AppError::out_of_range(format!(
                "RPE must be between {RPE_MIN} and {RPE_MAX}, got {}",
                self.rpe
            )));
        }
        if self.actual_pace.trim().is_empty() {
            return Err(AppError::missing_field("pace"));
        }
        if self.user_comment.trim().is_empty() {
            return Err(AppError::missing_field("userComment"));
        }
        Ok(())
    }
}

/// A partial write to one athlete's half of a completion record
///
/// Patches only carry the columns they change, so two athletes writing the
/// same date never overwrite each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionPatch {
    /// Record key
    pub date: NaiveDate,
    /// Whose fields are written
    pub athlete: Athlete,
    /// What is written
    pub change: PatchChange,
}

/// The change carried by a `CompletionPatch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchChange {
    /// A false-to-true completion together with the logged fields
    Logged {
        /// Submission time
        completed_at: DateTime<Utc>,
        /// Logged fields
        submission: CompletionSubmission,
    },
    /// Replacement coach feedback
    CoachComment(String),
}

impl CompletionPatch {
    /// Patch that logs a session
    #[must_use]
    pub const fn logged(
        date: NaiveDate,
        athlete: Athlete,
        completed_at: DateTime<Utc>,
        submission: CompletionSubmission,
    ) -> Self {
        Self {
            date,
            athlete,
            change: PatchChange::Logged {
                completed_at,
                submission,
            },
        }
    }

    /// Patch that stores coach feedback
    #[must_use]
    pub fn coach_comment(date: NaiveDate, athlete: Athlete, text: impl Into<String>) -> Self {
        Self {
            date,
            athlete,
            change: PatchChange::CoachComment(text.into()),
        }
    }
}
