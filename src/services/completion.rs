// ABOUTME: Completion service applying the completion policy to store writes
// ABOUTME: Logs sessions all-or-nothing, then asks for coach feedback on a best-effort basis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Completion Service
//!
//! A completion action runs in this order:
//!
//! 1. the date must be a plan day
//! 2. the current record is read from the store
//! 3. the completion policy decides (`AlreadyLogged`, `CutoffExceeded`, no-op or log)
//! 4. the submission is validated and written as one patch
//! 5. coach feedback is requested; its failure is reported, never rolled back

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::errors::{AppError, AppResult, ErrorResponse, ErrorResponseDetails};
use crate::feedback::{FeedbackComposer, SessionNotes};
use crate::models::{Athlete, CompletionPatch, CompletionRecord, CompletionSubmission, TrainingDay};
use crate::plan::TrainingPlan;
use crate::policy::{CompletionDecision, CompletionPolicy};
use crate::store::CompletionStore;

/// Raw fields accompanying a completion request, validated only when logging
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionInput {
    /// Rate of perceived exertion
    pub rpe: Option<i64>,
    /// Pace actually run
    pub pace: Option<String>,
    /// The athlete's own comment
    pub user_comment: Option<String>,
}

/// Result of a completion action
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    /// Record state after the action
    pub record: CompletionRecord,
    /// Whether anything was written
    pub changed: bool,
    /// Coach feedback generated for this completion
    pub feedback: Option<String>,
    /// Why feedback is missing although the completion was stored
    pub feedback_error: Option<ErrorResponseDetails>,
}

/// One plan day with its stored completion state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDay {
    /// Plan entry
    #[serde(flatten)]
    pub day: TrainingDay,
    /// Stored completion state; empty when nobody logged the day yet
    pub completion: CompletionRecord,
    /// Whether the acting athlete can still log this day
    pub editable: bool,
}

/// The plan as seen by one athlete
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Acting athlete
    pub user: Athlete,
    /// Plan days in plan order
    pub days: Vec<BoardDay>,
}

/// Entry point for completion actions
#[derive(Clone)]
pub struct CompletionService {
    plan: Arc<TrainingPlan>,
    store: Arc<dyn CompletionStore>,
    composer: FeedbackComposer,
    policy: CompletionPolicy,
}

impl CompletionService {
    /// Create a service with the standard completion policy
    #[must_use]
    pub fn new(
        plan: Arc<TrainingPlan>,
        store: Arc<dyn CompletionStore>,
        composer: FeedbackComposer,
    ) -> Self {
        Self {
            plan,
            store,
            composer,
            policy: CompletionPolicy::new(),
        }
    }

    /// The loaded plan
    #[must_use]
    pub fn plan(&self) -> &TrainingPlan {
        &self.plan
    }

    /// The completion store
    #[must_use]
    pub fn store(&self) -> &Arc<dyn CompletionStore> {
        &self.store
    }

    /// The feedback composer
    #[must_use]
    pub const fn composer(&self) -> &FeedbackComposer {
        &self.composer
    }

    /// Set `athlete`'s completion flag for `date` to `requested`
    ///
    /// # Errors
    ///
    /// - `ResourceNotFound` when `date` is not a plan day
    /// - `AlreadyLogged` / `CutoffExceeded` from the completion policy, or
    ///   `AlreadyLogged` from the store when a simultaneous request logged first
    /// - `MissingRequiredField` / `ValueOutOfRange` for an invalid submission
    /// - `StoreUnavailable` when the record cannot be read or written
    ///
    /// Feedback failures are not errors; they are reported in the outcome.
    #[instrument(skip_all, fields(athlete = %athlete, date = %date, requested = requested))]
    pub async fn submit(
        &self,
        athlete: Athlete,
        date: NaiveDate,
        requested: bool,
        input: CompletionInput,
        now: DateTime<Utc>,
    ) -> AppResult<CompletionOutcome> {
        if self.plan.get(date).is_none() {
            return Err(AppError::not_found(format!("Training day {date}")));
        }

        let mut record = self
            .store
            .get(date)
            .await?
            .unwrap_or_else(|| CompletionRecord::empty(date));

        let completed_at = match self
            .policy
            .evaluate(date, requested, record.is_completed(athlete), now)?
        {
            CompletionDecision::Unchanged => {
                return Ok(CompletionOutcome {
                    record,
                    changed: false,
                    feedback: None,
                    feedback_error: None,
                });
            }
            CompletionDecision::Log { completed_at } => completed_at,
        };

        let submission = CompletionSubmission::from_parts(
            input.rpe,
            input.pace.as_deref(),
            input.user_comment.as_deref(),
        )?;
        let notes = SessionNotes::from(&submission);

        let patch = CompletionPatch::logged(date, athlete, completed_at, submission);
        self.store.upsert(&patch).await?;
        record.apply(&patch);
        info!(completed_at = %completed_at, "Session logged");

        let (feedback, feedback_error) = match self.composer.compose(athlete, date, &notes).await {
            Ok(text) => {
                record.apply(&CompletionPatch::coach_comment(date, athlete, text.as_str()));
                (Some(text), None)
            }
            Err(error) => {
                warn!(code = ?error.code, error = %error.message, "Coach feedback unavailable");
                let details = ErrorResponse::from(&error).error;
                (None, Some(details))
            }
        };

        Ok(CompletionOutcome {
            record,
            changed: true,
            feedback,
            feedback_error,
        })
    }

    /// All stored records ordered by date
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be read
    pub async fn records(&self) -> AppResult<Vec<CompletionRecord>> {
        self.store.list().await
    }

    /// The plan joined with stored records for `athlete`
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be read
    pub async fn board(&self, athlete: Athlete, now: DateTime<Utc>) -> AppResult<Board> {
        let mut records: HashMap<NaiveDate, CompletionRecord> = self
            .store
            .list()
            .await?
            .into_iter()
            .map(|record| (record.date, record))
            .collect();

        let days = self
            .plan
            .days()
            .iter()
            .map(|day| {
                let completion = records
                    .remove(&day.date)
                    .unwrap_or_else(|| CompletionRecord::empty(day.date));
                let editable =
                    self.policy
                        .is_editable(day.date, completion.is_completed(athlete), now);
                BoardDay {
                    day: day.clone(),
                    completion,
                    editable,
                }
            })
            .collect();

        Ok(Board {
            user: athlete,
            days,
        })
    }
}
