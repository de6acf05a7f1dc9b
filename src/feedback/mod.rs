// ABOUTME: Feedback composer producing and storing AI coach comments for completed sessions
// ABOUTME: Loads history, builds the coaching prompt, calls the provider and saves the reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Feedback Composer
//!
//! Best-effort enrichment after a completion. The coach comment is the only
//! thing written here, and only after the provider returned usable text, so
//! any failure leaves the previously stored comment in place.

mod prompt;

pub use prompt::{FeedbackPrompt, SessionNotes};

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::models::{Athlete, CompletionPatch};
use crate::plan::TrainingPlan;
use crate::store::CompletionStore;

/// Generates coach feedback and stores it as the athlete's coach comment
#[derive(Clone)]
pub struct FeedbackComposer {
    store: Arc<dyn CompletionStore>,
    plan: Arc<TrainingPlan>,
    provider: Option<Arc<dyn LlmProvider>>,
}

impl FeedbackComposer {
    /// Create a composer; without a provider every request fails with a configuration error
    #[must_use]
    pub fn new(
        store: Arc<dyn CompletionStore>,
        plan: Arc<TrainingPlan>,
        provider: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        Self {
            store,
            plan,
            provider,
        }
    }

    /// Whether a text-generation provider is configured
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Generate feedback for `athlete`'s session on `date` and store it
    ///
    /// # Errors
    ///
    /// - `ConfigError` when no provider is configured
    /// - `ResourceNotFound` when `date` is not a plan day
    /// - `StoreUnavailable` when history cannot be read or the comment cannot be saved
    /// - `FeedbackGenerationFailed` / `ExternalRateLimited` from the provider
    #[instrument(skip_all, fields(athlete = %athlete, date = %date))]
    pub async fn compose(
        &self,
        athlete: Athlete,
        date: NaiveDate,
        notes: &SessionNotes,
    ) -> AppResult<String> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            AppError::config("Coach feedback is disabled because GEMINI_API_KEY is not set")
        })?;

        let today = self
            .plan
            .get(date)
            .ok_or_else(|| AppError::not_found(format!("Training day {date}")))?;

        let history = self.store.list().await?;
        let prompt = FeedbackPrompt::build(
            athlete,
            date,
            &history,
            Some(today),
            self.plan.next_after(date),
            notes,
        );

        let response = provider
            .complete(&ChatRequest::new(vec![ChatMessage::user(prompt)]))
            .await?;
        let feedback = response.content.trim().to_owned();
        if feedback.is_empty() {
            return Err(AppError::feedback_failed(
                "The text-generation service returned an empty reply",
            ));
        }

        self.store
            .upsert(&CompletionPatch::coach_comment(date, athlete, feedback.as_str()))
            .await?;

        info!(
            provider = provider.name(),
            model = %response.model,
            chars = feedback.chars().count(),
            "Coach feedback stored"
        );
        Ok(feedback)
    }
}
