// ABOUTME: Completion policy gating every write to an athlete's completion flag
// ABOUTME: One-way completion latch plus the 48-hour logging window after each session date
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Completion Policy
//!
//! Each `(date, athlete)` cell is an independent one-way latch:
//!
//! ```text
//! not completed ──log within 48h──▶ completed (frozen)
//! ```
//!
//! Rules, evaluated in order:
//!
//! 1. A completed session can never be changed again (`AlreadyLogged`).
//! 2. Logging is only possible until `date 00:00 UTC + 48h` (`CutoffExceeded`).
//! 3. Anything else is accepted. Requesting "not completed" on a cell that is
//!    not completed is accepted as a no-op, there is no unlogging write path.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::errors::{AppError, AppResult};

/// Hours after the session date during which it may still be logged
pub const CUTOFF_HOURS: i64 = 48;

/// Outcome of an accepted completion request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionDecision {
    /// Mark the session completed, stamped with the submission time
    Log {
        /// Value for `completedAt`
        completed_at: DateTime<Utc>,
    },
    /// Nothing to write
    Unchanged,
}

/// Gatekeeper for completion writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionPolicy {
    cutoff: Duration,
}

impl Default for CompletionPolicy {
    fn default() -> Self {
        Self {
            cutoff: Duration::hours(CUTOFF_HOURS),
        }
    }
}

impl CompletionPolicy {
    /// Policy with the standard 48-hour window
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last instant at which `date` may be logged
    #[must_use]
    pub fn cutoff_for(&self, date: NaiveDate) -> DateTime<Utc> {
        date.and_time(NaiveTime::MIN).and_utc() + self.cutoff
    }

    /// Whether the logging window for `date` has closed at `now`
    #[must_use]
    pub fn is_past_cutoff(&self, date: NaiveDate, now: DateTime<Utc>) -> bool {
        now > self.cutoff_for(date)
    }

    /// Whether an athlete can still log `date`
    #[must_use]
    pub fn is_editable(&self, date: NaiveDate, currently_completed: bool, now: DateTime<Utc>) -> bool {
        !currently_completed && !self.is_past_cutoff(date, now)
    }

    /// Decide on a request to set the completion flag of one cell
    ///
    /// # Errors
    ///
    /// - `AlreadyLogged` when the cell is already completed
    /// - `CutoffExceeded` when logging is requested after the window closed
    pub fn evaluate(
        &self,
        date: NaiveDate,
        requested: bool,
        currently_completed: bool,
        now: DateTime<Utc>,
    ) -> AppResult<CompletionDecision> {
        if currently_completed {
            return Err(AppError::already_logged(format!(
                "Session {date} is already logged and cannot be changed"
            )));
        }

        if !requested {
            return Ok(CompletionDecision::Unchanged);
        }

        let cutoff = self.cutoff_for(date);
        if now > cutoff {
            return Err(AppError::cutoff_exceeded(format!(
                "Session {date} can no longer be logged, the window closed at {}",
                cutoff.to_rfc3339()
            )));
        }

        Ok(CompletionDecision::Log { completed_at: now })
    }
}
