// ABOUTME: Athlete identity for the two-person training plan
// ABOUTME: Owns the fixed per-athlete column naming used by the completion store schema
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// One of the two athletes following the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Athlete {
    /// Thomas
    Thomas,
    /// Monika
    Monika,
}

impl Athlete {
    /// Every athlete, in display order
    pub const ALL: [Self; 2] = [Self::Thomas, Self::Monika];

    /// Lowercase identifier used in requests and as the store column prefix
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Thomas => "thomas",
            Self::Monika => "monika",
        }
    }

    /// Capitalized name for prompts and messages
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Thomas => "Thomas",
            Self::Monika => "Monika",
        }
    }

    /// Parse a user identifier, ignoring case and surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for anything other than the two known athletes.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim().to_lowercase().as_str() {
            "thomas" => Ok(Self::Thomas),
            "monika" => Ok(Self::Monika),
            other => Err(AppError::invalid_input(format!("Unknown user '{other}'"))),
        }
    }

    /// Prefix of this athlete's columns in the completion table
    #[must_use]
    pub const fn column_prefix(self) -> &'static str {
        self.as_str()
    }

    /// Column name for a per-athlete field in the completion table
    #[must_use]
    pub fn column(self, field: AthleteColumn) -> String {
        let prefix = self.column_prefix();
        match field {
            AthleteColumn::Completed => format!("{prefix}_fullfort"),
            AthleteColumn::CompletedAt => format!("{prefix}_fullfort_tidspunkt"),
            AthleteColumn::Rpe => format!("{prefix}_rpe"),
            AthleteColumn::ActualPace => format!("{prefix}_actual_pace"),
            AthleteColumn::UserComment => format!("{prefix}_kommentar"),
            AthleteColumn::CoachComment => format!("trener_{prefix}_kommentar"),
        }
    }
}

impl fmt::Display for Athlete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Athlete {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Per-athlete fields of a completion row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AthleteColumn {
    /// Completion flag
    Completed,
    /// Timestamp of the completion
    CompletedAt,
    /// Rate of perceived exertion
    Rpe,
    /// Pace actually run
    ActualPace,
    /// The athlete's own comment
    UserComment,
    /// Stored AI coach feedback
    CoachComment,
}

impl AthleteColumn {
    /// Every per-athlete column
    pub const ALL: [Self; 6] = [
        Self::Completed,
        Self::CompletedAt,
        Self::Rpe,
        Self::ActualPace,
        Self::UserComment,
        Self::CoachComment,
    ];
}
