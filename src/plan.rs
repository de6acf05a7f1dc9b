// ABOUTME: Training plan loader reading the 8-week program from a CSV file
// ABOUTME: Parses plan rows into typed training days keyed and ordered by date
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Training Plan
//!
//! The plan is a static CSV file with the header
//!
//! ```text
//! Dato,Ukedag,Ukenummer,Fokus,Økt_Beskrivelse,Thomas_Pace_Mål,Monika_Pace_Mål,Kommentar
//! ```
//!
//! It is loaded once at startup and shared read-only. File order is kept as
//! plan order; "next session" means the next row in the file.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::models::{Athlete, TrainingDay};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One CSV row as written by the plan author
#[derive(Debug, Deserialize)]
struct PlanRow {
    #[serde(rename = "Dato")]
    date: String,
    #[serde(rename = "Ukedag", default)]
    weekday: String,
    #[serde(rename = "Ukenummer")]
    week_number: String,
    #[serde(rename = "Fokus", default)]
    focus: String,
    #[serde(rename = "Økt_Beskrivelse", default)]
    description: String,
    #[serde(rename = "Thomas_Pace_Mål", default)]
    thomas_pace: String,
    #[serde(rename = "Monika_Pace_Mål", default)]
    monika_pace: String,
    #[serde(rename = "Kommentar", default)]
    planned_comment: String,
}

impl PlanRow {
    fn into_training_day(self, row: usize) -> AppResult<TrainingDay> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|e| {
            AppError::invalid_format(format!(
                "Plan row {row}: invalid date '{}', expected YYYY-MM-DD",
                self.date
            ))
            .with_source(e)
        })?;

        let week_number = self.week_number.parse::<u32>().map_err(|e| {
            AppError::invalid_format(format!(
                "Plan row {row}: invalid week number '{}'",
                self.week_number
            ))
            .with_source(e)
        })?;

        let pace_targets: BTreeMap<Athlete, String> = [
            (Athlete::Thomas, self.thomas_pace),
            (Athlete::Monika, self.monika_pace),
        ]
        .into_iter()
        .collect();

        Ok(TrainingDay {
            date,
            weekday: self.weekday,
            week_number,
            focus: self.focus,
            description: self.description,
            pace_targets,
            planned_comment: self.planned_comment,
        })
    }
}

/// The loaded plan, in file order
#[derive(Debug, Clone, Default)]
pub struct TrainingPlan {
    days: Vec<TrainingDay>,
    by_date: HashMap<NaiveDate, usize>,
}

impl TrainingPlan {
    /// Build a plan from days in plan order
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if two days share a date
    pub fn new(days: Vec<TrainingDay>) -> AppResult<Self> {
        let mut by_date = HashMap::with_capacity(days.len());
        for (index, day) in days.iter().enumerate() {
            if by_date.insert(day.date, index).is_some() {
                return Err(AppError::invalid_format(format!(
                    "Plan row {}: duplicate date {}",
                    index + 1,
                    day.date
                )));
            }
        }
        Ok(Self { days, by_date })
    }

    /// All days in plan order
    #[must_use]
    pub fn days(&self) -> &[TrainingDay] {
        &self.days
    }

    /// The plan entry for a date
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&TrainingDay> {
        self.by_date.get(&date).map(|&index| &self.days[index])
    }

    /// The plan entry following `date` in plan order
    #[must_use]
    pub fn next_after(&self, date: NaiveDate) -> Option<&TrainingDay> {
        self.by_date
            .get(&date)
            .and_then(|&index| self.days.get(index + 1))
    }

    /// Number of plan days
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the plan has no days
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Reads training plans from CSV
pub struct PlanLoader;

impl PlanLoader {
    /// Load the plan file at `path`
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if the file cannot be read and `InvalidFormat`
    /// if any row fails to parse.
    pub async fn load(path: &Path) -> AppResult<TrainingPlan> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::internal(format!(
                "Failed to read training plan {}: {e}",
                path.display()
            ))
            .with_source(e)
        })?;

        let plan = Self::parse_str(&content)?;
        info!(path = %path.display(), days = plan.len(), "Training plan loaded");
        Ok(plan)
    }

    /// Parse plan CSV content
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` naming the 1-based data row that failed.
    pub fn parse_str(content: &str) -> AppResult<TrainingPlan> {
        let content = content.trim_start_matches('\u{feff}');
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut days = Vec::new();
        for (index, result) in reader.deserialize::<PlanRow>().enumerate() {
            let row = index + 1;
            let plan_row = result.map_err(|e| {
                AppError::invalid_format(format!("Plan row {row}: {e}")).with_source(e)
            })?;
            days.push(plan_row.into_training_day(row)?);
        }

        debug!(days = days.len(), "Parsed training plan rows");
        TrainingPlan::new(days)
    }
}
