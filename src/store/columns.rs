// ABOUTME: Flat row encoding of completion records for the date-keyed completion table
// ABOUTME: Converts patches to column values and flat JSON rows back to typed records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::errors::{AppError, AppResult};
use crate::models::{
    Athlete, AthleteColumn, AthleteCompletion, CompletionPatch, CompletionRecord, PatchChange,
    RPE_MAX, RPE_MIN,
};

/// Key column of the completion table
pub const DATE_COLUMN: &str = "dato";

/// A single column value written by a patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    /// Boolean flag
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Text value
    Text(String),
}

impl From<ColumnValue> for Value {
    fn from(value: ColumnValue) -> Self {
        match value {
            ColumnValue::Bool(flag) => Self::Bool(flag),
            ColumnValue::Int(number) => Self::from(number),
            ColumnValue::Text(text) => Self::String(text),
        }
    }
}

/// Render a date the way it is stored in the key column
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The columns a patch writes, excluding the key
#[must_use]
pub fn patch_columns(patch: &CompletionPatch) -> Vec<(String, ColumnValue)> {
    let athlete = patch.athlete;
    match &patch.change {
        PatchChange::Logged {
            completed_at,
            submission,
        } => vec![
            (
                athlete.column(AthleteColumn::Completed),
                ColumnValue::Bool(true),
            ),
            (
                athlete.column(AthleteColumn::CompletedAt),
                ColumnValue::Text(completed_at.to_rfc3339()),
            ),
            (
                athlete.column(AthleteColumn::Rpe),
                ColumnValue::Int(i64::from(submission.rpe)),
            ),
            (
                athlete.column(AthleteColumn::ActualPace),
                ColumnValue::Text(submission.actual_pace.clone()),
            ),
            (
                athlete.column(AthleteColumn::UserComment),
                ColumnValue::Text(submission.user_comment.clone()),
            ),
        ],
        PatchChange::CoachComment(text) => vec![(
            athlete.column(AthleteColumn::CoachComment),
            ColumnValue::Text(text.clone()),
        )],
    }
}

/// The completion flag a patch must find unset before it may be written
///
/// Logging is one-way, so a `Logged` patch only applies while the athlete's
/// flag is false or null. Coach comments are written unconditionally.
#[must_use]
pub fn write_guard(patch: &CompletionPatch) -> Option<String> {
    match patch.change {
        PatchChange::Logged { .. } => Some(patch.athlete.column(AthleteColumn::Completed)),
        PatchChange::CoachComment(_) => None,
    }
}

/// Error for a `Logged` patch that lost against an earlier write
#[must_use]
pub fn already_logged(patch: &CompletionPatch) -> AppError {
    AppError::already_logged(format!(
        "Session {} is already logged for {} and cannot be changed",
        patch.date, patch.athlete
    ))
}

/// A patch as a flat JSON row including the key
#[must_use]
pub fn patch_to_json(patch: &CompletionPatch) -> Value {
    let mut row = Map::new();
    row.insert(DATE_COLUMN.to_owned(), Value::String(format_date(patch.date)));
    for (column, value) in patch_columns(patch) {
        row.insert(column, value.into());
    }
    Value::Object(row)
}

/// Decode a flat row into a typed record
///
/// Missing and null columns decode to defaults, which is how a row written by
/// only one athlete looks from the other athlete's side.
///
/// # Errors
///
/// Returns `InvalidFormat` when the key or a timestamp cannot be parsed.
pub fn record_from_json(row: &Map<String, Value>) -> AppResult<CompletionRecord> {
    let date_text = row
        .get(DATE_COLUMN)
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::invalid_format("Completion row without a date"))?;
    let date = parse_stored_date(date_text)?;

    let mut record = CompletionRecord::empty(date);
    for athlete in Athlete::ALL {
        record
            .athletes
            .insert(athlete, athlete_from_json(row, athlete)?);
    }
    Ok(record)
}

fn athlete_from_json(row: &Map<String, Value>, athlete: Athlete) -> AppResult<AthleteCompletion> {
    let field = |column: AthleteColumn| row.get(&athlete.column(column)).filter(|v| !v.is_null());

    let completed = field(AthleteColumn::Completed).is_some_and(|value| match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_i64().is_some_and(|n| n != 0),
        _ => false,
    });

    let completed_at = field(AthleteColumn::CompletedAt)
        .and_then(Value::as_str)
        .map(parse_timestamp)
        .transpose()?;

    let rpe = field(AthleteColumn::Rpe)
        .and_then(|value| match value {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        })
        .and_then(|value| u8::try_from(value).ok())
        .filter(|value| (RPE_MIN..=RPE_MAX).contains(value));

    let text = |column: AthleteColumn| {
        field(column)
            .and_then(Value::as_str)
            .map(str::to_owned)
    };

    Ok(AthleteCompletion {
        completed,
        completed_at,
        rpe,
        actual_pace: text(AthleteColumn::ActualPace),
        user_comment: text(AthleteColumn::UserComment),
        coach_comment: text(AthleteColumn::CoachComment),
    })
}

fn parse_stored_date(text: &str) -> AppResult<NaiveDate> {
    // timestamptz-typed keys come back with a time part
    let date_part = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
        AppError::invalid_format(format!("Invalid stored date '{text}'")).with_source(e)
    })
}

fn parse_timestamp(text: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%#z"))
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| {
            AppError::invalid_format(format!("Invalid stored timestamp '{text}'")).with_source(e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompletionSubmission;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    #[test]
    fn test_logged_patch_only_names_own_columns() {
        let submission =
            CompletionSubmission::from_parts(Some(7), Some("5:30"), Some("felt good")).unwrap();
        let patch = CompletionPatch::logged(date(), Athlete::Thomas, Utc::now(), submission);

        let row = patch_to_json(&patch);
        let object = row.as_object().unwrap();
        assert_eq!(object["dato"], "2025-01-06");
        assert_eq!(object["thomas_fullfort"], true);
        assert_eq!(object["thomas_rpe"], 7);
        assert!(object.keys().all(|key| key == "dato" || key.starts_with("thomas_")));
    }

    #[test]
    fn test_coach_comment_patch_is_single_column() {
        let patch = CompletionPatch::coach_comment(date(), Athlete::Monika, "Sterk økt!");
        let columns = patch_columns(&patch);
        assert_eq!(
            columns,
            vec![(
                "trener_monika_kommentar".to_owned(),
                ColumnValue::Text("Sterk økt!".into())
            )]
        );
    }

    #[test]
    fn test_partial_row_decodes_with_defaults() {
        let row = json!({
            "dato": "2025-01-06",
            "thomas_fullfort": true,
            "thomas_fullfort_tidspunkt": "2025-01-06T10:00:00+00:00",
            "thomas_rpe": 7,
            "thomas_actual_pace": "5:30",
            "thomas_kommentar": "felt good",
            "monika_fullfort": null
        });
        let record = record_from_json(row.as_object().unwrap()).unwrap();

        let thomas = record.athlete(Athlete::Thomas);
        assert!(thomas.completed);
        assert_eq!(thomas.rpe, Some(7));
        assert_eq!(
            thomas.completed_at.map(|t| t.to_rfc3339()),
            Some("2025-01-06T10:00:00+00:00".to_owned())
        );
        assert_eq!(record.athlete(Athlete::Monika), AthleteCompletion::default());
    }

    #[test]
    fn test_invalid_timestamp_is_reported() {
        let row = json!({ "dato": "2025-01-06", "monika_fullfort_tidspunkt": "yesterday" });
        let err = record_from_json(row.as_object().unwrap()).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::InvalidFormat);
    }
}
