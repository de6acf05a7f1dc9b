// ABOUTME: Route module organization for the training tracker HTTP endpoints
// ABOUTME: Groups routes by domain and holds the shared request field parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP routes
//!
//! Each domain module contains only route definitions and thin handlers that
//! delegate to the service layer. The acting user travels in each request
//! body or query string; nothing about the session is kept server-side.

/// Completion logging, stored records and the plan board
pub mod completions;
/// Manual coach feedback generation
pub mod feedback;
/// Health and readiness endpoints
pub mod health;
/// Training plan endpoint
pub mod plan;

pub use completions::CompletionRoutes;
pub use feedback::FeedbackRoutes;
pub use health::HealthRoutes;
pub use plan::PlanRoutes;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use chrono::NaiveDate;
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::models::{Athlete, RPE_MAX, RPE_MIN};

/// Unwrap a JSON body, turning axum's rejection into a 400 error response
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value).map_err(|rejection| {
        AppError::invalid_input(format!("Invalid JSON body: {}", rejection.body_text()))
    })
}

/// Parse the required `user` field
pub(crate) fn require_user(user: Option<&str>) -> AppResult<Athlete> {
    match user.map(str::trim) {
        Some(value) if !value.is_empty() => Athlete::parse(value),
        _ => Err(AppError::missing_field("user")),
    }
}

/// Parse the required `date` field (`YYYY-MM-DD`)
pub(crate) fn require_date(date: Option<&str>) -> AppResult<NaiveDate> {
    match date.map(str::trim) {
        Some(value) if !value.is_empty() => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|e| {
                AppError::invalid_format(format!("Invalid date '{value}', expected YYYY-MM-DD"))
                    .with_source(e)
            }),
        _ => Err(AppError::missing_field("date")),
    }
}

/// Read an RPE sent either as a number or as numeric text
pub(crate) fn parse_rpe(value: Option<&Value>) -> AppResult<Option<i64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_i64()
            .map(Some)
            .ok_or_else(|| rpe_out_of_range(&number.to_string())),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| rpe_out_of_range(text)),
        Some(other) => Err(AppError::invalid_input(format!(
            "RPE must be a number, got {other}"
        ))),
    }
}

fn rpe_out_of_range(value: &str) -> AppError {
    AppError::out_of_range(format!(
        "RPE must be a whole number between {RPE_MIN} and {RPE_MAX}, got {value}"
    ))
}
