// ABOUTME: Coach feedback route generating and storing AI feedback on request
// ABOUTME: Validates user and date, then delegates to the feedback composer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{json_body, parse_rpe, require_date, require_user};
use crate::errors::AppError;
use crate::feedback::SessionNotes;
use crate::models::{RPE_MAX, RPE_MIN};
use crate::server::ServerResources;

/// Body of `POST /api/generate-feedback`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Acting athlete
    pub user: Option<String>,
    /// Plan date (`YYYY-MM-DD`)
    pub date: Option<String>,
    /// The athlete's own comment
    pub user_comment: Option<String>,
    /// Rate of perceived exertion, number or numeric text
    pub rpe: Option<Value>,
    /// Pace actually run
    pub pace: Option<String>,
}

/// Response of `POST /api/generate-feedback`
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    /// Stored coach feedback
    pub feedback: String,
}

/// Coach feedback routes
pub struct FeedbackRoutes;

impl FeedbackRoutes {
    /// Create the feedback routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/generate-feedback", post(Self::handle_generate))
            .with_state(resources)
    }

    /// Handle POST /api/generate-feedback
    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<FeedbackRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let body = json_body(body)?;
        let athlete = require_user(body.user.as_deref())?;
        let date = require_date(body.date.as_deref())?;

        let rpe = parse_rpe(body.rpe.as_ref())?
            .map(|value| {
                u8::try_from(value)
                    .ok()
                    .filter(|rpe| (RPE_MIN..=RPE_MAX).contains(rpe))
                    .ok_or_else(|| {
                        AppError::out_of_range(format!(
                            "RPE must be between {RPE_MIN} and {RPE_MAX}, got {value}"
                        ))
                    })
            })
            .transpose()?;

        let notes = SessionNotes {
            rpe,
            pace: body.pace,
            user_comment: body.user_comment,
        };

        let feedback = resources
            .completions
            .composer()
            .compose(athlete, date, &notes)
            .await?;

        Ok((StatusCode::OK, Json(FeedbackResponse { feedback })).into_response())
    }
}
