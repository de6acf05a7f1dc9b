// ABOUTME: Completion routes for logging sessions, listing records and the plan board
// ABOUTME: Thin handlers mapping JSON requests onto the completion service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Completion routes
//!
//! - `POST /api/completions`: log a session (`409` already logged, `403` past cutoff)
//! - `GET /api/completions`: every stored record ordered by date
//! - `GET /api/board?user=`: the plan joined with stored records for one athlete

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use super::{json_body, parse_rpe, require_date, require_user};
use crate::errors::AppError;
use crate::server::ServerResources;
use crate::services::CompletionInput;

/// Body of `POST /api/completions`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    /// Acting athlete
    pub user: Option<String>,
    /// Plan date (`YYYY-MM-DD`)
    pub date: Option<String>,
    /// Requested completion flag
    pub completed: Option<bool>,
    /// Rate of perceived exertion, number or numeric text
    pub rpe: Option<Value>,
    /// Pace actually run
    pub pace: Option<String>,
    /// The athlete's own comment
    pub user_comment: Option<String>,
}

/// Query of `GET /api/board`
#[derive(Debug, Deserialize)]
pub struct BoardQuery {
    /// Acting athlete
    pub user: Option<String>,
}

/// Completion routes handler
pub struct CompletionRoutes;

impl CompletionRoutes {
    /// Create all completion routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/completions",
                get(Self::handle_list).post(Self::handle_submit),
            )
            .route("/api/board", get(Self::handle_board))
            .with_state(resources)
    }

    /// Handle POST /api/completions
    async fn handle_submit(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<CompletionRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let body = json_body(body)?;
        let athlete = require_user(body.user.as_deref())?;
        let date = require_date(body.date.as_deref())?;
        let completed = body
            .completed
            .ok_or_else(|| AppError::missing_field("completed"))?;

        let input = CompletionInput {
            rpe: parse_rpe(body.rpe.as_ref())?,
            pace: body.pace,
            user_comment: body.user_comment,
        };

        let outcome = resources
            .completions
            .submit(athlete, date, completed, input, Utc::now())
            .await?;

        Ok((StatusCode::OK, Json(outcome)).into_response())
    }

    /// Handle GET /api/completions
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let records = resources.completions.records().await?;
        Ok((StatusCode::OK, Json(records)).into_response())
    }

    /// Handle GET /api/board
    async fn handle_board(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<BoardQuery>,
    ) -> Result<Response, AppError> {
        let athlete = require_user(query.user.as_deref())?;
        let board = resources.completions.board(athlete, Utc::now()).await?;

        Ok((StatusCode::OK, Json(board)).into_response())
    }
}
