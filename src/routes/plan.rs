// ABOUTME: Training plan route returning the ordered 8-week program
// ABOUTME: Serves the plan loaded at startup as a JSON array in file order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::server::ServerResources;

/// Training plan routes
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create the plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/training-program", get(Self::handle_training_program))
            .with_state(resources)
    }

    /// Handle GET /api/training-program
    async fn handle_training_program(
        State(resources): State<Arc<ServerResources>>,
    ) -> Response {
        let days = resources.completions.plan().days();
        (StatusCode::OK, Json(days)).into_response()
    }
}
