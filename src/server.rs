// ABOUTME: HTTP server assembly for the training tracker
// ABOUTME: Shared resources, router with tracing, request-id and CORS layers, and the serve loop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server
//!
//! [`ServerResources`] is built once at startup and shared by every route
//! through axum state.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{CorsConfig, ServerConfig};
use crate::errors::{AppError, AppResult};
use crate::feedback::FeedbackComposer;
use crate::llm::{GeminiProvider, LlmProvider};
use crate::middleware::setup_cors;
use crate::plan::{PlanLoader, TrainingPlan};
use crate::routes::{CompletionRoutes, FeedbackRoutes, HealthRoutes, PlanRoutes};
use crate::services::CompletionService;
use crate::store::{self, CompletionStore};

/// Everything the routes share
#[derive(Clone)]
pub struct ServerResources {
    /// Completion actions, plan access and feedback
    pub completions: CompletionService,
}

impl ServerResources {
    /// Wire plan, store and optional text-generation provider together
    #[must_use]
    pub fn new(
        plan: Arc<TrainingPlan>,
        store: Arc<dyn CompletionStore>,
        provider: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        let composer = FeedbackComposer::new(store.clone(), plan.clone(), provider);
        Self {
            completions: CompletionService::new(plan, store, composer),
        }
    }

    /// Load the plan, open the store and build the provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the plan cannot be loaded or the store cannot be opened
    pub async fn from_config(config: &ServerConfig) -> AppResult<Self> {
        let plan = Arc::new(PlanLoader::load(&config.plan.path).await?);
        let store = store::from_config(&config.store).await?;

        let provider: Option<Arc<dyn LlmProvider>> = if config.llm.is_enabled() {
            let gemini = GeminiProvider::from_config(&config.llm)?;
            info!(model = %gemini.default_model(), "Coach feedback enabled");
            Some(Arc::new(gemini))
        } else {
            None
        };

        Ok(Self::new(plan, store, provider))
    }
}

/// Build the application router
pub fn build_router(resources: &Arc<ServerResources>, cors: &CorsConfig) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(PlanRoutes::routes(resources.clone()))
        .merge(CompletionRoutes::routes(resources.clone()))
        .merge(FeedbackRoutes::routes(resources.clone()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(setup_cors(cors))
}

/// Bind and serve until the process receives Ctrl+C
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails
pub async fn run(config: &ServerConfig, resources: Arc<ServerResources>) -> AppResult<()> {
    let app = build_router(&resources, &config.cors);

    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .map_err(|e| {
            AppError::config(format!(
                "Invalid listen address {}:{}",
                config.http.host, config.http.port
            ))
            .with_source(e)
        })?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        AppError::internal(format!("Failed to bind to {addr}: {e}")).with_source(e)
    })?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")).with_source(e))?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
