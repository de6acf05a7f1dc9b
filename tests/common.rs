// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides a small plan, in-memory stores, a scripted LLM provider and time helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `training_tracker`

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use training_tracker::{
    errors::{AppError, ErrorCode},
    llm::{ChatRequest, ChatResponse, LlmProvider},
    plan::{PlanLoader, TrainingPlan},
    server::ServerResources,
    store::{CompletionStore, SqliteCompletionStore},
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

pub const PLAN_CSV: &str = "\
Dato,Ukedag,Ukenummer,Fokus,Økt_Beskrivelse,Thomas_Pace_Mål,Monika_Pace_Mål,Kommentar
2025-01-06,Mandag,1,Rolig,Rolig løp 6 km,6:00,6:45,Snakketempo
2025-01-07,Tirsdag,1,Intervall,\"Oppvarming 15 min, 5x1000m, nedjogg\",4:45,5:30,
2025-01-08,Onsdag,1,Restitusjon,Hvile,,,Hvile
";

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// `hours` after midnight UTC of `date`
pub fn at(date: NaiveDate, hours: i64) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc() + Duration::hours(hours)
}

pub fn sample_plan() -> Arc<TrainingPlan> {
    Arc::new(PlanLoader::parse_str(PLAN_CSV).unwrap())
}

pub async fn memory_store() -> Arc<SqliteCompletionStore> {
    init_test_logging();
    Arc::new(
        SqliteCompletionStore::connect("sqlite::memory:")
            .await
            .unwrap(),
    )
}

/// Resources over the sample plan, an in-memory store and an optional provider
pub async fn test_resources(
    provider: Option<Arc<dyn LlmProvider>>,
) -> (Arc<ServerResources>, Arc<SqliteCompletionStore>) {
    let store = memory_store().await;
    let shared: Arc<dyn CompletionStore> = store.clone();
    let resources = ServerResources::new(sample_plan(), shared, provider);
    (Arc::new(resources), store)
}

/// LLM provider that answers from a script and records every request
pub struct ScriptedProvider {
    reply: Result<String, ErrorCode>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_owned()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(code: ErrorCode) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(code),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The user prompt of the most recent request
    pub fn last_prompt(&self) -> String {
        self.requests()
            .last()
            .and_then(|request| request.messages.last())
            .map(|message| message.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(ChatResponse {
                content: text.clone(),
                model: "scripted-model".to_owned(),
                usage: None,
                finish_reason: Some("STOP".to_owned()),
            }),
            Err(code) => Err(AppError::new(*code, "scripted failure")),
        }
    }
}
