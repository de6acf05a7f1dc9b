// ABOUTME: Completion store abstraction with SQLite and hosted PostgREST backends
// ABOUTME: Keyed by plan date; upserts merge so the two athletes' writes commute
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Completion Store
//!
//! One row per plan date with a fixed column block per athlete. Every write
//! is a [`CompletionPatch`] naming only the columns it changes, and both
//! backends upsert with merge-on-conflict by date. Columns outside a patch
//! are never touched.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use crate::config::StoreConfig;
use crate::errors::AppResult;
use crate::models::{CompletionPatch, CompletionRecord};

/// Row encoding shared by the backends
pub mod columns;
/// Hosted table behind a PostgREST endpoint
pub mod postgrest;
/// Local SQLite database
pub mod sqlite;

pub use postgrest::PostgrestCompletionStore;
pub use sqlite::SqliteCompletionStore;

/// Persistence for completion records
#[async_trait]
pub trait CompletionStore: Send + Sync {
    /// Short backend name for logs and readiness output
    fn backend_name(&self) -> &'static str;

    /// All stored records ordered by date ascending
    async fn list(&self) -> AppResult<Vec<CompletionRecord>>;

    /// The stored record for a date, if any row exists
    async fn get(&self, date: NaiveDate) -> AppResult<Option<CompletionRecord>>;

    /// Insert or merge a partial write keyed by date
    ///
    /// A `Logged` patch is only applied while the athlete's completion flag
    /// is unset; otherwise nothing is written and `AlreadyLogged` is returned.
    async fn upsert(&self, patch: &CompletionPatch) -> AppResult<()>;

    /// Verify the store is reachable
    async fn health_check(&self) -> AppResult<()>;
}

/// Build the configured store backend
///
/// # Errors
///
/// Returns `StoreUnavailable` if the backend cannot be initialized
pub async fn from_config(config: &StoreConfig) -> AppResult<Arc<dyn CompletionStore>> {
    let store: Arc<dyn CompletionStore> = match config {
        StoreConfig::Sqlite { url } => Arc::new(SqliteCompletionStore::connect(url).await?),
        StoreConfig::Supabase { url, key, table } => {
            Arc::new(PostgrestCompletionStore::new(url, key, table)?)
        }
    };
    info!(backend = store.backend_name(), "Completion store ready");
    Ok(store)
}
