// ABOUTME: Hosted completion store reached through a Supabase PostgREST endpoint
// ABOUTME: Lists rows by date, merges coach comments and logs sessions only while still open
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # PostgREST Completion Store
//!
//! Talks to `{url}/rest/v1/{table}`:
//!
//! - list: `GET ?select=*&order=dato.asc`
//! - get: `GET ?select=*&dato=eq.{date}`
//! - coach comment: `POST ?on_conflict=dato` with
//!   `Prefer: resolution=merge-duplicates,return=minimal`
//! - logging: `PATCH ?dato=eq.{date}&{athlete}_fullfort=not.is.true`, and when
//!   no open row matched, `POST ?on_conflict=dato` with
//!   `Prefer: resolution=ignore-duplicates,return=representation`. An empty
//!   result from both means the session was already logged.
//!
//! Any transport failure or non-2xx response is reported as
//! `StoreUnavailable`; the write was not applied.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Map, Value};
use tracing::{debug, error, instrument};

use super::columns::{
    already_logged, format_date, patch_to_json, record_from_json, write_guard, DATE_COLUMN,
};
use super::CompletionStore;
use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use crate::models::{CompletionPatch, CompletionRecord};

const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=minimal";
const INSERT_PREFER: &str = "resolution=ignore-duplicates,return=representation";
const UPDATE_PREFER: &str = "return=representation";

/// Completion store in a hosted table
pub struct PostgrestCompletionStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl PostgrestCompletionStore {
    /// Create a store for `{base_url}/rest/v1/{table}`
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the HTTP client cannot be built
    pub fn new(base_url: &str, api_key: &str, table: &str) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(defaults::STORE_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                AppError::store_unavailable(format!("Failed to build HTTP client: {e}"))
                    .with_source(e)
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            table: table.to_owned(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(request: RequestBuilder, operation: &str) -> AppResult<Response> {
        let response = request.send().await.map_err(|e| {
            error!(operation, error = %e, "Completion store request failed");
            AppError::store_unavailable(format!("Completion store {operation} failed: {e}"))
                .with_source(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!(operation, status = %status, body = %body, "Completion store rejected request");
        Err(AppError::store_unavailable(format!(
            "Completion store {operation} failed with status {status}: {body}"
        )))
    }

    async fn fetch_rows(&self, query: &[(&str, String)]) -> AppResult<Vec<CompletionRecord>> {
        let request = self.authorized(self.client.get(self.table_url()).query(query));
        let response = Self::send(request, "read").await?;

        let rows: Vec<Map<String, Value>> = response.json().await.map_err(|e| {
            AppError::store_unavailable(format!("Invalid completion store response: {e}"))
                .with_source(e)
        })?;
        rows.iter().map(record_from_json).collect()
    }

    /// Number of rows echoed back by a `return=representation` write
    async fn written_rows(response: Response) -> AppResult<usize> {
        let rows: Vec<Value> = response.json().await.map_err(|e| {
            AppError::store_unavailable(format!("Invalid completion store response: {e}"))
                .with_source(e)
        })?;
        Ok(rows.len())
    }

    async fn merge(&self, patch: &CompletionPatch) -> AppResult<()> {
        let request = self.authorized(
            self.client
                .post(self.table_url())
                .query(&[("on_conflict", DATE_COLUMN)])
                .header("Prefer", UPSERT_PREFER)
                .json(&patch_to_json(patch)),
        );
        Self::send(request, "upsert").await?;
        Ok(())
    }

    /// Write a `Logged` patch only while `flag` is unset for the date
    async fn log_once(&self, patch: &CompletionPatch, flag: &str) -> AppResult<()> {
        let row = patch_to_json(patch);

        let update = self.authorized(
            self.client
                .patch(self.table_url())
                .query(&[
                    (DATE_COLUMN, format!("eq.{}", format_date(patch.date))),
                    (flag, "not.is.true".to_owned()),
                ])
                .header("Prefer", UPDATE_PREFER)
                .json(&row),
        );
        if Self::written_rows(Self::send(update, "update").await?).await? > 0 {
            return Ok(());
        }

        let insert = self.authorized(
            self.client
                .post(self.table_url())
                .query(&[("on_conflict", DATE_COLUMN)])
                .header("Prefer", INSERT_PREFER)
                .json(&row),
        );
        if Self::written_rows(Self::send(insert, "insert").await?).await? == 0 {
            return Err(already_logged(patch));
        }
        Ok(())
    }
}

#[async_trait]
impl CompletionStore for PostgrestCompletionStore {
    fn backend_name(&self) -> &'static str {
        "supabase"
    }

    #[instrument(skip(self))]
    async fn list(&self) -> AppResult<Vec<CompletionRecord>> {
        self.fetch_rows(&[
            ("select", "*".to_owned()),
            ("order", format!("{DATE_COLUMN}.asc")),
        ])
        .await
    }

    #[instrument(skip(self))]
    async fn get(&self, date: NaiveDate) -> AppResult<Option<CompletionRecord>> {
        let mut rows = self
            .fetch_rows(&[
                ("select", "*".to_owned()),
                (DATE_COLUMN, format!("eq.{}", format_date(date))),
            ])
            .await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    #[instrument(skip(self, patch), fields(date = %patch.date, athlete = %patch.athlete))]
    async fn upsert(&self, patch: &CompletionPatch) -> AppResult<()> {
        match write_guard(patch) {
            Some(flag) => self.log_once(patch, &flag).await?,
            None => self.merge(patch).await?,
        }

        debug!("Completion patch stored");
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        let request = self.authorized(
            self.client
                .get(self.table_url())
                .query(&[("select", DATE_COLUMN), ("limit", "1")]),
        );
        Self::send(request, "health check").await?;
        Ok(())
    }
}

impl Debug for PostgrestCompletionStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PostgrestCompletionStore")
            .field("base_url", &self.base_url)
            .field("table", &self.table)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
