// ABOUTME: SQLite completion store backed by sqlx for local use and tests
// ABOUTME: Creates the date-keyed table and merges patches with ON CONFLICT DO UPDATE
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, instrument};

use super::columns::{
    already_logged, format_date, patch_columns, record_from_json, write_guard, ColumnValue,
    DATE_COLUMN,
};
use super::CompletionStore;
use crate::constants::defaults;
use crate::errors::AppResult;
use crate::models::{Athlete, AthleteColumn, CompletionPatch, CompletionRecord};

/// Completion store in a local SQLite database
#[derive(Clone)]
pub struct SqliteCompletionStore {
    pool: SqlitePool,
    table: String,
}

impl SqliteCompletionStore {
    /// Connect to `database_url` and create the completion table
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the database cannot be opened or migrated
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        // Create the database file if it doesn't exist
        let connection_options = if database_url.contains(":memory:") || database_url.contains('?')
        {
            database_url.to_owned()
        } else {
            format!("{database_url}?mode=rwc")
        };

        let pool = SqlitePool::connect(&connection_options).await?;
        Self::with_pool(pool).await
    }

    /// Use an existing pool and create the completion table
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the table cannot be created
    pub async fn with_pool(pool: SqlitePool) -> AppResult<Self> {
        let store = Self {
            pool,
            table: defaults::SUPABASE_TABLE.to_owned(),
        };
        store.migrate().await?;
        Ok(store)
    }

    /// The underlying pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the completion table if missing
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        let mut definitions = vec![format!("{DATE_COLUMN} TEXT PRIMARY KEY")];
        for athlete in Athlete::ALL {
            for column in AthleteColumn::ALL {
                let name = athlete.column(column);
                definitions.push(match column {
                    AthleteColumn::Completed => format!("{name} BOOLEAN NOT NULL DEFAULT false"),
                    AthleteColumn::Rpe => format!("{name} INTEGER"),
                    AthleteColumn::CompletedAt
                    | AthleteColumn::ActualPace
                    | AthleteColumn::UserComment
                    | AthleteColumn::CoachComment => format!("{name} TEXT"),
                });
            }
        }

        let statement = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.table,
            definitions.join(", ")
        );
        sqlx::query(&statement).execute(&self.pool).await?;
        debug!(table = %self.table, "Completion table ready");
        Ok(())
    }

    fn row_to_json(row: &SqliteRow) -> AppResult<Map<String, Value>> {
        let mut object = Map::new();
        let date: String = row.try_get(DATE_COLUMN)?;
        object.insert(DATE_COLUMN.to_owned(), Value::String(date));

        for athlete in Athlete::ALL {
            for column in AthleteColumn::ALL {
                let name = athlete.column(column);
                let value = match column {
                    AthleteColumn::Completed => {
                        Value::Bool(row.try_get::<Option<bool>, _>(name.as_str())?.unwrap_or(false))
                    }
                    AthleteColumn::Rpe => row
                        .try_get::<Option<i64>, _>(name.as_str())?
                        .map_or(Value::Null, Value::from),
                    AthleteColumn::CompletedAt
                    | AthleteColumn::ActualPace
                    | AthleteColumn::UserComment
                    | AthleteColumn::CoachComment => row
                        .try_get::<Option<String>, _>(name.as_str())?
                        .map_or(Value::Null, Value::String),
                };
                object.insert(name, value);
            }
        }
        Ok(object)
    }
}

#[async_trait]
impl CompletionStore for SqliteCompletionStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn list(&self) -> AppResult<Vec<CompletionRecord>> {
        let statement = format!("SELECT * FROM {} ORDER BY {DATE_COLUMN} ASC", self.table);
        let rows = sqlx::query(&statement).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| record_from_json(&Self::row_to_json(row)?))
            .collect()
    }

    async fn get(&self, date: NaiveDate) -> AppResult<Option<CompletionRecord>> {
        let statement = format!("SELECT * FROM {} WHERE {DATE_COLUMN} = ?", self.table);
        let row = sqlx::query(&statement)
            .bind(format_date(date))
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| record_from_json(&Self::row_to_json(&row)?))
            .transpose()
    }

    #[instrument(skip(self, patch), fields(date = %patch.date, athlete = %patch.athlete))]
    async fn upsert(&self, patch: &CompletionPatch) -> AppResult<()> {
        let columns = patch_columns(patch);
        let names: Vec<&str> = columns.iter().map(|(name, _)| name.as_str()).collect();
        let placeholders = vec!["?"; columns.len() + 1].join(", ");
        let updates = names
            .iter()
            .map(|name| format!("{name} = excluded.{name}"))
            .collect::<Vec<_>>()
            .join(", ");

        let guard = write_guard(patch)
            .map(|flag| format!(" WHERE COALESCE({}.{flag}, 0) = 0", self.table))
            .unwrap_or_default();

        let statement = format!(
            "INSERT INTO {table} ({DATE_COLUMN}, {names}) VALUES ({placeholders}) \
             ON CONFLICT({DATE_COLUMN}) DO UPDATE SET {updates}{guard}",
            table = self.table,
            names = names.join(", "),
        );

        let mut query = sqlx::query(&statement).bind(format_date(patch.date));
        for (_, value) in columns {
            query = match value {
                ColumnValue::Bool(flag) => query.bind(flag),
                ColumnValue::Int(number) => query.bind(number),
                ColumnValue::Text(text) => query.bind(text),
            };
        }
        let result = query.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(already_logged(patch));
        }

        debug!("Completion patch stored");
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
