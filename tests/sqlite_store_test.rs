// ABOUTME: Integration tests for the SQLite completion store
// ABOUTME: Covers lazy records, per-athlete patches, coach comment merges and ordering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use common::{at, date, memory_store};
use tempfile::TempDir;
use training_tracker::errors::ErrorCode;
use training_tracker::models::{Athlete, CompletionPatch, CompletionSubmission};
use training_tracker::store::{CompletionStore, SqliteCompletionStore};

fn submission(rpe: u8, pace: &str, comment: &str) -> CompletionSubmission {
    CompletionSubmission {
        rpe,
        actual_pace: pace.to_owned(),
        user_comment: comment.to_owned(),
    }
}

#[tokio::test]
async fn test_missing_record_reads_as_none() {
    let store = memory_store().await;

    assert!(store.get(date("2025-01-06")).await.unwrap().is_none());
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_logged_patch_round_trips_all_fields() {
    let store = memory_store().await;
    let day = date("2025-01-06");
    let completed_at = at(day, 10);

    store
        .upsert(&CompletionPatch::logged(
            day,
            Athlete::Thomas,
            completed_at,
            submission(7, "5:30", "felt good"),
        ))
        .await
        .unwrap();

    let record = store.get(day).await.unwrap().unwrap();
    let thomas = record.athlete(Athlete::Thomas);
    assert!(thomas.completed);
    assert_eq!(thomas.rpe, Some(7));
    assert_eq!(thomas.actual_pace.as_deref(), Some("5:30"));
    assert_eq!(thomas.user_comment.as_deref(), Some("felt good"));
    assert_eq!(thomas.completed_at, Some(completed_at));
    assert_eq!(thomas.coach_comment, None);

    assert!(!record.is_completed(Athlete::Monika));
}

#[tokio::test]
async fn test_athlete_patches_do_not_overwrite_each_other() {
    let store = memory_store().await;
    let day = date("2025-01-07");

    let thomas = CompletionPatch::logged(day, Athlete::Thomas, at(day, 8), submission(6, "4:50", "tungt"));
    let monika = CompletionPatch::logged(day, Athlete::Monika, at(day, 9), submission(4, "5:35", "lett"));

    store.upsert(&thomas).await.unwrap();
    store.upsert(&monika).await.unwrap();
    let forward = store.get(day).await.unwrap().unwrap();

    let other = memory_store().await;
    other.upsert(&monika).await.unwrap();
    other.upsert(&thomas).await.unwrap();
    let reverse = other.get(day).await.unwrap().unwrap();

    assert_eq!(forward, reverse);
    assert_eq!(forward.athlete(Athlete::Thomas).rpe, Some(6));
    assert_eq!(forward.athlete(Athlete::Monika).rpe, Some(4));
}

#[tokio::test]
async fn test_coach_comment_keeps_logged_fields() {
    let store = memory_store().await;
    let day = date("2025-01-06");

    store
        .upsert(&CompletionPatch::logged(
            day,
            Athlete::Monika,
            at(day, 20),
            submission(8, "5:40", "stiv i leggen"),
        ))
        .await
        .unwrap();
    store
        .upsert(&CompletionPatch::coach_comment(day, Athlete::Monika, "Bra jobba!"))
        .await
        .unwrap();

    let monika = store.get(day).await.unwrap().unwrap().athlete(Athlete::Monika);
    assert!(monika.completed);
    assert_eq!(monika.rpe, Some(8));
    assert_eq!(monika.coach_comment.as_deref(), Some("Bra jobba!"));
}

#[tokio::test]
async fn test_second_logged_patch_is_refused() {
    let store = memory_store().await;
    let day = date("2025-01-06");
    store
        .upsert(&CompletionPatch::coach_comment(day, Athlete::Thomas, "Lykke til!"))
        .await
        .unwrap();

    store
        .upsert(&CompletionPatch::logged(day, Athlete::Thomas, at(day, 7), submission(6, "5:10", "først")))
        .await
        .unwrap();
    let error = store
        .upsert(&CompletionPatch::logged(day, Athlete::Thomas, at(day, 8), submission(2, "7:30", "igjen")))
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::AlreadyLogged);
    let thomas = store.get(day).await.unwrap().unwrap().athlete(Athlete::Thomas);
    assert_eq!(thomas.rpe, Some(6));
    assert_eq!(thomas.completed_at, Some(at(day, 7)));
    assert_eq!(thomas.coach_comment.as_deref(), Some("Lykke til!"));

    store
        .upsert(&CompletionPatch::logged(day, Athlete::Monika, at(day, 9), submission(4, "6:20", "fint")))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_is_ordered_by_date() {
    let store = memory_store().await;

    for value in ["2025-01-08", "2025-01-06", "2025-01-07"] {
        let day = date(value);
        store
            .upsert(&CompletionPatch::coach_comment(day, Athlete::Thomas, value))
            .await
            .unwrap();
    }

    let dates: Vec<_> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.date)
        .collect();
    assert_eq!(
        dates,
        vec![date("2025-01-06"), date("2025-01-07"), date("2025-01-08")]
    );
}

#[tokio::test]
async fn test_file_database_persists_across_connections() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.path().join("tracker.db").display());
    let day = date("2025-01-06");

    {
        let store = SqliteCompletionStore::connect(&url).await.unwrap();
        store
            .upsert(&CompletionPatch::logged(
                day,
                Athlete::Thomas,
                at(day, 1),
                submission(5, "6:00", "rolig"),
            ))
            .await
            .unwrap();
        store.pool().close().await;
    }

    let reopened = SqliteCompletionStore::connect(&url).await.unwrap();
    assert!(reopened.get(day).await.unwrap().unwrap().is_completed(Athlete::Thomas));
    reopened.health_check().await.unwrap();
}
