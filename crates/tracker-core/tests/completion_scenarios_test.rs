// ABOUTME: Scenario tests for the completion latch applied to in-memory records
// ABOUTME: Covers logging, cutoff rejection, permanent logging and commuting athlete writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used)]

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use tracker_core::errors::{AppResult, ErrorCode};
use tracker_core::models::{Athlete, CompletionPatch, CompletionRecord, CompletionSubmission};
use tracker_core::policy::{CompletionDecision, CompletionPolicy};

fn session_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
}

fn at(hours: i64) -> DateTime<Utc> {
    session_date().and_time(NaiveTime::MIN).and_utc() + Duration::hours(hours)
}

/// Run one completion request against a record the way the service does
fn submit(
    record: &mut CompletionRecord,
    athlete: Athlete,
    requested: bool,
    submission: CompletionSubmission,
    now: DateTime<Utc>,
) -> AppResult<CompletionDecision> {
    let decision = CompletionPolicy::new().evaluate(
        record.date,
        requested,
        record.is_completed(athlete),
        now,
    )?;
    if let CompletionDecision::Log { completed_at } = decision {
        record.apply(&CompletionPatch::logged(
            record.date,
            athlete,
            completed_at,
            submission,
        ));
    }
    Ok(decision)
}

fn felt_good() -> CompletionSubmission {
    CompletionSubmission::from_parts(Some(7), Some("5:30"), Some("felt good")).unwrap()
}

#[test]
fn test_logging_ten_hours_after_session() {
    let mut record = CompletionRecord::empty(session_date());

    submit(&mut record, Athlete::Thomas, true, felt_good(), at(10)).unwrap();

    let thomas = record.athlete(Athlete::Thomas);
    assert!(thomas.completed);
    assert_eq!(thomas.completed_at, Some(at(10)));
    assert_eq!(thomas.rpe, Some(7));
    assert_eq!(thomas.actual_pace.as_deref(), Some("5:30"));
    assert_eq!(thomas.user_comment.as_deref(), Some("felt good"));
}

#[test]
fn test_logging_fifty_hours_after_session_leaves_record_unchanged() {
    let mut record = CompletionRecord::empty(session_date());
    let before = record.clone();

    let err = submit(&mut record, Athlete::Thomas, true, felt_good(), at(50)).unwrap_err();

    assert_eq!(err.code, ErrorCode::CutoffExceeded);
    assert_eq!(record, before);
}

#[test]
fn test_logged_session_cannot_be_unlogged() {
    let mut record = CompletionRecord::empty(session_date());
    submit(&mut record, Athlete::Thomas, true, felt_good(), at(3)).unwrap();
    let before = record.clone();

    for now in [at(4), at(47), at(200)] {
        let err = submit(&mut record, Athlete::Thomas, false, felt_good(), now).unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyLogged);
        assert_eq!(record, before);
    }
}

#[test]
fn test_athletes_log_the_same_date_independently() {
    let mut record = CompletionRecord::empty(session_date());
    let easy = CompletionSubmission::from_parts(Some(4), Some("7.00"), Some("rolig")).unwrap();

    submit(&mut record, Athlete::Monika, true, easy, at(20)).unwrap();
    submit(&mut record, Athlete::Thomas, true, felt_good(), at(30)).unwrap();

    let monika = record.athlete(Athlete::Monika);
    assert_eq!(monika.rpe, Some(4));
    assert_eq!(monika.completed_at, Some(at(20)));
    assert_eq!(record.athlete(Athlete::Thomas).completed_at, Some(at(30)));
}

#[test]
fn test_completed_at_is_set_iff_completed() {
    let mut record = CompletionRecord::empty(session_date());
    for athlete in Athlete::ALL {
        let cell = record.athlete(athlete);
        assert_eq!(cell.completed, cell.completed_at.is_some());
    }

    submit(&mut record, Athlete::Monika, true, felt_good(), at(1)).unwrap();
    for athlete in Athlete::ALL {
        let cell = record.athlete(athlete);
        assert_eq!(cell.completed, cell.completed_at.is_some());
    }
}
