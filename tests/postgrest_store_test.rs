// ABOUTME: Integration tests for the PostgREST completion store against a local axum stub
// ABOUTME: Verifies query parameters, auth headers, merge-duplicates upserts and error mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use common::{at, date, init_test_logging};
use serde_json::{json, Value};
use training_tracker::errors::ErrorCode;
use training_tracker::models::{Athlete, CompletionPatch, CompletionSubmission};
use training_tracker::store::{CompletionStore, PostgrestCompletionStore};

const TABLE: &str = "treningsprogram";
const API_KEY: &str = "service-role-key";

#[derive(Debug, Clone)]
struct Captured {
    method: &'static str,
    query: HashMap<String, String>,
    headers: HeaderMap,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct StubState {
    rows: Arc<Mutex<Vec<Value>>>,
    captured: Arc<Mutex<Vec<Captured>>>,
    fail_with: Option<StatusCode>,
}

async fn handle_select(
    State(state): State<StubState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    state.captured.lock().unwrap().push(Captured {
        method: "GET",
        query: query.clone(),
        headers,
        body: None,
    });
    if let Some(status) = state.fail_with {
        return (status, Json(json!({"message": "stub failure"}))).into_response();
    }

    let rows: Vec<Value> = state
        .rows
        .lock()
        .unwrap()
        .iter()
        .filter(|row| {
            query.get("dato").map_or(true, |filter| {
                filter.strip_prefix("eq.") == row["dato"].as_str()
            })
        })
        .cloned()
        .collect();
    Json(rows).into_response()
}

fn matches_filters(row: &Value, query: &HashMap<String, String>) -> bool {
    query.iter().all(|(column, filter)| match filter.as_str() {
        "not.is.true" => row[column.as_str()] != Value::Bool(true),
        _ => filter
            .strip_prefix("eq.")
            .map_or(true, |value| row[column.as_str()].as_str() == Some(value)),
    })
}

fn merge_into(row: &mut Value, body: &Value) {
    if let (Some(row), Some(body)) = (row.as_object_mut(), body.as_object()) {
        for (column, value) in body {
            row.insert(column.clone(), value.clone());
        }
    }
}

async fn handle_upsert(
    State(state): State<StubState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let prefer = headers
        .get("prefer")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    state.captured.lock().unwrap().push(Captured {
        method: "POST",
        query,
        headers,
        body: Some(body.clone()),
    });
    if let Some(status) = state.fail_with {
        return status.into_response();
    }

    let mut rows = state.rows.lock().unwrap();
    let existing = rows.iter_mut().find(|row| row["dato"] == body["dato"]);
    match existing {
        Some(row) if prefer.contains("merge-duplicates") => {
            merge_into(row, &body);
            StatusCode::CREATED.into_response()
        }
        Some(_) => (StatusCode::CREATED, Json(json!([]))).into_response(),
        None => {
            rows.push(body.clone());
            (StatusCode::CREATED, Json(json!([body]))).into_response()
        }
    }
}

async fn handle_update(
    State(state): State<StubState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.captured.lock().unwrap().push(Captured {
        method: "PATCH",
        query: query.clone(),
        headers,
        body: Some(body.clone()),
    });
    if let Some(status) = state.fail_with {
        return status.into_response();
    }

    let mut updated = Vec::new();
    for row in state.rows.lock().unwrap().iter_mut() {
        if matches_filters(row, &query) {
            merge_into(row, &body);
            updated.push(row.clone());
        }
    }
    Json(updated).into_response()
}

async fn spawn_stub(state: StubState) -> String {
    init_test_logging();
    let app = Router::new()
        .route(
            &format!("/rest/v1/{TABLE}"),
            get(handle_select).post(handle_upsert).patch(handle_update),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn store(base_url: &str) -> PostgrestCompletionStore {
    PostgrestCompletionStore::new(base_url, API_KEY, TABLE).unwrap()
}

#[tokio::test]
async fn test_list_orders_by_date_and_sends_credentials() {
    let state = StubState::default();
    state.rows.lock().unwrap().extend([
        json!({"dato": "2025-01-06", "thomas_fullfort": true, "thomas_rpe": 7, "monika_fullfort": false}),
        json!({"dato": "2025-01-07", "thomas_fullfort": false, "monika_fullfort": null}),
    ]);
    let base_url = spawn_stub(state.clone()).await;

    let records = store(&base_url).list().await.unwrap();

    assert_eq!(records.len(), 2);
    assert!(records[0].is_completed(Athlete::Thomas));
    assert_eq!(records[0].athlete(Athlete::Thomas).rpe, Some(7));
    assert!(!records[1].is_completed(Athlete::Monika));

    let captured = state.captured.lock().unwrap();
    let request = &captured[0];
    assert_eq!(request.method, "GET");
    assert_eq!(request.query.get("order").map(String::as_str), Some("dato.asc"));
    assert_eq!(request.query.get("select").map(String::as_str), Some("*"));
    assert_eq!(
        request.headers.get("apikey").unwrap().to_str().unwrap(),
        API_KEY
    );
    assert_eq!(
        request.headers.get("authorization").unwrap().to_str().unwrap(),
        format!("Bearer {API_KEY}")
    );
}

#[tokio::test]
async fn test_get_filters_on_date() {
    let state = StubState::default();
    state.rows.lock().unwrap().extend([
        json!({"dato": "2025-01-06", "monika_fullfort": true}),
        json!({"dato": "2025-01-07", "monika_fullfort": false}),
    ]);
    let base_url = spawn_stub(state.clone()).await;
    let store = store(&base_url);

    let record = store.get(date("2025-01-06")).await.unwrap().unwrap();
    assert!(record.is_completed(Athlete::Monika));
    assert!(store.get(date("2025-01-09")).await.unwrap().is_none());

    let captured = state.captured.lock().unwrap();
    assert_eq!(
        captured[0].query.get("dato").map(String::as_str),
        Some("eq.2025-01-06")
    );
}

fn logged(day: chrono::NaiveDate, athlete: Athlete, hour: i64, rpe: u8) -> CompletionPatch {
    CompletionPatch::logged(
        day,
        athlete,
        at(day, hour),
        CompletionSubmission {
            rpe,
            actual_pace: "5:30".to_owned(),
            user_comment: "felt good".to_owned(),
        },
    )
}

#[tokio::test]
async fn test_logging_a_new_day_inserts_only_athlete_columns() {
    let state = StubState::default();
    let base_url = spawn_stub(state.clone()).await;
    let day = date("2025-01-06");

    store(&base_url)
        .upsert(&logged(day, Athlete::Thomas, 10, 7))
        .await
        .unwrap();

    let captured = state.captured.lock().unwrap();
    let update = &captured[0];
    assert_eq!(update.method, "PATCH");
    assert_eq!(update.query.get("dato").map(String::as_str), Some("eq.2025-01-06"));
    assert_eq!(
        update.query.get("thomas_fullfort").map(String::as_str),
        Some("not.is.true")
    );

    let insert = &captured[1];
    assert_eq!(insert.method, "POST");
    assert_eq!(insert.query.get("on_conflict").map(String::as_str), Some("dato"));
    assert_eq!(
        insert.headers.get("prefer").unwrap().to_str().unwrap(),
        "resolution=ignore-duplicates,return=representation"
    );

    let body = insert.body.as_ref().unwrap().as_object().unwrap();
    assert_eq!(body["dato"], "2025-01-06");
    assert_eq!(body["thomas_fullfort"], true);
    assert_eq!(body["thomas_rpe"], 7);
    assert_eq!(body["thomas_actual_pace"], "5:30");
    assert_eq!(body["thomas_kommentar"], "felt good");
    assert!(body.contains_key("thomas_fullfort_tidspunkt"));
    assert!(!body.contains_key("trener_thomas_kommentar"));
    assert!(body.keys().all(|key| !key.contains("monika")));
}

#[tokio::test]
async fn test_logging_updates_an_open_row() {
    let state = StubState::default();
    state.rows.lock().unwrap().push(
        json!({"dato": "2025-01-06", "monika_fullfort": true, "thomas_fullfort": false}),
    );
    let base_url = spawn_stub(state.clone()).await;
    let store = store(&base_url);
    let day = date("2025-01-06");

    store.upsert(&logged(day, Athlete::Thomas, 10, 7)).await.unwrap();

    let record = store.get(day).await.unwrap().unwrap();
    assert!(record.is_completed(Athlete::Thomas));
    assert!(record.is_completed(Athlete::Monika));
    let methods: Vec<_> = state
        .captured
        .lock()
        .unwrap()
        .iter()
        .map(|request| request.method)
        .collect();
    assert_eq!(methods, ["PATCH", "GET"]);
}

#[tokio::test]
async fn test_logging_a_logged_day_is_refused() {
    let state = StubState::default();
    state.rows.lock().unwrap().push(
        json!({"dato": "2025-01-06", "thomas_fullfort": true, "thomas_rpe": 4}),
    );
    let base_url = spawn_stub(state.clone()).await;
    let store = store(&base_url);
    let day = date("2025-01-06");

    let error = store
        .upsert(&logged(day, Athlete::Thomas, 11, 9))
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::AlreadyLogged);
    let thomas = store.get(day).await.unwrap().unwrap().athlete(Athlete::Thomas);
    assert_eq!(thomas.rpe, Some(4));
}

#[tokio::test]
async fn test_coach_comment_merges_duplicates() {
    let state = StubState::default();
    state.rows.lock().unwrap().push(
        json!({"dato": "2025-01-06", "monika_fullfort": true, "monika_rpe": 6}),
    );
    let base_url = spawn_stub(state.clone()).await;
    let store = store(&base_url);
    let day = date("2025-01-06");

    store
        .upsert(&CompletionPatch::coach_comment(day, Athlete::Monika, "Bra!"))
        .await
        .unwrap();

    {
        let captured = state.captured.lock().unwrap();
        let request = &captured[0];
        assert_eq!(request.method, "POST");
        assert_eq!(
            request.headers.get("prefer").unwrap().to_str().unwrap(),
            "resolution=merge-duplicates,return=minimal"
        );
    }
    let monika = store.get(day).await.unwrap().unwrap().athlete(Athlete::Monika);
    assert_eq!(monika.rpe, Some(6));
    assert_eq!(monika.coach_comment.as_deref(), Some("Bra!"));
}

#[tokio::test]
async fn test_server_error_maps_to_store_unavailable() {
    let state = StubState {
        fail_with: Some(StatusCode::INTERNAL_SERVER_ERROR),
        ..StubState::default()
    };
    let base_url = spawn_stub(state).await;
    let store = store(&base_url);

    let error = store.list().await.unwrap_err();
    assert_eq!(error.code, ErrorCode::StoreUnavailable);

    let error = store
        .upsert(&CompletionPatch::coach_comment(
            date("2025-01-06"),
            Athlete::Monika,
            "Bra!",
        ))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::StoreUnavailable);

    assert_eq!(
        store.health_check().await.unwrap_err().code,
        ErrorCode::StoreUnavailable
    );
}

#[tokio::test]
async fn test_unreachable_store_is_unavailable() {
    let store = store("http://127.0.0.1:1");

    let error = store.get(date("2025-01-06")).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::StoreUnavailable);
}

#[test]
fn test_debug_redacts_api_key() {
    let rendered = format!("{:?}", store("https://example.supabase.co"));
    assert!(!rendered.contains(API_KEY));
    assert!(rendered.contains("[REDACTED]"));
}
