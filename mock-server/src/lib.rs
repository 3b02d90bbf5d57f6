//! Mock REST API for one model, `Person`, used by the core integration tests.
//!
//! # Wire contract
//! - `GET    /person/meta` — field metadata (`{field: {type, required}}`).
//! - `GET    /persons` — all records, in insertion order.
//! - `GET    /person/{id}` — one record, or `404` with a `null` body.
//! - `POST   /person` — validate and store; `201` with the stored record, or
//!   `422` with `{"errors": [...]}`.
//! - `PUT    /person/{id}` — merge attributes into the stored record; `404`
//!   with `null` when absent, `422` with `errors` on validation failure.
//! - `DELETE /person/{id}` — `{"deleted": true}`, or `404` with `null`.
//!
//! Error-coded responses always carry a JSON body; the core client decodes
//! those bodies as ordinary data instead of failing.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// One stored record: a loose JSON object, like the real API would hold.
pub type Record = Map<String, Value>;

/// Records in insertion order; lookups go through the `id` field.
pub type Db = Arc<RwLock<Vec<Record>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/person/meta", get(meta))
        .route("/persons", get(list_persons))
        .route("/person", post(create_person))
        .route(
            "/person/{id}",
            get(get_person).put(update_person).delete(delete_person),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn meta() -> Json<Value> {
    Json(json!({
        "name": {"type": "String", "required": true},
        "email": {"type": "String", "required": false}
    }))
}

async fn list_persons(State(db): State<Db>) -> Json<Value> {
    let records = db.read().await;
    Json(Value::Array(
        records.iter().cloned().map(Value::Object).collect(),
    ))
}

async fn get_person(State(db): State<Db>, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    let records = db.read().await;
    match records.iter().find(|r| record_id(r) == Some(id.as_str())) {
        Some(record) => (StatusCode::OK, Json(Value::Object(record.clone()))),
        None => (StatusCode::NOT_FOUND, Json(Value::Null)),
    }
}

async fn create_person(
    State(db): State<Db>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut record = match body {
        Value::Object(map) => map,
        _ => return not_an_object(),
    };
    let errors = validation_errors(&record);
    if !errors.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"errors": errors})),
        );
    }
    if !record.contains_key("id") {
        record.insert("id".to_string(), json!(Uuid::new_v4().to_string()));
    }
    db.write().await.push(record.clone());
    (StatusCode::CREATED, Json(Value::Object(record)))
}

async fn update_person(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let updates = match body {
        Value::Object(map) => map,
        _ => return not_an_object(),
    };
    let mut records = db.write().await;
    let Some(record) = records
        .iter_mut()
        .find(|r| record_id(r) == Some(id.as_str()))
    else {
        return (StatusCode::NOT_FOUND, Json(Value::Null));
    };
    let mut merged = record.clone();
    for (key, value) in updates {
        merged.insert(key, value);
    }
    let errors = validation_errors(&merged);
    if !errors.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"errors": errors})),
        );
    }
    *record = merged.clone();
    (StatusCode::OK, Json(Value::Object(merged)))
}

async fn delete_person(State(db): State<Db>, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    let mut records = db.write().await;
    let before = records.len();
    records.retain(|r| record_id(r) != Some(id.as_str()));
    if records.len() < before {
        (StatusCode::OK, Json(json!({"deleted": true})))
    } else {
        (StatusCode::NOT_FOUND, Json(Value::Null))
    }
}

fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// `name` must be present and a non-empty string.
fn validation_errors(record: &Record) -> Vec<Value> {
    match record.get("name") {
        Some(Value::String(name)) if !name.is_empty() => Vec::new(),
        _ => vec![json!("name is required")],
    }
}

fn not_an_object() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"errors": ["expected a JSON object"]})),
    )
}
