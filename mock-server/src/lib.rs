//! In-memory stand-in for the Vika datasheet records API.
//!
//! Serves `/fusion/v1/datasheets/{datasheet_id}/records` with list, create,
//! update and delete, wrapping every reply in the `{code, success, message,
//! data}` envelope. Requests must carry `Authorization: Bearer <token>`.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub record_id: String,
    pub fields: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct NewRecord {
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct CreateRecords {
    pub records: Vec<NewRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    pub record_id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct UpdateRecords {
    pub records: Vec<RecordUpdate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecords {
    pub record_ids: Vec<String>,
}

/// Records per datasheet, in insertion order.
pub type Db = Arc<RwLock<HashMap<String, Vec<Record>>>>;

#[derive(Clone)]
pub struct AppState {
    token: Arc<str>,
    db: Db,
}

type Reply = (StatusCode, Json<Value>);

pub fn app(token: &str) -> Router {
    let state = AppState {
        token: Arc::from(token),
        db: Arc::new(RwLock::new(HashMap::new())),
    };
    Router::new()
        .route(
            "/fusion/v1/datasheets/{datasheet_id}/records",
            get(list_records)
                .post(create_records)
                .patch(update_records)
                .delete(delete_records),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock datasheet API listening");
    }
    axum::serve(listener, app(token)).await
}

fn success(data: Value) -> Reply {
    (
        StatusCode::OK,
        Json(json!({"code": 200, "success": true, "message": "SUCCESS", "data": data})),
    )
}

fn failure(status: StatusCode, message: &str) -> Reply {
    (
        status,
        Json(json!({"code": status.as_u16(), "success": false, "message": message})),
    )
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Reply> {
    let expected = format!("Bearer {}", state.token);
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => {
            debug!("rejecting request with bad token");
            Err(failure(StatusCode::UNAUTHORIZED, "api token is invalid"))
        }
    }
}

fn new_record_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("rec{}", &id[..10])
}

async fn list_records(
    State(state): State<AppState>,
    Path(datasheet_id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    if let Err(reply) = authorize(&state, &headers) {
        return reply;
    }
    let db = state.db.read().await;
    let records = db.get(&datasheet_id).cloned().unwrap_or_default();
    success(json!({"total": records.len(), "records": records}))
}

async fn create_records(
    State(state): State<AppState>,
    Path(datasheet_id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<CreateRecords>,
) -> Reply {
    if let Err(reply) = authorize(&state, &headers) {
        return reply;
    }
    let created: Vec<Record> = input
        .records
        .into_iter()
        .map(|r| Record {
            record_id: new_record_id(),
            fields: r.fields,
        })
        .collect();
    state
        .db
        .write()
        .await
        .entry(datasheet_id)
        .or_default()
        .extend(created.iter().cloned());
    success(json!({"records": created}))
}

async fn update_records(
    State(state): State<AppState>,
    Path(datasheet_id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<UpdateRecords>,
) -> Reply {
    if let Err(reply) = authorize(&state, &headers) {
        return reply;
    }
    let mut db = state.db.write().await;
    let records = db.entry(datasheet_id).or_default();
    if let Some(missing) = input
        .records
        .iter()
        .find(|u| !records.iter().any(|r| r.record_id == u.record_id))
    {
        return failure(
            StatusCode::NOT_FOUND,
            &format!("record {} not found", missing.record_id),
        );
    }

    let mut updated = Vec::with_capacity(input.records.len());
    for update in input.records {
        if let Some(record) = records.iter_mut().find(|r| r.record_id == update.record_id) {
            record.fields.extend(update.fields);
            updated.push(record.clone());
        }
    }
    success(json!({"records": updated}))
}

async fn delete_records(
    State(state): State<AppState>,
    Path(datasheet_id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<DeleteRecords>,
) -> Reply {
    if let Err(reply) = authorize(&state, &headers) {
        return reply;
    }
    let mut db = state.db.write().await;
    let records = db.entry(datasheet_id).or_default();
    let before = records.len();
    records.retain(|r| !input.record_ids.contains(&r.record_id));
    if records.len() == before {
        return failure(StatusCode::NOT_FOUND, "no matching records");
    }
    success(Value::Bool(true))
}
