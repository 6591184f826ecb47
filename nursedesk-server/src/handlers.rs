//! Request handlers for the `/api/nurses` resource.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use nursedesk_core::{NurseInput, NurseRecord};
use serde_json::{json, Value};

type ApiResult<T> = Result<T, ApiError>;

fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid nurse id: {raw}")))
}

pub async fn list_nurses(State(state): State<AppState>) -> ApiResult<Json<Vec<NurseRecord>>> {
    Ok(Json(state.with_store(|store| store.list()).await?))
}

pub async fn get_nurse(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<NurseRecord>> {
    let id = parse_id(&id)?;
    Ok(Json(state.with_store(move |store| store.get(id)).await?))
}

pub async fn create_nurse(
    State(state): State<AppState>,
    body: Result<Json<NurseInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<NurseRecord>)> {
    let Json(input) = body?;
    let fields = input.validate()?;

    let record = state.with_store(move |store| store.insert(&fields)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_nurse(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<NurseInput>, JsonRejection>,
) -> ApiResult<Json<NurseRecord>> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    let fields = input.validate()?;

    let record = state
        .with_store(move |store| store.update(id, &fields))
        .await?;
    Ok(Json(record))
}

pub async fn delete_nurse(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;

    state.with_store(move |store| store.delete(id)).await?;
    Ok(Json(json!({
        "message": "Nurse deleted successfully",
        "id": id,
    })))
}

pub async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let count = state.with_store(|store| store.count()).await?;
    Ok(Json(json!({
        "status": "ok",
        "nurses": count,
    })))
}
