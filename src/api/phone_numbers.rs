//! `/api/phone-numbers` resource.

use super::{AppState, ListParams, crud, list_params, path_id};
use crate::domain::{Entity, PhoneNumber, PhoneNumberPayload};
use crate::error::ApiError;
use crate::telemetry::RequestTimer;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use tracing::debug;

pub(super) const BASE_PATH: &str = "/api/phone-numbers";

const ENTITY_NAME: &str = PhoneNumber::ENTITY_NAME;

type Body = Result<Json<PhoneNumberPayload>, JsonRejection>;
type PathId = Result<Path<i64>, PathRejection>;

fn read_body(payload: Body) -> Result<PhoneNumberPayload, ApiError> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|rejection| ApiError::body_invalid(ENTITY_NAME, &rejection))
}

/// `POST /api/phone-numbers`
pub async fn create(State(state): State<AppState>, payload: Body) -> Result<Response, ApiError> {
    let _timer = RequestTimer::new(ENTITY_NAME, "create");
    let payload = read_body(payload)?;
    debug!(?payload, "REST request to save PhoneNumber");

    let payload_id = payload.id;
    let number = payload
        .into_phone_number()
        .map_err(|errors| ApiError::validation(ENTITY_NAME, errors))?;
    crud::create(&state.db.phone_numbers(), payload_id, number, BASE_PATH).await
}

/// `PUT /api/phone-numbers/{id}`
pub async fn update(
    State(state): State<AppState>,
    id: PathId,
    payload: Body,
) -> Result<Response, ApiError> {
    let _timer = RequestTimer::new(ENTITY_NAME, "update");
    let id = path_id(ENTITY_NAME, id)?;
    let payload = read_body(payload)?;
    debug!(id, ?payload, "REST request to update PhoneNumber");

    let payload_id = payload.id;
    let number = payload
        .into_phone_number()
        .map_err(|errors| ApiError::validation(ENTITY_NAME, errors))?;
    crud::replace(&state.db.phone_numbers(), id, payload_id, number).await
}

/// `PATCH /api/phone-numbers/{id}`, JSON or merge-patch JSON.
pub async fn partial_update(
    State(state): State<AppState>,
    id: PathId,
    payload: Body,
) -> Result<Response, ApiError> {
    let _timer = RequestTimer::new(ENTITY_NAME, "partial_update");
    let id = path_id(ENTITY_NAME, id)?;
    let payload = read_body(payload)?;
    debug!(id, ?payload, "REST request to partial update PhoneNumber");

    payload
        .check_partial()
        .map_err(|errors| ApiError::validation(ENTITY_NAME, errors))?;
    let payload_id = payload.id;
    crud::partial_update(&state.db.phone_numbers(), id, payload_id, |existing| {
        payload.merge_into(existing)
    })
    .await
}

/// `GET /api/phone-numbers`
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let _timer = RequestTimer::new(ENTITY_NAME, "list");
    let params = list_params(ENTITY_NAME, params)?;
    debug!(sort = ?params.sort, "REST request to get all PhoneNumbers");
    crud::find_all(&state.db.phone_numbers(), &params).await
}

/// `GET /api/phone-numbers/{id}`
pub async fn get_one(State(state): State<AppState>, id: PathId) -> Result<Response, ApiError> {
    let _timer = RequestTimer::new(ENTITY_NAME, "get");
    let id = path_id(ENTITY_NAME, id)?;
    debug!(id, "REST request to get PhoneNumber");
    crud::find_one(&state.db.phone_numbers(), id).await
}

/// `DELETE /api/phone-numbers/{id}`
pub async fn delete(State(state): State<AppState>, id: PathId) -> Result<Response, ApiError> {
    let _timer = RequestTimer::new(ENTITY_NAME, "delete");
    let id = path_id(ENTITY_NAME, id)?;
    debug!(id, "REST request to delete PhoneNumber");
    crud::remove(&state.db.phone_numbers(), id).await
}
