//! `/api/phonebook-entries` resource.
//!
//! Entry bodies only write the description; member numbers are linked from
//! the phone number side.

use super::{AppState, ListParams, crud, list_params, path_id};
use crate::domain::{Entity, PhonebookEntry, PhonebookEntryPayload};
use crate::error::ApiError;
use crate::telemetry::RequestTimer;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use tracing::debug;

pub(super) const BASE_PATH: &str = "/api/phonebook-entries";

const ENTITY_NAME: &str = PhonebookEntry::ENTITY_NAME;

type Body = Result<Json<PhonebookEntryPayload>, JsonRejection>;
type PathId = Result<Path<i64>, PathRejection>;

fn read_body(payload: Body) -> Result<PhonebookEntryPayload, ApiError> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|rejection| ApiError::body_invalid(ENTITY_NAME, &rejection))
}

/// `POST /api/phonebook-entries`
pub async fn create(State(state): State<AppState>, payload: Body) -> Result<Response, ApiError> {
    let _timer = RequestTimer::new(ENTITY_NAME, "create");
    let payload = read_body(payload)?;
    debug!(?payload, "REST request to save PhonebookEntry");

    let payload_id = payload.id;
    let entry = payload
        .into_phonebook_entry()
        .map_err(|errors| ApiError::validation(ENTITY_NAME, errors))?;
    crud::create(&state.db.phonebook_entries(), payload_id, entry, BASE_PATH).await
}

/// `PUT /api/phonebook-entries/{id}`
pub async fn update(
    State(state): State<AppState>,
    id: PathId,
    payload: Body,
) -> Result<Response, ApiError> {
    let _timer = RequestTimer::new(ENTITY_NAME, "update");
    let id = path_id(ENTITY_NAME, id)?;
    let payload = read_body(payload)?;
    debug!(id, ?payload, "REST request to update PhonebookEntry");

    let payload_id = payload.id;
    let entry = payload
        .into_phonebook_entry()
        .map_err(|errors| ApiError::validation(ENTITY_NAME, errors))?;
    crud::replace(&state.db.phonebook_entries(), id, payload_id, entry).await
}

/// `PATCH /api/phonebook-entries/{id}`, JSON or merge-patch JSON.
pub async fn partial_update(
    State(state): State<AppState>,
    id: PathId,
    payload: Body,
) -> Result<Response, ApiError> {
    let _timer = RequestTimer::new(ENTITY_NAME, "partial_update");
    let id = path_id(ENTITY_NAME, id)?;
    let payload = read_body(payload)?;
    debug!(id, ?payload, "REST request to partial update PhonebookEntry");

    let payload_id = payload.id;
    crud::partial_update(&state.db.phonebook_entries(), id, payload_id, |existing| {
        payload.merge_into(existing)
    })
    .await
}

/// `GET /api/phonebook-entries`
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let _timer = RequestTimer::new(ENTITY_NAME, "list");
    let params = list_params(ENTITY_NAME, params)?;
    debug!(sort = ?params.sort, "REST request to get all PhonebookEntries");
    crud::find_all(&state.db.phonebook_entries(), &params).await
}

/// `GET /api/phonebook-entries/{id}`
pub async fn get_one(State(state): State<AppState>, id: PathId) -> Result<Response, ApiError> {
    let _timer = RequestTimer::new(ENTITY_NAME, "get");
    let id = path_id(ENTITY_NAME, id)?;
    debug!(id, "REST request to get PhonebookEntry");
    crud::find_one(&state.db.phonebook_entries(), id).await
}

/// `DELETE /api/phonebook-entries/{id}`
pub async fn delete(State(state): State<AppState>, id: PathId) -> Result<Response, ApiError> {
    let _timer = RequestTimer::new(ENTITY_NAME, "delete");
    let id = path_id(ENTITY_NAME, id)?;
    debug!(id, "REST request to delete PhonebookEntry");
    crud::remove(&state.db.phonebook_entries(), id).await
}
