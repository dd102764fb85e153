//! REST resources for phone numbers and phonebook entries.
//!
//! Both resources follow the same template under `/api/{resource}`:
//! POST creates, PUT replaces, PATCH merges, GET lists or fetches one, DELETE
//! removes. The shared request flow lives in [`crud`].

mod crud;
pub mod headers;
mod phone_numbers;
mod phonebook_entries;

use crate::db::Database;
use crate::error::ApiError;
use crate::telemetry;
use axum::Router;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::header::InvalidHeaderName;
use axum::middleware;
use axum::routing::get;
use headers::AlertHeaders;
use serde::Deserialize;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    db: Database,
    alerts: Arc<AlertHeaders>,
}

impl AppState {
    /// Fails if `app_name` cannot be part of an HTTP header name.
    pub fn new(db: Database, app_name: &str) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            db,
            alerts: Arc::new(AlertHeaders::new(app_name)?),
        })
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}

/// Query string of the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// `property[,asc|desc]`
    pub sort: Option<String>,
}

/// Path id; anything that does not parse as an `i64` is `idinvalid`.
fn path_id(
    entity_name: &'static str,
    path: Result<Path<i64>, PathRejection>,
) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::path_invalid(entity_name, &rejection))
}

fn list_params(
    entity_name: &'static str,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<ListParams, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::query_invalid(entity_name, &rejection))
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            phone_numbers::BASE_PATH,
            get(phone_numbers::list).post(phone_numbers::create),
        )
        .route(
            "/api/phone-numbers/:id",
            get(phone_numbers::get_one)
                .put(phone_numbers::update)
                .patch(phone_numbers::partial_update)
                .delete(phone_numbers::delete),
        )
        .route(
            phonebook_entries::BASE_PATH,
            get(phonebook_entries::list).post(phonebook_entries::create),
        )
        .route(
            "/api/phonebook-entries/:id",
            get(phonebook_entries::get_one)
                .put(phonebook_entries::update)
                .patch(phonebook_entries::partial_update)
                .delete(phonebook_entries::delete),
        )
        .layer(middleware::map_response_with_state(
            state.clone(),
            headers::render_alerts,
        ))
        .layer(middleware::from_fn(telemetry::trace_request))
        .with_state(state)
}
