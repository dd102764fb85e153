//! Request flow shared by both resources.
//!
//! Each function is one stateless transition: check ids, check existence
//! where needed, make the persistence call, and map the outcome to a
//! response. Payload parsing and validation stay in the resource modules.

use super::ListParams;
use super::headers::Alert;
use crate::db::{CrudRepository, DbError, Sort};
use crate::domain::Entity;
use crate::error::ApiError;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};

fn entity_name<R: CrudRepository>() -> &'static str {
    <R::Entity as Entity>::ENTITY_NAME
}

fn assigned_id<R: CrudRepository>(saved: &R::Entity) -> Result<i64, ApiError> {
    saved.id().ok_or_else(|| ApiError::Internal {
        entity_name: entity_name::<R>(),
        source: DbError::Internal("saved record has no id".to_string()),
    })
}

/// Insert a new record. The payload must not carry an id.
pub(crate) async fn create<R: CrudRepository>(
    repo: &R,
    payload_id: Option<i64>,
    entity: R::Entity,
    base_path: &str,
) -> Result<Response, ApiError> {
    let entity_name = entity_name::<R>();
    if payload_id.is_some() {
        return Err(ApiError::IdExists { entity_name });
    }

    let saved = repo
        .save(entity)
        .await
        .map_err(|e| ApiError::from_db(entity_name, e))?;
    let id = assigned_id::<R>(&saved)?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("{base_path}/{id}"))],
        Extension(Alert::created(entity_name, id)),
        Json(saved),
    )
        .into_response())
}

/// Payload id must be present, match the path id, and exist in the store.
pub(crate) async fn ensure_updatable<R: CrudRepository>(
    repo: &R,
    path_id: i64,
    payload_id: Option<i64>,
) -> Result<(), ApiError> {
    let entity_name = entity_name::<R>();
    let Some(payload_id) = payload_id else {
        return Err(ApiError::IdNull { entity_name });
    };
    if payload_id != path_id {
        return Err(ApiError::IdInvalid { entity_name });
    }

    let exists = repo
        .exists_by_id(path_id)
        .await
        .map_err(|e| ApiError::from_db(entity_name, e))?;
    if !exists {
        return Err(ApiError::IdNotFound { entity_name });
    }
    Ok(())
}

/// Full replacement of an existing record.
pub(crate) async fn replace<R: CrudRepository>(
    repo: &R,
    path_id: i64,
    payload_id: Option<i64>,
    entity: R::Entity,
) -> Result<Response, ApiError> {
    let entity_name = entity_name::<R>();
    ensure_updatable(repo, path_id, payload_id).await?;

    let saved = repo
        .save(entity.with_id(path_id))
        .await
        .map_err(|e| ApiError::from_db(entity_name, e))?;

    Ok((Extension(Alert::updated(entity_name, path_id)), Json(saved)).into_response())
}

/// Merge-patch: load the record, let `merge` overwrite supplied fields, save.
pub(crate) async fn partial_update<R, F>(
    repo: &R,
    path_id: i64,
    payload_id: Option<i64>,
    merge: F,
) -> Result<Response, ApiError>
where
    R: CrudRepository,
    F: FnOnce(&mut R::Entity) + Send,
{
    let entity_name = entity_name::<R>();
    ensure_updatable(repo, path_id, payload_id).await?;

    // Gone between the existence check and the load: plain 404.
    let mut existing = repo
        .find_by_id(path_id)
        .await
        .map_err(|e| ApiError::from_db(entity_name, e))?
        .ok_or(ApiError::NotFound)?;
    merge(&mut existing);

    let saved = repo
        .save(existing)
        .await
        .map_err(|e| ApiError::from_db(entity_name, e))?;

    Ok((Extension(Alert::updated(entity_name, path_id)), Json(saved)).into_response())
}

pub(crate) async fn find_all<R: CrudRepository>(
    repo: &R,
    params: &ListParams,
) -> Result<Response, ApiError> {
    let entity_name = entity_name::<R>();
    let sort = Sort::parse(params.sort.as_deref(), R::SORT_COLUMNS)
        .map_err(|source| ApiError::SortInvalid {
            entity_name,
            source,
        })?;

    let all = repo
        .find_all(&sort)
        .await
        .map_err(|e| ApiError::from_db(entity_name, e))?;
    Ok(Json(all).into_response())
}

pub(crate) async fn find_one<R: CrudRepository>(repo: &R, id: i64) -> Result<Response, ApiError> {
    let entity_name = entity_name::<R>();
    let found = repo
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::from_db(entity_name, e))?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(found).into_response())
}

/// Unconditional delete; absent ids still answer 204.
pub(crate) async fn remove<R: CrudRepository>(repo: &R, id: i64) -> Result<Response, ApiError> {
    let entity_name = entity_name::<R>();
    let removed = repo
        .delete_by_id(id)
        .await
        .map_err(|e| ApiError::from_db(entity_name, e))?;
    if !removed {
        tracing::debug!(entity = entity_name, id, "Delete matched no record");
    }

    Ok((StatusCode::NO_CONTENT, Extension(Alert::deleted(entity_name, id))).into_response())
}
