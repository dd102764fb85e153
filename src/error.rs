//! Unified error handling for the REST API.
//!
//! Every failure maps to an HTTP response; nothing here ends the process.
//! Client-input errors carry an entity-name/error-key pair and render as
//! `application/problem+json`; not-found renders as an empty 404.

use crate::api::headers::ErrorAlert;
use crate::db::{DbError, SortError};
use crate::domain::FieldError;
use axum::Extension;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Errors returned by resource handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("A new {entity_name} cannot already have an ID")]
    IdExists { entity_name: &'static str },

    #[error("Invalid id")]
    IdNull { entity_name: &'static str },

    #[error("Invalid ID")]
    IdInvalid { entity_name: &'static str },

    #[error("Entity not found")]
    IdNotFound { entity_name: &'static str },

    #[error("Method argument not valid")]
    Validation {
        entity_name: &'static str,
        field_errors: Vec<FieldError>,
    },

    #[error("Invalid request body: {message}")]
    BodyInvalid {
        entity_name: &'static str,
        message: String,
    },

    #[error("Invalid sort: {source}")]
    SortInvalid {
        entity_name: &'static str,
        source: SortError,
    },

    #[error("Invalid query string: {message}")]
    QueryInvalid {
        entity_name: &'static str,
        message: String,
    },

    #[error("Referenced entity not found")]
    ReferenceNotFound { entity_name: &'static str },

    #[error("not found")]
    NotFound,

    #[error("internal error: {source}")]
    Internal {
        entity_name: &'static str,
        source: DbError,
    },
}

impl ApiError {
    /// Map a storage failure for the given entity.
    pub fn from_db(entity_name: &'static str, err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => Self::NotFound,
            DbError::MissingReference { .. } => Self::ReferenceNotFound { entity_name },
            source => Self::Internal {
                entity_name,
                source,
            },
        }
    }

    pub fn validation(entity_name: &'static str, field_errors: Vec<FieldError>) -> Self {
        Self::Validation {
            entity_name,
            field_errors,
        }
    }

    pub fn body_invalid(entity_name: &'static str, rejection: &JsonRejection) -> Self {
        Self::BodyInvalid {
            entity_name,
            message: rejection.body_text(),
        }
    }

    /// A path id that is not a valid `i64`.
    pub fn path_invalid(entity_name: &'static str, rejection: &PathRejection) -> Self {
        tracing::debug!(entity = entity_name, error = %rejection.body_text(), "Rejected path id");
        Self::IdInvalid { entity_name }
    }

    pub fn query_invalid(entity_name: &'static str, rejection: &QueryRejection) -> Self {
        Self::QueryInvalid {
            entity_name,
            message: rejection.body_text(),
        }
    }

    /// Static error key, used in problem bodies and as a metrics label.
    #[inline]
    pub fn error_key(&self) -> &'static str {
        match self {
            Self::IdExists { .. } => "idexists",
            Self::IdNull { .. } => "idnull",
            Self::IdInvalid { .. } => "idinvalid",
            Self::IdNotFound { .. } => "idnotfound",
            Self::Validation { .. } => "validation",
            Self::BodyInvalid { .. } => "bodyinvalid",
            Self::SortInvalid { .. } => "sortinvalid",
            Self::QueryInvalid { .. } => "queryinvalid",
            Self::ReferenceNotFound { .. } => "entitynotfound",
            Self::NotFound => "notfound",
            Self::Internal { .. } => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn entity_name(&self) -> Option<&'static str> {
        match self {
            Self::IdExists { entity_name }
            | Self::IdNull { entity_name }
            | Self::IdInvalid { entity_name }
            | Self::IdNotFound { entity_name }
            | Self::Validation { entity_name, .. }
            | Self::BodyInvalid { entity_name, .. }
            | Self::SortInvalid { entity_name, .. }
            | Self::QueryInvalid { entity_name, .. }
            | Self::ReferenceNotFound { entity_name }
            | Self::Internal { entity_name, .. } => Some(*entity_name),
            Self::NotFound => None,
        }
    }
}

/// Problem body for client-input and internal errors.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Problem<'a> {
    title: String,
    status: u16,
    entity_name: &'static str,
    error_key: &'static str,
    message: String,
    params: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<&'a [FieldError]>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_key = self.error_key();

        let Some(entity_name) = self.entity_name() else {
            return status.into_response();
        };

        if let Self::Internal { source, .. } = &self {
            tracing::error!(entity = entity_name, error = %source, "Request failed on storage");
        }

        // Storage details stay in the log.
        let title = match &self {
            Self::Internal { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        };
        let field_errors = match &self {
            Self::Validation { field_errors, .. } => Some(field_errors.as_slice()),
            _ => None,
        };

        let problem = Problem {
            title,
            status: status.as_u16(),
            entity_name,
            error_key,
            message: format!("error.{error_key}"),
            params: entity_name,
            field_errors,
        };

        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Extension(ErrorAlert {
                entity_name,
                error_key,
            }),
            Json(problem),
        )
            .into_response()
    }
}
