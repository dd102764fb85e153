//! Alert headers.
//!
//! Handlers and errors attach an [`Alert`] or [`ErrorAlert`] to the response
//! extensions; [`render_alerts`] turns them into `X-<app>-alert`,
//! `X-<app>-error` and `X-<app>-params` headers once the application name is
//! known.

use super::AppState;
use crate::metrics;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::http::header::{HeaderName, InvalidHeaderName};
use axum::response::Response;

/// Header names derived from the configured application name.
#[derive(Debug, Clone)]
pub struct AlertHeaders {
    app_name: String,
    alert: HeaderName,
    error: HeaderName,
    params: HeaderName,
}

impl AlertHeaders {
    pub fn new(app_name: &str) -> Result<Self, InvalidHeaderName> {
        let header = |suffix: &str| {
            HeaderName::try_from(format!("x-{}-{}", app_name.to_ascii_lowercase(), suffix))
        };
        Ok(Self {
            app_name: app_name.to_string(),
            alert: header("alert")?,
            error: header("error")?,
            params: header("params")?,
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    Created,
    Updated,
    Deleted,
}

impl AlertAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertAction::Created => "created",
            AlertAction::Updated => "updated",
            AlertAction::Deleted => "deleted",
        }
    }
}

/// Successful mutation notice.
#[derive(Debug, Clone)]
pub struct Alert {
    pub action: AlertAction,
    pub entity_name: &'static str,
    pub id: i64,
}

impl Alert {
    pub fn created(entity_name: &'static str, id: i64) -> Self {
        Self {
            action: AlertAction::Created,
            entity_name,
            id,
        }
    }

    pub fn updated(entity_name: &'static str, id: i64) -> Self {
        Self {
            action: AlertAction::Updated,
            entity_name,
            id,
        }
    }

    pub fn deleted(entity_name: &'static str, id: i64) -> Self {
        Self {
            action: AlertAction::Deleted,
            entity_name,
            id,
        }
    }
}

/// Client-input failure notice.
#[derive(Debug, Clone, Copy)]
pub struct ErrorAlert {
    pub entity_name: &'static str,
    pub error_key: &'static str,
}

/// Response middleware rendering alert extensions into headers.
pub async fn render_alerts(State(state): State<AppState>, mut response: Response) -> Response {
    let names = &state.alerts;

    if let Some(alert) = response.extensions_mut().remove::<Alert>() {
        metrics::record_mutation(alert.entity_name, alert.action.as_str());
        let message = format!(
            "{}.{}.{}",
            names.app_name,
            alert.entity_name,
            alert.action.as_str()
        );
        insert(&mut response, &names.alert, message);
        insert(&mut response, &names.params, alert.id.to_string());
    }

    if let Some(failure) = response.extensions_mut().remove::<ErrorAlert>() {
        metrics::record_request_error(failure.entity_name, failure.error_key);
        insert(&mut response, &names.error, format!("error.{}", failure.error_key));
        insert(&mut response, &names.params, failure.entity_name.to_string());
    }

    response
}

fn insert(response: &mut Response, name: &HeaderName, value: String) {
    match HeaderValue::try_from(value) {
        Ok(value) => {
            response.headers_mut().insert(name.clone(), value);
        }
        Err(e) => tracing::warn!(header = %name, error = %e, "Dropping invalid alert header"),
    }
}
