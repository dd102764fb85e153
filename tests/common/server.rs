//! In-process test application.
//!
//! Each [`TestApp`] owns its own in-memory database, so tests can run in
//! parallel without seeing each other's records.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use phonebook::api::{self, AppState};
use phonebook::db::Database;
use serde_json::Value;
use tower::ServiceExt;

pub const APP_NAME: &str = "phonebook";

pub const JSON: &str = "application/json";
#[allow(dead_code)]
pub const MERGE_PATCH_JSON: &str = "application/merge-patch+json";

/// A response with its body decoded as JSON (`Value::Null` when empty).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

#[allow(dead_code)]
impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `X-phonebook-alert`
    pub fn alert(&self) -> Option<&str> {
        self.header("x-phonebook-alert")
    }

    /// `X-phonebook-error`
    pub fn error(&self) -> Option<&str> {
        self.header("x-phonebook-error")
    }

    /// `X-phonebook-params`
    pub fn params(&self) -> Option<&str> {
        self.header("x-phonebook-params")
    }

    /// `id` of a returned record.
    pub fn id(&self) -> i64 {
        self.body["id"].as_i64().expect("response body has no id")
    }

    pub fn error_key(&self) -> &str {
        self.body["errorKey"].as_str().unwrap_or_default()
    }
}

pub struct TestApp {
    router: Router,
    pub db: Database,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn spawn() -> Self {
        let db = Database::new(":memory:")
            .await
            .expect("Failed to open in-memory database");
        let state = AppState::new(db.clone(), APP_NAME).expect("Invalid application name");
        Self {
            router: api::router(state),
            db,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        content_type: &str,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, content_type);
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).expect("Failed to build request"))
            .await
            .expect("Router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, JSON).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body), JSON).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body), JSON).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(body), MERGE_PATCH_JSON).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, JSON).await
    }

    /// Number of records in a list endpoint.
    pub async fn count(&self, uri: &str) -> usize {
        let response = self.get(uri).await;
        assert_eq!(response.status, StatusCode::OK);
        response.body.as_array().map_or(0, Vec::len)
    }
}
