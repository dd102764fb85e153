//! Integration tests for the `/api/phonebook-entries` resource.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{Value, json};

const BASE: &str = "/api/phonebook-entries";
const NUMBERS: &str = "/api/phone-numbers";

const DEFAULT_DESCRIPTION: &str = "AAAAAAAAAA";
const UPDATED_DESCRIPTION: &str = "BBBBBBBBBB";

async fn create_entry(app: &TestApp, description: &str) -> i64 {
    let response = app.post(BASE, json!({ "description": description })).await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.id()
}

async fn add_number(app: &TestApp, entry_id: i64, number: &str) -> i64 {
    let response = app
        .post(NUMBERS, json!({ "number": number, "phonebookEntry": { "id": entry_id } }))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.id()
}

fn member_numbers(entry: &Value) -> Vec<String> {
    entry["phoneNumbers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["number"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn create_phonebook_entry() {
    let app = TestApp::spawn().await;
    let before = app.count(BASE).await;

    let response = app.post(BASE, json!({ "description": DEFAULT_DESCRIPTION })).await;

    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.id();
    assert_eq!(response.body["description"], DEFAULT_DESCRIPTION);
    assert_eq!(response.body["phoneNumbers"], json!([]));
    assert_eq!(response.header("location"), Some(format!("{BASE}/{id}").as_str()));
    assert_eq!(response.alert(), Some("phonebook.phonebookEntry.created"));
    assert_eq!(response.params(), Some(id.to_string().as_str()));
    assert_eq!(app.count(BASE).await, before + 1);
}

#[tokio::test]
async fn create_phonebook_entry_with_existing_id() {
    let app = TestApp::spawn().await;

    let response = app
        .post(BASE, json!({ "id": 1, "description": DEFAULT_DESCRIPTION }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_key(), "idexists");
    assert_eq!(response.body["entityName"], "phonebookEntry");
    assert_eq!(response.error(), Some("error.idexists"));
    assert_eq!(response.params(), Some("phonebookEntry"));
    assert_eq!(app.count(BASE).await, 0);
}

#[tokio::test]
async fn description_is_required() {
    let app = TestApp::spawn().await;

    let response = app.post(BASE, json!({})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_key(), "validation");
    assert_eq!(response.body["fieldErrors"][0]["objectName"], "phonebookEntry");
    assert_eq!(response.body["fieldErrors"][0]["field"], "description");
    assert_eq!(app.count(BASE).await, 0);
}

#[tokio::test]
async fn get_all_phonebook_entries() {
    let app = TestApp::spawn().await;
    let id = create_entry(&app, DEFAULT_DESCRIPTION).await;

    let response = app.get(&format!("{BASE}?sort=id,desc")).await;

    assert_eq!(response.status, StatusCode::OK);
    let all = response.body.as_array().unwrap();
    assert!(all.iter().any(|e| e["id"] == id && e["description"] == DEFAULT_DESCRIPTION));
}

#[tokio::test]
async fn get_all_sorted_by_description() {
    let app = TestApp::spawn().await;
    create_entry(&app, "bob").await;
    create_entry(&app, "alice").await;

    let response = app.get(&format!("{BASE}?sort=description,asc")).await;

    assert_eq!(response.body[0]["description"], "alice");
    assert_eq!(response.body[1]["description"], "bob");
}

#[tokio::test]
async fn unknown_sort_direction_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.get(&format!("{BASE}?sort=description,sideways")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_key(), "sortinvalid");
}

#[tokio::test]
async fn list_groups_numbers_under_their_entries() {
    let app = TestApp::spawn().await;
    let home = create_entry(&app, "home").await;
    let work = create_entry(&app, "work").await;
    add_number(&app, home, "111").await;
    add_number(&app, work, "222").await;
    add_number(&app, home, "333").await;

    let response = app.get(&format!("{BASE}?sort=id")).await;

    assert_eq!(response.body[0]["id"], home);
    assert_eq!(member_numbers(&response.body[0]), vec!["111", "333"]);
    assert_eq!(response.body[1]["id"], work);
    assert_eq!(member_numbers(&response.body[1]), vec!["222"]);
}

#[tokio::test]
async fn get_phonebook_entry_with_numbers() {
    let app = TestApp::spawn().await;
    let id = create_entry(&app, DEFAULT_DESCRIPTION).await;
    let number_id = add_number(&app, id, "5551234").await;

    let response = app.get(&format!("{BASE}/{id}")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["description"], DEFAULT_DESCRIPTION);
    assert_eq!(
        response.body["phoneNumbers"],
        json!([{ "id": number_id, "number": "5551234" }])
    );
}

#[tokio::test]
async fn get_nonexisting_phonebook_entry() {
    let app = TestApp::spawn().await;

    let response = app.get(&format!("{BASE}/{}", i64::MAX)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_existing_phonebook_entry() {
    let app = TestApp::spawn().await;
    let id = create_entry(&app, DEFAULT_DESCRIPTION).await;
    add_number(&app, id, "111").await;

    let response = app
        .put(&format!("{BASE}/{id}"), json!({ "id": id, "description": UPDATED_DESCRIPTION }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["description"], UPDATED_DESCRIPTION);
    assert_eq!(member_numbers(&response.body), vec!["111"]);
    assert_eq!(response.alert(), Some("phonebook.phonebookEntry.updated"));

    // Members see the new description through their back-reference.
    let numbers = app.get(NUMBERS).await;
    assert_eq!(numbers.body[0]["phonebookEntry"]["description"], UPDATED_DESCRIPTION);
}

#[tokio::test]
async fn put_nonexisting_phonebook_entry() {
    let app = TestApp::spawn().await;

    let response = app
        .put(&format!("{BASE}/4242"), json!({ "id": 4242, "description": DEFAULT_DESCRIPTION }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_key(), "idnotfound");
    assert_eq!(app.count(BASE).await, 0);
}

#[tokio::test]
async fn put_with_id_mismatch() {
    let app = TestApp::spawn().await;
    let id = create_entry(&app, DEFAULT_DESCRIPTION).await;

    let response = app
        .put(&format!("{BASE}/{id}"), json!({ "id": id + 1, "description": UPDATED_DESCRIPTION }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_key(), "idinvalid");
}

#[tokio::test]
async fn put_without_path_id() {
    let app = TestApp::spawn().await;
    let id = create_entry(&app, DEFAULT_DESCRIPTION).await;

    let response = app
        .put(BASE, json!({ "id": id, "description": UPDATED_DESCRIPTION }))
        .await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn partial_update_phonebook_entry() {
    let app = TestApp::spawn().await;
    let id = create_entry(&app, DEFAULT_DESCRIPTION).await;
    add_number(&app, id, "111").await;

    let response = app
        .patch(&format!("{BASE}/{id}"), json!({ "id": id, "description": UPDATED_DESCRIPTION }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["description"], UPDATED_DESCRIPTION);
    assert_eq!(member_numbers(&response.body), vec!["111"]);
}

#[tokio::test]
async fn partial_update_without_fields_changes_nothing() {
    let app = TestApp::spawn().await;
    let id = create_entry(&app, DEFAULT_DESCRIPTION).await;

    let response = app.patch(&format!("{BASE}/{id}"), json!({ "id": id })).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["description"], DEFAULT_DESCRIPTION);
}

#[tokio::test]
async fn partial_update_nonexisting_phonebook_entry() {
    let app = TestApp::spawn().await;

    let response = app
        .patch(&format!("{BASE}/4242"), json!({ "id": 4242, "description": UPDATED_DESCRIPTION }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_key(), "idnotfound");
}

#[tokio::test]
async fn partial_update_without_payload_id() {
    let app = TestApp::spawn().await;
    let id = create_entry(&app, DEFAULT_DESCRIPTION).await;

    let response = app
        .patch(&format!("{BASE}/{id}"), json!({ "description": UPDATED_DESCRIPTION }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_key(), "idnull");
}

#[tokio::test]
async fn partial_update_without_path_id() {
    let app = TestApp::spawn().await;

    let response = app.patch(BASE, json!({ "id": 1, "description": UPDATED_DESCRIPTION })).await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn delete_phonebook_entry_unlinks_numbers() {
    let app = TestApp::spawn().await;
    let id = create_entry(&app, DEFAULT_DESCRIPTION).await;
    let number_id = add_number(&app, id, "111").await;

    let response = app.delete(&format!("{BASE}/{id}")).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(response.alert(), Some("phonebook.phonebookEntry.deleted"));
    assert_eq!(app.count(BASE).await, 0);
    assert_eq!(app.get(&format!("{BASE}/{id}")).await.status, StatusCode::NOT_FOUND);

    let number = app.get(&format!("{NUMBERS}/{number_id}")).await;
    assert_eq!(number.status, StatusCode::OK);
    assert_eq!(number.body["phonebookEntry"], Value::Null);
}

#[tokio::test]
async fn non_numeric_path_id_is_rejected() {
    let app = TestApp::spawn().await;
    let id = create_entry(&app, DEFAULT_DESCRIPTION).await;

    let response = app
        .put(&format!("{BASE}/abc"), json!({ "id": id, "description": UPDATED_DESCRIPTION }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_key(), "idinvalid");
    assert_eq!(response.params(), Some("phonebookEntry"));
    let stored = app.get(&format!("{BASE}/{id}")).await;
    assert_eq!(stored.body["description"], DEFAULT_DESCRIPTION);
}

#[tokio::test]
async fn malformed_query_string_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.get(&format!("{BASE}?sort=id&sort=description")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_key(), "queryinvalid");
}
