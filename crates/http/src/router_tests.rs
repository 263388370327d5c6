use std::sync::Arc;

use leadsync_core::{ErrorEnvelope, ResourceName};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use super::*;

async fn spawn(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, Arc::new(state)));
    format!("http://{addr}")
}

async fn seeded_labels(count: usize) -> AppState {
    let store = ResourceStore::new();
    let records = (0..count).map(|i| json!({ "title": format!("label-{i}") })).collect();
    store.seed(ResourceName::Labels, records).await;
    AppState::new(store)
}

#[tokio::test]
async fn fetch_returns_list_envelope() {
    let base = spawn(seeded_labels(12).await).await;
    let body: Value = reqwest::get(format!("{base}/labels/fetch?page=2&limit=5"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], 200);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 5);
    let pagination = &body["data"]["pagination"];
    assert_eq!(pagination["totalItems"], 12);
    assert_eq!(pagination["totalPages"], 3);
    assert_eq!(pagination["currentPage"], 2);
    assert_eq!(pagination["hasNextPage"], true);
    assert_eq!(pagination["hasPrevPage"], true);
}

#[tokio::test]
async fn page_zero_is_bad_request_with_error_envelope() {
    let base = spawn(seeded_labels(1).await).await;
    let resp = reqwest::get(format!("{base}/labels/fetch?page=0&limit=5")).await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], 400);
    assert!(body["data"]["message"].is_string());
}

#[tokio::test]
async fn unknown_resource_is_not_found() {
    let base = spawn(AppState::default()).await;
    let resp = reqwest::get(format!("{base}/invoices/fetch")).await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["message"], "unknown resource: invoices");
}

#[tokio::test]
async fn create_edit_delete_cycle() {
    let base = spawn(AppState::default()).await;
    let http = reqwest::Client::new();

    let created: Value = http
        .post(format!("{base}/addons/create"))
        .json(&json!({ "title": "Extra seats", "description": "5 seats", "value": 9.5 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Addons created");
    let id = created["data"]["id"].as_str().unwrap().to_owned();

    let edited: Value = http
        .patch(format!("{base}/addons/edit"))
        .json(&json!({ "id": id, "value": 12 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(edited["data"]["value"], 12);
    assert_eq!(edited["data"]["title"], "Extra seats");

    let deleted = http.delete(format!("{base}/addons/delete/{id}")).send().await.unwrap();
    assert!(deleted.status().is_success());

    let again = http.delete(format!("{base}/addons/delete/{id}")).send().await.unwrap();
    assert_eq!(again.status(), 404);
}

#[tokio::test]
async fn blank_title_is_unprocessable() {
    let base = spawn(AppState::default()).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/labels/create"))
        .json(&json!({ "title": "  ", "color": "#fff" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["message"], "title is required");
}

#[tokio::test]
async fn statuses_accept_update_path() {
    let store = ResourceStore::new();
    store.seed(ResourceName::Statuses, vec![json!({ "id": "s1", "title": "Open" })]).await;
    let base = spawn(AppState::new(store)).await;

    let resp = reqwest::Client::new()
        .patch(format!("{base}/statuses/update"))
        .json(&json!({ "id": "s1", "title": "Closed" }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["title"], "Closed");
}

#[tokio::test]
async fn malformed_bodies_keep_error_envelope() {
    let base = spawn(seeded_labels(1).await).await;
    let http = reqwest::Client::new();

    let missing_id = http
        .patch(format!("{base}/labels/edit"))
        .json(&json!({ "title": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_id.status(), 422);
    let body: ErrorEnvelope = missing_id.json().await.unwrap();
    assert_eq!(body.status, 422);
    assert!(body.message().contains("id"));

    let broken = http
        .post(format!("{base}/labels/create"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(broken.status(), 400);
    let body: ErrorEnvelope = broken.json().await.unwrap();
    assert_eq!(body.status, 400);

    let no_content_type =
        http.post(format!("{base}/labels/create")).body(r#"{"title":"x"}"#).send().await.unwrap();
    assert_eq!(no_content_type.status(), 400);
    let body: ErrorEnvelope = no_content_type.json().await.unwrap();
    assert!(!body.message().is_empty());
}
