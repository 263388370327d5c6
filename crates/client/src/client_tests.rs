use std::sync::Arc;

use leadsync_core::resources::{AddonInput, Addons, LabelInput, Labels, StatusInput, Statuses};
use leadsync_core::{ClientConfig, PageRequest};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{ApiClient, ClientError, ResourceApi, ResourceClient};

fn api_for(server: &MockServer) -> Arc<ApiClient> {
    let config = ClientConfig::default()
        .with_base_url(format!("{}/", server.uri()))
        .with_token("test-token")
        .with_workspace("ws-1");
    Arc::new(ApiClient::new(&config).unwrap())
}

fn addon_page_body() -> serde_json::Value {
    serde_json::json!({
        "message": "Addons fetched",
        "status": 200,
        "data": {
            "items": [
                {"id": "a2", "title": "Seats", "value": 5.0},
                {"id": "a1", "title": "Storage", "value": 9.5}
            ],
            "pagination": {
                "totalItems": 12, "totalPages": 2, "currentPage": 1,
                "limit": 10, "hasNextPage": true, "hasPrevPage": false
            }
        }
    })
}

#[tokio::test]
async fn fetch_page_sends_query_and_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/addons/fetch"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("x-workspace-id", "ws-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(addon_page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client: ResourceClient<Addons> = api_for(&server).resource();
    let page = client.fetch_page(PageRequest::first()).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, "a2", "server order is preserved");
    assert_eq!(page.pagination.total_items, 12);
    assert!(page.pagination.is_consistent(page.items.len()));
}

#[tokio::test]
async fn create_posts_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/addons/create"))
        .and(body_json(serde_json::json!({"title": "Seats", "value": 5.0})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "success": true,
            "message": "Addon created",
            "data": {"id": "a3", "title": "Seats", "value": 5.0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client: ResourceClient<Addons> = api_for(&server).resource();
    let input = AddonInput { title: "Seats".to_owned(), description: None, value: 5.0 };
    let response = client.create(&input).await.unwrap();

    assert!(response.success);
    assert_eq!(response.data.unwrap().id, "a3");
}

#[tokio::test]
async fn update_flattens_id_into_body_on_edit_path() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/labels/edit"))
        .and(body_json(serde_json::json!({"id": "l1", "title": "Hot", "color": "#f00"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "Label updated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client: ResourceClient<Labels> = api_for(&server).resource();
    let input = LabelInput { title: "Hot".to_owned(), color: Some("#f00".to_owned()) };
    let response = client.update("l1", &input).await.unwrap();
    assert_eq!(response.message, "Label updated");
    assert!(response.data.is_none());
}

#[tokio::test]
async fn update_uses_resource_specific_path() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/statuses/update"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "Status updated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client: ResourceClient<Statuses> = api_for(&server).resource();
    let input = StatusInput { title: "Won".to_owned(), color: None, position: Some(3) };
    client.update("s1", &input).await.unwrap();
}

#[tokio::test]
async fn delete_hits_id_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/labels/delete/l9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "Label deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client: ResourceClient<Labels> = api_for(&server).resource();
    client.delete("l9").await.unwrap();
}

#[tokio::test]
async fn delete_escapes_id_into_one_segment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/labels/delete/a%2Fb%3Fc%23d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "Label deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client: ResourceClient<Labels> = api_for(&server).resource();
    client.delete("a/b?c#d").await.unwrap();
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/labels/delete/l9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "Label deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::default().with_base_url(format!("{}/api/v1/", server.uri()));
    let api = Arc::new(ApiClient::new(&config).unwrap());
    api.resource::<Labels>().delete("l9").await.unwrap();
}

#[test]
fn unusable_base_url_is_rejected() {
    for bad in ["not a url", "mailto:ops@example.com"] {
        let config = ClientConfig::default().with_base_url(bad);
        assert!(matches!(ApiClient::new(&config), Err(ClientError::ClientInit(_))), "{bad}");
    }
}

#[tokio::test]
async fn error_envelope_message_is_surfaced_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/labels/create"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "status": 422,
            "data": {"message": "Title is required"}
        })))
        .mount(&server)
        .await;

    let client: ResourceClient<Labels> = api_for(&server).resource();
    let err = client.create(&LabelInput::default()).await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::Api { status: 422, ref message } if message == "Title is required"
    ));
    assert!(err.is_validation());
    assert_eq!(err.user_message(), "Title is required");
}

#[tokio::test]
async fn no_retry_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/labels/fetch"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let client: ResourceClient<Labels> = api_for(&server).resource();
    let err = client.fetch_page(PageRequest::first()).await.unwrap_err();

    assert!(err.is_transient());
    let msg = err.to_string();
    assert!(msg.contains("503"));
    assert!(msg.contains("Service Unavailable"));
}

#[tokio::test]
async fn success_false_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/labels/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "message": "Label already exists"
        })))
        .mount(&server)
        .await;

    let client: ResourceClient<Labels> = api_for(&server).resource();
    let input = LabelInput { title: "Hot".to_owned(), color: None };
    let err = client.create(&input).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Rejected { ref message } if message == "Label already exists"
    ));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/labels/fetch"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client: ResourceClient<Labels> = api_for(&server).resource();
    let err = client.fetch_page(PageRequest::first()).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let config = ClientConfig::default().with_base_url("http://127.0.0.1:9");
    let api = Arc::new(ApiClient::new(&config).unwrap());
    let client: ResourceClient<Labels> = api.resource();
    let err = client.fetch_page(PageRequest::first()).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert!(err.is_transient());
}

#[test]
fn debug_hides_token() {
    let config = ClientConfig::default().with_token("secret-token");
    let api = ApiClient::new(&config).unwrap();
    let rendered = format!("{api:?}");
    assert!(!rendered.contains("secret-token"));
}
