//! End-to-end tests of the JSON API against a local fake WordPress.
//!
//! The fake serves `/graphql` on an ephemeral port and answers by document:
//! posts succeed, projects fail with HTTP 500, and orders succeed unless the
//! billing name is "Lỗi", in which case GraphQL errors are returned.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    body::{self, Body},
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use dainam_core::{ListPage, OrderResponse, Post, PostId};
use dainam_storefront::config::{StorefrontConfig, WordPressConfig};
use dainam_storefront::listing::{ListConfig, ListController};
use dainam_storefront::middleware::REQUEST_ID_HEADER;
use dainam_storefront::routes;
use dainam_storefront::state::AppState;
use dainam_storefront::wordpress::WordPressClient;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

// =============================================================================
// Fake WordPress
// =============================================================================

#[derive(Debug, Clone)]
struct Received {
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone, Default)]
struct FakeCms {
    received: Arc<Mutex<Vec<Received>>>,
}

impl FakeCms {
    fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

async fn graphql(
    State(cms): State<FakeCms>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let query = body["query"].as_str().unwrap_or_default().to_string();
    let variables = body["variables"].clone();
    cms.received.lock().unwrap().push(Received {
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    if query.contains("GetPosts") {
        let category = variables["where"]["categoryName"]
            .as_str()
            .unwrap_or("Tin tức")
            .to_string();
        let nodes: Vec<Value> = (1..=2)
            .map(|id| {
                json!({
                    "databaseId": id,
                    "slug": format!("bai-{id}"),
                    "title": format!("Bài {id}"),
                    "excerpt": "",
                    "date": format!("2024-06-0{id}T08:00:00"),
                    "featuredImage": null,
                    "categories": { "nodes": [{ "name": category, "slug": "c" }] },
                    "tags": { "nodes": [] }
                })
            })
            .collect();
        return Json(json!({
            "data": { "posts": {
                "pageInfo": { "hasNextPage": true, "endCursor": "cG9zdDoy" },
                "nodes": nodes
            }}
        }))
        .into_response();
    }

    if query.contains("GetProjects") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database offline").into_response();
    }

    if query.contains("CreateOrder") {
        if variables["input"]["billing"]["firstName"] == "Lỗi" {
            return Json(json!({
                "data": { "createOrder": null },
                "errors": [{ "message": "Sản phẩm không tồn tại", "path": ["createOrder"] }]
            }))
            .into_response();
        }
        return Json(json!({
            "data": { "createOrder": { "order": {
                "databaseId": 1201,
                "orderNumber": "1201",
                "total": "370000.00"
            }}}
        }))
        .into_response();
    }

    (StatusCode::BAD_REQUEST, "unknown document").into_response()
}

async fn spawn_cms() -> (FakeCms, SocketAddr) {
    let cms = FakeCms::default();
    let app = Router::new()
        .route("/graphql", post(graphql))
        .with_state(cms.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (cms, addr)
}

fn config(addr: SocketAddr) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        site_origin: "http://localhost:3000".to_string(),
        wordpress: WordPressConfig {
            graphql_url: Url::parse(&format!("http://{addr}/graphql")).unwrap(),
            auth_token: Some(SecretString::from("wp-app-Zq8rT3vK9mXp2Lw7")),
        },
        listing: ListConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

async fn test_app() -> (Router, FakeCms) {
    let (cms, addr) = spawn_cms().await;
    (routes::app(AppState::new(config(addr))), cms)
}

async fn json_body(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, value: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(value.to_string()))
        .unwrap()
}

fn order_body(name: &str, items: Value) -> Value {
    json!({
        "contact": {
            "name": name,
            "phone": "0912 345 678",
            "email": "khach@dainam.vn",
            "address": "12 Lê Lợi, Quận 1"
        },
        "items": items
    })
}

fn cart_items() -> Value {
    json!([{
        "id": 11,
        "name": "Lam sóng PVC",
        "price": { "amount": 185000, "formatted": "185.000 ₫" },
        "image": null,
        "quantity": 2
    }])
}

// =============================================================================
// Health and middleware
// =============================================================================

#[tokio::test]
async fn test_health_reports_ok() {
    let (app, _cms) = test_app().await;
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));

    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(bytes.as_ref(), b"ok");
}

// =============================================================================
// Lists
// =============================================================================

#[tokio::test]
async fn test_posts_page_with_filters() {
    let (app, cms) = test_app().await;
    let response = app
        .oneshot(get("/api/posts?category=Lam%20S%C3%B3ng&tag=pvc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["pageInfo"]["hasNextPage"], true);
    assert_eq!(body["pageInfo"]["endCursor"], "cG9zdDoy");

    let received = cms.received();
    let sent = &received[0].body["variables"];
    assert_eq!(sent["first"], 9);
    assert_eq!(sent["where"]["categoryName"], "Lam Sóng");
    assert_eq!(sent["where"]["tag"], "pvc");
    assert!(sent["where"].get("search").is_none());
}

#[tokio::test]
async fn test_posts_all_category_sends_no_filter() {
    let (app, cms) = test_app().await;
    let response = app
        .oneshot(get("/api/posts?category=All&first=3&after=abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let received = cms.received();
    let sent = &received[0].body["variables"];
    assert_eq!(sent["first"], 3);
    assert_eq!(sent["after"], "abc");
    assert_eq!(sent["where"], json!({}));
}

#[tokio::test]
async fn test_list_page_size_out_of_range() {
    let (app, cms) = test_app().await;
    for uri in ["/api/posts?first=0", "/api/projects?first=51"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
    assert!(cms.received().is_empty());
}

#[tokio::test]
async fn test_cms_failure_serves_empty_page() {
    let (app, _cms) = test_app().await;
    let response = app.oneshot(get("/api/projects")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["pageInfo"]["hasNextPage"], false);
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_order_created() {
    let (app, cms) = test_app().await;
    let response = app
        .oneshot(post_json("/api/orders", &order_body("Trần Thị Bích", cart_items())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: OrderResponse = serde_json::from_value(json_body(response).await).unwrap();
    assert!(body.success);
    let order = body.order.unwrap();
    assert_eq!(order.order_number, "1201");
    assert_eq!(order.total, "370.000 ₫");

    let received = cms.received();
    assert_eq!(
        received[0].authorization.as_deref(),
        Some("Bearer wp-app-Zq8rT3vK9mXp2Lw7")
    );
    let input = &received[0].body["variables"]["input"];
    assert_eq!(input["billing"]["phone"], "0912345678");
    assert_eq!(input["lineItems"], json!([{ "productId": 11, "quantity": 2 }]));
    assert_eq!(input["paymentMethod"], "cod");
}

#[tokio::test]
async fn test_order_with_empty_cart_rejected_locally() {
    let (app, cms) = test_app().await;
    let response = app
        .oneshot(post_json("/api/orders", &order_body("Trần Thị Bích", json!([]))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Giỏ hàng đang trống.");
    assert!(cms.received().is_empty());
}

#[tokio::test]
async fn test_order_with_invalid_form_rejected_locally() {
    let (app, cms) = test_app().await;
    let mut request = order_body("Trần Thị Bích", cart_items());
    request["contact"]["phone"] = json!("không có");

    let response = app
        .oneshot(post_json("/api/orders", &request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["message"], "Số điện thoại không hợp lệ.");
    assert!(cms.received().is_empty());
}

#[tokio::test]
async fn test_order_rejected_by_cms() {
    let (app, cms) = test_app().await;
    let response = app
        .oneshot(post_json("/api/orders", &order_body("Lỗi", cart_items())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Không thể tạo đơn hàng")
    );
    assert_eq!(cms.received().len(), 1);
}

// =============================================================================
// List controller over the real client
// =============================================================================

#[tokio::test]
async fn test_controller_refetches_through_wordpress() {
    let (cms, addr) = spawn_cms().await;
    let client = WordPressClient::new(&config(addr).wordpress);
    let controller = ListController::new(
        client.posts(),
        ListConfig {
            page_size: 2,
            debounce: Duration::from_millis(20),
        },
        ListPage::<Post>::empty(),
    );

    controller.set_category("Ngói");
    let snap = controller.settled().await;

    assert_eq!(snap.items.len(), 2);
    assert_eq!(snap.items[0].id, PostId::new(1));
    assert_eq!(snap.items[0].categories[0].name, "Ngói");
    assert!(!snap.fetch_failed);

    assert!(controller.load_more());
    let snap = controller.settled().await;
    assert_eq!(snap.items.len(), 4);

    let received = cms.received();
    assert_eq!(received.len(), 2);
    assert_eq!(received[1].body["variables"]["after"], "cG9zdDoy");
    // Content queries are sent without credentials
    assert_eq!(received[0].authorization, None);
}
