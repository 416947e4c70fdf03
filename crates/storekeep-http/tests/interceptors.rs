//! Request/response interceptor behaviour against a mock backend.

use std::sync::Arc;

use serde_json::json;
use storekeep_core::cookie::CSRF_COOKIE;
use storekeep_core::{AccessToken, AuthStateStore, Cookie, SameSite};
use storekeep_http::{ApiClient, ClientConfig, ClientEvent};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, token: Option<&str>) -> ApiClient {
    let auth = Arc::new(AuthStateStore::new());
    auth.set_token(token.map(AccessToken::new));
    ApiClient::new(ClientConfig::new(server.uri()), auth).unwrap()
}

fn seed_csrf(client: &ApiClient, value: &str) {
    client
        .cookie_jar()
        .add(Cookie::new(CSRF_COOKIE, value, "127.0.0.1"));
}

#[tokio::test]
async fn bearer_token_is_injected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(header("authorization", "Bearer tokA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("tokA"));
    let response = client.get("/products").await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn no_token_means_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    client.get("/products").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn csrf_header_only_on_mutations() {
    let server = MockServer::start().await;
    Mock::given(path("/api/coupons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("tokA"));
    seed_csrf(&client, "csrf-1");

    client.get("/coupons").await.unwrap();
    client.post("/coupons", &json!({"code": "X"})).await.unwrap();
    client.put("/coupons", &json!({"code": "Y"})).await.unwrap();
    client.delete("/coupons").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
    assert!(requests[0].headers.get("x-csrf-token").is_none());
    for request in &requests[1..] {
        assert_eq!(request.headers.get("x-csrf-token").unwrap(), "csrf-1");
    }
}

#[tokio::test]
async fn missing_csrf_cookie_still_sends() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/coupons"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("tokA"));
    let response = client.post("/coupons", &json!({"code": "X"})).await.unwrap();
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn csrf_cookie_rotates_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-csrf-token", "csrf-2")
                .set_body_json(json!({"user": {"id": 1}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/products"))
        .and(header("x-csrf-token", "csrf-2"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("tokA"));
    seed_csrf(&client, "csrf-1");

    client.get("/auth/me").await.unwrap();

    let url = client.endpoint("/products").unwrap();
    let jar = client.cookie_jar().snapshot();
    let cookie = jar
        .get_for_url(&url)
        .into_iter()
        .find(|c| c.name == CSRF_COOKIE)
        .unwrap()
        .clone();
    assert_eq!(cookie.value, "csrf-2");
    assert_eq!(cookie.same_site, SameSite::Strict);
    assert!(cookie.expires.is_some());

    client.post("/products", &json!({"name": "Hoodie"})).await.unwrap();
}

#[tokio::test]
async fn error_responses_do_not_rotate_csrf() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(500).insert_header("x-csrf-token", "evil"))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("tokA"));
    seed_csrf(&client, "csrf-1");
    assert!(client.get("/orders").await.is_err());
    assert_eq!(client.csrf_token().unwrap().as_str(), "csrf-1");
}

#[tokio::test]
async fn cookies_set_by_backend_are_replayed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "refresh-token=r1; Path=/; HttpOnly")
                .set_body_json(json!({"accessToken": "tokA"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    client.post("/auth/login", &json!({})).await.unwrap();
    client.get("/products").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let cookie = requests[1].headers.get("cookie").unwrap().to_str().unwrap();
    assert!(cookie.contains("refresh-token=r1"));

    // the refresh cookie is HTTP-only, so it is not readable
    let url = client.endpoint("/products").unwrap();
    assert!(client.cookie_jar().readable_value("refresh-token", &url).is_none());
}

#[tokio::test]
async fn pass_through_errors_are_broadcast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/coupons"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "Coupon exists"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Some("tokA"));
    let mut events = client.events();

    let err = client.get("/orders").await.unwrap_err();
    assert_eq!(err.as_api().unwrap().status, 500);
    assert_eq!(err.error_code(), "SERVER_ERROR");
    assert_eq!(
        events.recv().await.unwrap(),
        ClientEvent::ApiError {
            message: "Something went wrong, please try again.".to_string()
        }
    );

    client.post("/coupons", &json!({})).await.unwrap_err();
    assert_eq!(
        events.recv().await.unwrap(),
        ClientEvent::ApiError {
            message: "Coupon exists".to_string()
        }
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // nothing listens on port 1
    let client = ApiClient::new(
        ClientConfig::new("http://127.0.0.1:1"),
        Arc::new(AuthStateStore::new()),
    )
    .unwrap();
    let err = client.get("/products").await.unwrap_err();
    assert_eq!(err.error_code(), "NETWORK_ERROR");
}
