use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use roster_domain::config::{ApiConfig, SslConfig, StoreBackend};
use roster_server::{Server, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;

fn registration(email: &str) -> Request<Body> {
    let body = json!({
        "email": email,
        "fullName": "Margaret Hamilton",
        "phoneNumber": "555-0169",
        "yearOfStudy": "4",
        "department": "Software Engineering",
        "writingSamples": "Apollo guidance notes",
        "whyContentLead": "Priority displays",
        "newIdeas": "Asynchronous executive"
    });

    Request::builder()
        .method(Method::POST)
        .uri("/api/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn memory_backed_server_admits_up_to_capacity() {
    let server = Server::builder().store(StoreBackend::Memory).capacity(2).build().await.unwrap();
    let app = build_router(server.state().clone());

    for email in ["one@uni.edu", "two@uni.edu"] {
        let response = app.clone().oneshot(registration(email)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.clone().oneshot(registration("three@uni.edu")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(Request::get("/api/registration-count").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "count": 2, "capacity": 2, "remaining": 0 }));
}

#[tokio::test]
async fn database_backed_server_rejects_case_variant_duplicates() {
    let server = Server::builder().store(StoreBackend::Database).build().await.unwrap();
    let app = build_router(server.state().clone());

    let response = app.clone().oneshot(registration("Margaret@MIT.edu")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["remaining"], 19);

    let response = app.clone().oneshot(registration("margaret@mit.edu ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn health_route_is_mounted() {
    let server = Server::builder().store(StoreBackend::Memory).build().await.unwrap();
    let app = build_router(server.state().clone());

    let response =
        app.oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "up");
}

#[tokio::test]
async fn zero_port_is_rejected() {
    let err = Server::builder().store(StoreBackend::Memory).port(0).build().await.unwrap_err();
    assert!(err.to_string().contains("port"));
}

#[tokio::test]
async fn missing_ssl_material_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = ApiConfig::default();
    cfg.registration.store = StoreBackend::Memory;
    cfg.server.ssl =
        Some(SslConfig { cert: dir.path().join("cert.pem"), key: dir.path().join("key.pem") });

    let err = Server::builder().config(cfg).build().await.unwrap_err();
    assert!(err.to_string().contains("SSL certificate not found"));
}
