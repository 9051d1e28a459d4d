#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::extract::{Path, RawQuery, Request};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{any, get, post};
use axum::{Json, Router};
use http::{header, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use guardpost::config::Config;

pub const TEST_TOKEN: &str = "test-token";
pub const USERNAME: &str = "operator";
pub const PASSWORD: &str = "secret";

pub fn sample_user() -> Value {
    json!({
        "id": "u1",
        "username": USERNAME,
        "email": "operator@example.com",
        "role": "scs_operator",
        "firstName": "Olive",
        "lastName": "Perez",
        "phone": "",
        "isActive": true,
        "createdAt": "2024-05-01T08:00:00Z",
        "updatedAt": "2024-05-01T08:00:00Z"
    })
}

pub fn sample_alert(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "type": "unauthorized_access",
        "severity": "high",
        "title": "Door forced",
        "description": "",
        "location": "dock 3",
        "status": status,
        "premiseId": "p1",
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:00:00Z"
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(&format!("Bearer {}", TEST_TOKEN))
}

async fn login(Json(credentials): Json<Value>) -> impl IntoResponse {
    if credentials["username"] == USERNAME && credentials["password"] == PASSWORD {
        Json(json!({
            "status": "success",
            "data": { "token": TEST_TOKEN, "user": sample_user() }
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status": "error", "error": "invalid credentials" })),
        )
            .into_response()
    }
}

async fn logout(headers: HeaderMap) -> impl IntoResponse {
    if authorized(&headers) {
        Json(json!({ "status": "success" })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status": "error", "error": "missing token" })),
        )
            .into_response()
    }
}

async fn me(headers: HeaderMap) -> impl IntoResponse {
    if authorized(&headers) {
        Json(json!({ "status": "success", "data": sample_user() })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status": "error", "error": "missing token" })),
        )
            .into_response()
    }
}

async fn alerts(headers: HeaderMap) -> impl IntoResponse {
    if authorized(&headers) {
        Json(json!({
            "status": "success",
            "data": [sample_alert("a1", "pending"), sample_alert("a2", "pending")]
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status": "error", "error": "missing token" })),
        )
            .into_response()
    }
}

async fn acknowledge(Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "status": "success", "data": sample_alert(&id, "acknowledged") }))
}

async fn assign(Path(id): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    let mut alert = sample_alert(&id, "assigned");
    alert["assignedGuardId"] = body["guard_id"].clone();
    Json(json!({
        "status": "success",
        "data": {
            "alert": alert,
            "incident": {
                "id": "i1",
                "alertId": id,
                "status": "open",
                "assignedGuardId": body["guard_id"],
                "location": "dock 3",
                "description": "",
                "createdAt": "2024-05-01T10:05:00Z",
                "updatedAt": "2024-05-01T10:05:00Z"
            }
        }
    }))
}

/// Answers with a connection-scoped header to exercise the relay's
/// hop-by-hop stripping.
async fn health() -> impl IntoResponse {
    (
        [(header::CONNECTION, "close")],
        Json(json!({
            "status": "success",
            "data": { "status": "healthy", "service": "monitoring-api" }
        })),
    )
}

/// Echoes back everything the forwarder is supposed to preserve.
async fn echo(Path(id): Path<String>, RawQuery(query): RawQuery, req: Request) -> Json<Value> {
    let method = req.method().to_string();
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = axum::body::to_bytes(req.into_body(), usize::MAX)
        .await
        .unwrap();
    Json(json!({
        "status": "success",
        "data": {
            "id": id,
            "method": method,
            "query": query,
            "authorization": authorization,
            "host": host,
            "body": String::from_utf8_lossy(&body),
        }
    }))
}

/// Stands in for the monitoring platform REST API.
pub async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/alerts", get(alerts))
        .route("/health", get(health))
        .route("/alerts/:id/acknowledge", post(acknowledge))
        .route("/alerts/:id/assign", post(assign))
        .route("/cameras/:id/status", any(echo));

    let listener = TcpListener::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub async fn spawn_gateway(upstream: SocketAddr) -> SocketAddr {
    let mut cfg = Config::default();
    cfg.upstream.url = format!("http://{}", upstream);

    let listener = TcpListener::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(guardpost::serve(cfg, listener, std::future::pending()));
    addr
}
