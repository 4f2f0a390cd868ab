// Stub expense server for integration tests: the same routes, bodies and
// status codes the real server answers with, backed by a fixed user.
use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;

pub const EMAIL: &str = "me@example.com";
pub const PASSWORD: &str = "secret";

const SESSION_COOKIE: &str = "session=ok";

// Bind an ephemeral port, serve the stub on the current runtime and return its base URL.
pub async fn spawn_stub_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");

    tokio::spawn(async move {
        axum::serve(listener, router()).await.expect("stub server failed");
    });

    format!("http://{}", addr)
}

fn router() -> Router {
    Router::new()
        .route("/", get(|| async { "<html>index</html>" }))
        .route("/login", post(login))
        .route("/logout", get(|| async { Redirect::to("/") }))
        .route("/reset-password", post(reset_password))
        .route("/delete-expense/:id", post(delete_expense))
        .route("/export", get(export))
}

fn failure(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({"success": false, "error": error}))).into_response()
}

fn signed_in(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|cookies| cookies.contains(SESSION_COOKIE))
}

async fn login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let registering = body["isRegistration"].as_bool().unwrap_or(false);

    if email.is_empty() || password.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Email and password are required");
    }
    if registering && email == EMAIL {
        return failure(StatusCode::BAD_REQUEST, "Email already registered");
    }
    if !registering && (email != EMAIL || password != PASSWORD) {
        return failure(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }

    (
        [(header::SET_COOKIE, format!("{}; Path=/", SESSION_COOKIE))],
        Json(json!({"success": true, "redirect": "/dashboard"})),
    )
        .into_response()
}

async fn reset_password(Json(body): Json<Value>) -> Response {
    match body["email"].as_str() {
        Some(email) if !email.is_empty() => Json(json!({"success": true})).into_response(),
        _ => failure(StatusCode::BAD_REQUEST, "Email is required"),
    }
}

async fn delete_expense(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !signed_in(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Not signed in");
    }
    if id == "404" {
        return failure(StatusCode::NOT_FOUND, "Expense not found");
    }
    Json(json!({"success": true})).into_response()
}

async fn export(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if !signed_in(&headers) {
        return Redirect::to("/").into_response();
    }
    let format = params.get("format").cloned().unwrap_or_default();
    let period = params.get("period").cloned().unwrap_or_default();
    format!("format,period\n{},{}\n", format, period).into_response()
}
