//! Minimal HTTP backend with the session routes, for exercising `HttpApi`
//! over a real socket.

use axum::{
    extract::{Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Session that always answers 404
pub const MISSING_SESSION: i64 = 404;

fn session_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "current_summary": null,
        "created_at": "2025-01-05T10:30:00",
    })
}

async fn list_sessions() -> Json<Value> {
    Json(json!([
        {
            "id": 2,
            "name": "Retro",
            "current_summary": "Action items agreed",
            "created_at": "2025-01-06T09:00:00.250000",
        },
        session_json(1, "Q4 Planning Meeting"),
    ]))
}

async fn create_session(Json(body): Json<Value>) -> Json<Value> {
    let name = body["name"].as_str().unwrap_or_default();
    Json(session_json(3, name))
}

async fn get_session(Path(id): Path<i64>) -> impl IntoResponse {
    if id == MISSING_SESSION {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Session not found" })),
        );
    }
    (StatusCode::OK, Json(session_json(id, "Q4 Planning Meeting")))
}

async fn rename_session(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    let name = body["name"].as_str().unwrap_or_default();
    Json(session_json(id, name))
}

async fn get_documents(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!([
        { "id": 7, "filename": "agenda.pdf", "upload_timestamp": "2025-01-05T10:31:00" },
    ]))
}

async fn get_messages(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!([
        { "id": 10, "role": "user", "content": "Hello", "timestamp": "2025-01-05T10:32:00" },
        {
            "id": 11,
            "role": "assistant",
            "content": "Hi there",
            "timestamp": "2025-01-05T10:32:01.5",
        },
    ]))
}

async fn chat(Path(_id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    let query = body["query"].as_str().unwrap_or_default();
    Json(json!({ "response": format!("Echo: {query}") }))
}

async fn upload(Path(_id): Path<i64>, mut multipart: Multipart) -> impl IntoResponse {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        if !filename.ends_with(".pdf") {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": "Only PDF files are allowed" })),
            );
        }
        return (
            StatusCode::OK,
            Json(json!({ "filename": filename, "status": "uploaded", "summary_updated": true })),
        );
    }
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": [{ "msg": "field required" }] })),
    )
}

/// Serve the fake backend on an ephemeral port and return its base URL
pub async fn spawn() -> String {
    let app = Router::new()
        .route("/sessions", get(list_sessions).post(create_session))
        .route("/sessions/{id}", get(get_session).patch(rename_session))
        .route("/sessions/{id}/documents", get(get_documents))
        .route("/sessions/{id}/messages", get(get_messages))
        .route("/sessions/{id}/chat", post(chat))
        .route("/sessions/{id}/upload", post(upload));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake backend");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{addr}")
}
