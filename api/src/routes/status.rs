//! Root status document

use axum::extract::State;
use axum::Json;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::{HealthCheck, StatusDocument};
use crate::ApiState;

fn endpoint_group(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Service status and endpoint map
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is running", body = StatusDocument)
    ),
    tag = "status"
)]
pub async fn status(State(state): State<Arc<ApiState>>) -> Json<StatusDocument> {
    let mut endpoints = BTreeMap::new();
    endpoints.insert(
        "forms".to_string(),
        endpoint_group(&[
            ("list", "GET /api/forms"),
            ("create", "POST /api/forms"),
            ("get", "GET /api/forms/:id"),
            ("update", "PUT /api/forms/:id"),
            ("delete", "DELETE /api/forms/:id"),
        ]),
    );
    endpoints.insert(
        "responses".to_string(),
        endpoint_group(&[
            ("list", "GET /api/responses/form/:formId"),
            ("create", "POST /api/responses"),
        ]),
    );

    let database = if state.store.is_connected().await { "connected" } else { "disconnected" };

    Json(StatusDocument {
        status: "Server is running".into(),
        version: state.version.clone(),
        endpoints,
        health_check: HealthCheck {
            database: database.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        },
    })
}

#[cfg(test)]
mod tests {
    use crate::store::FileDocumentStore;
    use crate::{build_router, ApiState};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_status_document() {
        let server = TestServer::new(build_router(ApiState::in_memory())).unwrap();
        let res = server.get("/").await;
        res.assert_status_ok();

        let body: Value = res.json();
        assert_eq!(body["status"], "Server is running");
        assert_eq!(body["healthCheck"]["database"], "connected");
        assert_eq!(body["endpoints"]["responses"]["create"], "POST /api/responses");
    }

    #[tokio::test]
    async fn test_failed_flush_reports_disconnected() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("sub");
        let store = FileDocumentStore::open(blocker.join("db.json")).await.unwrap();
        let server = TestServer::new(build_router(ApiState::new(Arc::new(store)))).unwrap();
        std::fs::write(&blocker, "").unwrap();

        server
            .post("/api/responses")
            .json(&json!({ "formId": "f1", "answers": {} }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        let listed: Vec<Value> = server.get("/api/responses/form/f1").await.json();
        assert!(listed.is_empty());

        let body: Value = server.get("/").await.json();
        assert_eq!(body["healthCheck"]["database"], "disconnected");

        std::fs::remove_file(&blocker).unwrap();
        server
            .post("/api/responses")
            .json(&json!({ "formId": "f1", "answers": {} }))
            .await
            .assert_status(StatusCode::CREATED);
        let body: Value = server.get("/").await.json();
        assert_eq!(body["healthCheck"]["database"], "connected");
    }
}
