//! Striform REST API
//!
//! CRUD over two document collections, forms and responses, plus a root
//! status document.
//!
//! ```text
//! GET    /                           status + endpoint map
//! GET    /api/forms                  list forms
//! POST   /api/forms                  create form            (201)
//! GET    /api/forms/:id              fetch form             (404)
//! PUT    /api/forms/:id              merge fields into form (404)
//! DELETE /api/forms/:id              delete form            (404)
//! GET    /api/responses/form/:formId list responses for form
//! POST   /api/responses              record response        (201)
//! GET    /docs                       Swagger UI
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use store::{DocumentStore, FileDocumentStore, InMemoryDocumentStore, StoreError};

/// API state
#[derive(Clone)]
pub struct ApiState {
    pub version: String,
    pub store: Arc<dyn DocumentStore>,
    pub cors_any: bool,
}

impl ApiState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").into(),
            store,
            cors_any: true,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryDocumentStore::new()))
    }

    pub fn with_cors_any(mut self, cors_any: bool) -> Self {
        self.cors_any = cors_any;
        self
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Striform API",
        description = "Forms and response collection",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::status::status,
        routes::forms::list_forms,
        routes::forms::create_form,
        routes::forms::get_form,
        routes::forms::update_form,
        routes::forms::delete_form,
        routes::responses::list_responses,
        routes::responses::create_response,
    ),
    components(
        schemas(
            models::FormDocument, models::ErrorResponse, models::MessageResponse,
            models::StatusDocument, models::HealthCheck,
            striform_core::Form, striform_core::Question, striform_core::QuestionKind,
            striform_core::QuestionImage, striform_core::ImagePlacement, striform_core::ImagePosition,
            striform_core::FileUploadConfig, striform_core::TextAlign,
            striform_core::Response, striform_core::Answers, striform_core::AnswerValue,
            striform_core::FileRef
        )
    ),
    tags(
        (name = "status", description = "Liveness"),
        (name = "forms", description = "Form documents"),
        (name = "responses", description = "Collected responses")
    )
)]
pub struct ApiDoc;

/// Build the API router
pub fn build_router(state: ApiState) -> Router {
    let cors = if state.cors_any {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(routes::status::status))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(Arc::new(state))
}

fn api_routes() -> Router<Arc<ApiState>> {
    Router::new()
        .nest("/forms", routes::forms::router())
        .nest("/responses", routes::responses::router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::Value;

    #[tokio::test]
    async fn test_openapi_lists_form_paths() {
        let server = TestServer::new(build_router(ApiState::in_memory())).unwrap();
        let doc: Value = server.get("/api-docs/openapi.json").await.json();
        assert!(doc["paths"]["/api/forms"].is_object());
        assert!(doc["paths"]["/api/responses"].is_object());
    }
}
