//! Response endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use striform_core::Response;

use crate::error::{ApiError, ApiResult};
use crate::models::ErrorResponse;
use crate::ApiState;

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", post(create_response))
        .route("/form/:form_id", get(list_responses))
}

/// List responses for a form
#[utoipa::path(
    get,
    path = "/api/responses/form/{formId}",
    params(("formId" = String, Path, description = "Form ID")),
    responses(
        (status = 200, description = "Responses for the form", body = [Response]),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "responses"
)]
pub async fn list_responses(
    State(state): State<Arc<ApiState>>,
    Path(form_id): Path<String>,
) -> ApiResult<Json<Vec<Response>>> {
    let responses = state.store.list_responses(&form_id).await.map_err(ApiError::on_read)?;
    Ok(Json(responses))
}

/// Record a response
///
/// Final responses also bump the form's `responseCount`.
#[utoipa::path(
    post,
    path = "/api/responses",
    request_body = Response,
    responses(
        (status = 201, description = "Response stored", body = Response),
        (status = 400, description = "Invalid response", body = ErrorResponse)
    ),
    tag = "responses"
)]
pub async fn create_response(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Response>)> {
    let response: Response =
        serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let recorded = state.store.insert_response(response).await.map_err(ApiError::on_write)?;
    let saved = recorded.response;
    if !saved.is_partial && !recorded.counted {
        tracing::warn!(form_id = %saved.form_id, "response stored for unknown form");
    }

    tracing::info!(
        form_id = %saved.form_id,
        response_id = %saved.id,
        partial = saved.is_partial,
        "response recorded"
    );
    Ok((StatusCode::CREATED, Json(saved)))
}
