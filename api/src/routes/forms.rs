//! Form endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use striform_core::{new_id, Form};

use crate::error::{ApiError, ApiResult};
use crate::models::{ErrorResponse, FormDocument, MessageResponse};
use crate::ApiState;

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_forms).post(create_form))
        .route("/:id", get(get_form).put(update_form).delete(delete_form))
}

/// List all forms
#[utoipa::path(
    get,
    path = "/api/forms",
    responses(
        (status = 200, description = "All forms", body = [FormDocument]),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn list_forms(State(state): State<Arc<ApiState>>) -> ApiResult<Json<Vec<FormDocument>>> {
    let forms = state.store.list_forms().await.map_err(ApiError::on_read)?;
    Ok(Json(forms))
}

/// Create a form
#[utoipa::path(
    post,
    path = "/api/forms",
    request_body = Form,
    responses(
        (status = 201, description = "Form created", body = FormDocument),
        (status = 400, description = "Invalid form", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn create_form(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<FormDocument>)> {
    let mut form: Form =
        serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if form.id.is_empty() {
        form.id = new_id();
    }

    let doc = state
        .store
        .insert_form(FormDocument::new(form))
        .await
        .map_err(ApiError::on_write)?;

    tracing::info!(form_id = %doc.id(), "form created");
    Ok((StatusCode::CREATED, Json(doc)))
}

/// Get a form by id
#[utoipa::path(
    get,
    path = "/api/forms/{id}",
    params(("id" = String, Path, description = "Form ID")),
    responses(
        (status = 200, description = "Form", body = FormDocument),
        (status = 404, description = "Form not found", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn get_form(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<FormDocument>> {
    state
        .store
        .find_form(&id)
        .await
        .map_err(ApiError::on_read)?
        .map(Json)
        .ok_or_else(ApiError::form_not_found)
}

/// Merge fields into a form
#[utoipa::path(
    put,
    path = "/api/forms/{id}",
    params(("id" = String, Path, description = "Form ID")),
    request_body = Form,
    responses(
        (status = 200, description = "Updated form", body = FormDocument),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Form not found", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn update_form(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<FormDocument>> {
    let Value::Object(patch) = body else {
        return Err(ApiError::BadRequest("update body must be a JSON object".into()));
    };

    let doc = state
        .store
        .update_form(&id, patch)
        .await
        .map_err(ApiError::on_write)?
        .ok_or_else(ApiError::form_not_found)?;

    tracing::info!(form_id = %id, "form updated");
    Ok(Json(doc))
}

/// Delete a form and its responses
#[utoipa::path(
    delete,
    path = "/api/forms/{id}",
    params(("id" = String, Path, description = "Form ID")),
    responses(
        (status = 200, description = "Form deleted", body = MessageResponse),
        (status = 404, description = "Form not found", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn delete_form(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .store
        .delete_form(&id)
        .await
        .map_err(ApiError::on_read)?
        .ok_or_else(ApiError::form_not_found)?;

    tracing::info!(form_id = %id, "form deleted");
    Ok(Json(MessageResponse { message: "Form deleted successfully".into() }))
}
