//! Form API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::errors::{AppError, ImageDecodeError};
use crate::form::{is_image_content_type, ImageUpload};
use crate::models::{
    DraftField, FormSnapshot, FormSuggestions, MemberRecord, SetFieldRequest, SetImageRequest,
};
use crate::AppState;

/// GET /api/form - Current draft and submission state.
pub async fn get_form(State(state): State<AppState>) -> ApiResult<FormSnapshot> {
    let revision_id = state.revision_id().await;
    success(state.form_snapshot().await, revision_id)
}

/// GET /api/form/suggestions - Predefined teams and roles.
pub async fn get_suggestions(State(state): State<AppState>) -> ApiResult<FormSuggestions> {
    let revision_id = state.revision_id().await;
    success(FormSuggestions::default(), revision_id)
}

/// PUT /api/form/fields/:field - Set a single text field.
pub async fn set_field(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<SetFieldRequest>,
) -> ApiResult<FormSnapshot> {
    let revision_id = state.revision_id().await;

    let Some(field) = DraftField::parse(&name) else {
        return error(
            AppError::BadRequest(format!("Unknown form field {}", name)),
            revision_id,
        );
    };

    state.form.set_field(field, request.value).await;
    success(state.form_snapshot().await, revision_id)
}

/// PUT /api/form/image - Attach a profile image.
pub async fn set_image(
    State(state): State<AppState>,
    Json(request): Json<SetImageRequest>,
) -> ApiResult<FormSnapshot> {
    let revision_id = state.revision_id().await;

    // The upload control only offers image files
    if !is_image_content_type(&request.content_type) {
        return error(
            ImageDecodeError::NotAnImage(request.content_type).into(),
            revision_id,
        );
    }

    let upload =
        match ImageUpload::from_base64(request.file_name, request.content_type, &request.data) {
            Ok(upload) => upload,
            Err(e) => return error(e.into(), revision_id),
        };

    match state.form.set_image(upload).await {
        Ok(()) => success(state.form_snapshot().await, revision_id),
        Err(e) => error(e.into(), revision_id),
    }
}

/// DELETE /api/form/image - Remove the attached image.
pub async fn clear_image(State(state): State<AppState>) -> ApiResult<FormSnapshot> {
    let revision_id = state.revision_id().await;
    state.form.clear_image().await;
    success(state.form_snapshot().await, revision_id)
}

/// DELETE /api/form - Discard the draft.
pub async fn reset_form(State(state): State<AppState>) -> ApiResult<FormSnapshot> {
    let revision_id = state.revision_id().await;
    state.form.reset().await;
    success(state.form_snapshot().await, revision_id)
}

/// POST /api/form/submit - Submit the draft.
pub async fn submit_form(State(state): State<AppState>) -> ApiResult<MemberRecord> {
    let revision_id = state.revision_id().await;

    match state.pipeline.submit(&state.form).await {
        Ok(record) => {
            let new_revision = state.revision_id().await;
            success(record, new_revision)
        }
        Err(e) => error(e.into(), revision_id),
    }
}
