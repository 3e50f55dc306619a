use axum::{
    extract::{Extension, Multipart, Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    extract::Query,
    models::{Page, Role, SampleCv},
    utils::{
        ApiCreated, ApiResult, Claims,
        success_to_api_response,
        upload::{MultipartForm, UploadKind, store_file},
    },
};

use super::model::{SampleCvQuery, SampleCvUpload};

#[axum::debug_handler]
pub async fn list_sample_cvs(
    State(state): State<AppState>,
    Query(query): Query<SampleCvQuery>,
) -> ApiResult<Page<SampleCv>> {
    let page = state.page(query.page, query.page_size);
    Ok(success_to_api_response(state.db.list_sample_cvs(page).await?))
}

/// Multipart fields: `title`, `description`, `file` (PDF), optional `image`.
#[axum::debug_handler]
pub async fn create_sample_cv(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiCreated<SampleCv> {
    claims.require(Role::Admin)?;
    let form = MultipartForm::read(multipart, state.config.max_upload_bytes).await?;
    let upload = SampleCvUpload::from_form(form)?;

    let file = store_file(&state.config.upload_dir, &upload.file, UploadKind::Pdf).await?;
    let image = match &upload.image {
        Some(image) => Some(store_file(&state.config.upload_dir, image, UploadKind::Image).await?),
        None => None,
    };

    let cv = state.db.create_sample_cv(upload.into_new(file, image)).await?;
    tracing::info!("Sample CV {} published", cv.id);
    Ok((StatusCode::CREATED, success_to_api_response(cv)))
}

#[axum::debug_handler]
pub async fn delete_sample_cv(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    claims.require(Role::Admin)?;
    state.db.delete_sample_cv(&id).await?;
    Ok(success_to_api_response(serde_json::json!({ "deleted": id })))
}
