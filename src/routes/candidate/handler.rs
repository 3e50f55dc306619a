use axum::extract::{Extension, Multipart, Path, State};
use chrono::Utc;
use futures_util::future::try_join_all;

use crate::{
    AppState,
    error::AppError,
    extract::{Json, Query},
    models::{Candidate, CandidateProfile, Page, Role},
    routes::{account::require_name, job::JobCard},
    utils::{
        ApiResult, Claims,
        success_to_api_response,
        upload::{MultipartForm, UploadKind, store_file},
    },
};

use super::model::{ApplicationsQuery, CandidateApplication, current_candidate};

#[axum::debug_handler]
pub async fn get_my_profile(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> ApiResult<Candidate> {
    Ok(success_to_api_response(current_candidate(&state, &claims).await?))
}

#[axum::debug_handler]
pub async fn update_my_profile(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(profile): Json<CandidateProfile>,
) -> ApiResult<Candidate> {
    require_name(&profile.full_name, "full_name")?;
    let candidate = current_candidate(&state, &claims).await?;
    let candidate = state.db.update_candidate(&candidate.id, profile).await?;
    Ok(success_to_api_response(candidate))
}

#[axum::debug_handler]
pub async fn upload_avatar(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Candidate> {
    let candidate = current_candidate(&state, &claims).await?;
    let mut form = MultipartForm::read(multipart, state.config.max_upload_bytes).await?;
    let file = form
        .take_file("file")
        .ok_or_else(|| AppError::validation("Missing file field"))?;

    let url = store_file(&state.config.upload_dir, &file, UploadKind::Image).await?;
    let candidate = state.db.set_candidate_avatar(&candidate.id, &url).await?;
    Ok(success_to_api_response(candidate))
}

#[axum::debug_handler]
pub async fn upload_cv(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Candidate> {
    let candidate = current_candidate(&state, &claims).await?;
    let mut form = MultipartForm::read(multipart, state.config.max_upload_bytes).await?;
    let file = form
        .take_file("file")
        .ok_or_else(|| AppError::validation("Missing file field"))?;

    let url = store_file(&state.config.upload_dir, &file, UploadKind::Pdf).await?;
    let candidate = state.db.set_candidate_cv(&candidate.id, &url).await?;
    tracing::info!("Candidate {} uploaded a CV", candidate.id);
    Ok(success_to_api_response(candidate))
}

#[axum::debug_handler]
pub async fn list_my_applications(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Query(query): Query<ApplicationsQuery>,
) -> ApiResult<Page<CandidateApplication>> {
    let candidate = current_candidate(&state, &claims).await?;
    let page = state.page(query.page, query.page_size);
    let applications = state
        .db
        .list_candidate_applications(&candidate.id, page)
        .await?;

    let jobs = try_join_all(
        applications
            .items
            .iter()
            .map(|a| state.db.find_job(&a.job_posting_id)),
    )
    .await?;

    let now = Utc::now();
    let mut jobs = jobs.into_iter();
    Ok(success_to_api_response(applications.map(|application| {
        CandidateApplication {
            application,
            job: jobs
                .next()
                .flatten()
                .filter(|job| !job.is_locked())
                .map(|job| JobCard::at(job, now)),
        }
    })))
}

/// Applicant profile, visible to employers and admins.
#[axum::debug_handler]
pub async fn get_candidate(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
) -> ApiResult<Candidate> {
    claims.require_any(&[Role::Employer, Role::Admin])?;
    let candidate = state
        .db
        .find_candidate(&candidate_id)
        .await?
        .ok_or_else(|| AppError::not_found("Candidate"))?;
    Ok(success_to_api_response(candidate))
}
