use axum::extract::{Extension, Multipart, Path, State};
use chrono::Utc;

use crate::{
    AppState,
    error::AppError,
    extract::{Json, Query},
    models::{Employer, EmployerProfile, JobFilter, Page},
    routes::{
        account::require_name,
        job::{JobCard, blank_to_none},
    },
    utils::{
        ApiResult, Claims,
        success_to_api_response,
        upload::{MultipartForm, UploadKind, store_file},
    },
};

use super::model::{EmployerQuery, MyJobsQuery, current_employer};

#[axum::debug_handler]
pub async fn list_employers(
    State(state): State<AppState>,
    Query(query): Query<EmployerQuery>,
) -> ApiResult<Page<Employer>> {
    let page = state.page(query.page, query.page_size);
    let search = blank_to_none(query.search);
    let employers = state.db.list_employers(search.as_deref(), page).await?;
    Ok(success_to_api_response(employers))
}

#[axum::debug_handler]
pub async fn get_employer(
    State(state): State<AppState>,
    Path(employer_id): Path<String>,
) -> ApiResult<Employer> {
    let employer = state
        .db
        .find_employer(&employer_id)
        .await?
        .ok_or_else(|| AppError::not_found("Employer"))?;
    Ok(success_to_api_response(employer))
}

/// Open postings of one employer.
#[axum::debug_handler]
pub async fn list_employer_jobs(
    State(state): State<AppState>,
    Path(employer_id): Path<String>,
    Query(query): Query<EmployerQuery>,
) -> ApiResult<Page<JobCard>> {
    let now = Utc::now();
    let filter = JobFilter {
        employer_id: Some(employer_id),
        search: blank_to_none(query.search),
        ..JobFilter::open()
    };
    let page = state.page(query.page, query.page_size);
    let jobs = state.db.list_jobs(&filter, page, now).await?;
    Ok(success_to_api_response(jobs.map(|job| JobCard::at(job, now))))
}

#[axum::debug_handler]
pub async fn get_my_profile(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> ApiResult<Employer> {
    Ok(success_to_api_response(current_employer(&state, &claims).await?))
}

#[axum::debug_handler]
pub async fn update_my_profile(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(profile): Json<EmployerProfile>,
) -> ApiResult<Employer> {
    require_name(&profile.name, "name")?;
    let employer = current_employer(&state, &claims).await?;
    let employer = state.db.update_employer(&employer.id, profile).await?;
    Ok(success_to_api_response(employer))
}

#[axum::debug_handler]
pub async fn upload_avatar(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Employer> {
    let employer = current_employer(&state, &claims).await?;
    let mut form = MultipartForm::read(multipart, state.config.max_upload_bytes).await?;
    let file = form
        .take_file("file")
        .ok_or_else(|| AppError::validation("Missing file field"))?;

    let url = store_file(&state.config.upload_dir, &file, UploadKind::Image).await?;
    let employer = state.db.set_employer_avatar(&employer.id, &url).await?;
    Ok(success_to_api_response(employer))
}

#[axum::debug_handler]
pub async fn list_my_jobs(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Query(query): Query<MyJobsQuery>,
) -> ApiResult<Page<JobCard>> {
    let employer = current_employer(&state, &claims).await?;
    let now = Utc::now();
    let filter = JobFilter {
        employer_id: Some(employer.id),
        status: query.status,
        ..Default::default()
    };
    let page = state.page(query.page, query.page_size);
    let jobs = state.db.list_jobs(&filter, page, now).await?;
    Ok(success_to_api_response(jobs.map(|job| JobCard::at(job, now))))
}
