use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::{
    AppState,
    extract::{Json, Query},
    middleware::MaybeClaims,
    models::{JobDraft, JobFilter, Page, PurgeReport, Role},
    routes::employer::current_employer,
    utils::{ApiCreated, ApiResult, Claims, success_to_api_response},
};

use super::model::{
    AdminJobQuery, JobCard, JobDetail, JobListQuery, LockRequest, PurgeRequest, blank_to_none,
    job_detail, managed_job, validate_draft,
};

/// Public listing: open postings only.
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> ApiResult<Page<JobCard>> {
    let now = Utc::now();
    let filter = JobFilter {
        search: blank_to_none(query.search),
        location: blank_to_none(query.location),
        industry: blank_to_none(query.industry),
        ..JobFilter::open()
    };
    let page = state.page(query.page, query.page_size);
    let jobs = state.db.list_jobs(&filter, page, now).await?;
    Ok(success_to_api_response(jobs.map(|job| JobCard::at(job, now))))
}

#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    MaybeClaims(viewer): MaybeClaims,
    Path(job_id): Path<String>,
) -> ApiResult<JobDetail> {
    let detail = job_detail(&state, &job_id, viewer.as_ref()).await?;
    Ok(success_to_api_response(detail))
}

#[axum::debug_handler]
pub async fn create_job(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(draft): Json<JobDraft>,
) -> ApiCreated<JobCard> {
    claims.require(Role::Employer)?;
    let now = Utc::now();
    validate_draft(&draft, now)?;
    let employer = current_employer(&state, &claims).await?;

    let job = state.db.create_job(&employer.id, draft).await?;
    tracing::info!("Employer {} posted job {}", employer.id, job.id);
    Ok((StatusCode::CREATED, success_to_api_response(JobCard::at(job, now))))
}

#[axum::debug_handler]
pub async fn update_job(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(draft): Json<JobDraft>,
) -> ApiResult<JobCard> {
    let now = Utc::now();
    validate_draft(&draft, now)?;
    let job = managed_job(&state, &claims, &job_id, false).await?;

    let job = state.db.update_job(&job.id, draft).await?;
    Ok(success_to_api_response(JobCard::at(job, now)))
}

/// Ends a posting early by moving its expiry to now.
#[axum::debug_handler]
pub async fn expire_job(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<JobCard> {
    let job = managed_job(&state, &claims, &job_id, true).await?;
    let now = Utc::now();
    if job.expires_at <= now {
        return Ok(success_to_api_response(JobCard::at(job, now)));
    }

    let job = state.db.expire_job(&job.id, now).await?;
    tracing::info!("Job {} expired by {}", job.id, claims.sub);
    Ok(success_to_api_response(JobCard::at(job, now)))
}

#[axum::debug_handler]
pub async fn admin_list_jobs(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Query(query): Query<AdminJobQuery>,
) -> ApiResult<Page<JobCard>> {
    claims.require(Role::Admin)?;
    let now = Utc::now();
    let filter = JobFilter {
        status: query.status,
        lock_flg: query.lock_flg,
        search: blank_to_none(query.search),
        ..Default::default()
    };
    let page = state.page(query.page, query.page_size);
    let jobs = state.db.list_jobs(&filter, page, now).await?;
    Ok(success_to_api_response(jobs.map(|job| JobCard::at(job, now))))
}

#[axum::debug_handler]
pub async fn set_lock(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(req): Json<LockRequest>,
) -> ApiResult<JobCard> {
    claims.require(Role::Admin)?;
    let job = state.db.set_job_lock(&job_id, req.lock_flg).await?;
    tracing::info!("Job {} lock_flg set to {}", job.id, job.lock_flg);
    Ok(success_to_api_response(JobCard::at(job, Utc::now())))
}

#[axum::debug_handler]
pub async fn delete_job(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<serde_json::Value> {
    claims.require(Role::Admin)?;
    state.db.delete_job(&job_id).await?;
    tracing::info!("Admin {} deleted job {}", claims.sub, job_id);
    Ok(success_to_api_response(serde_json::json!({ "deleted": job_id })))
}

/// Deletes postings expired before the cutoff along with their applications.
/// Cutoffs in the future are treated as now.
#[axum::debug_handler]
pub async fn purge_expired(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<PurgeRequest>,
) -> ApiResult<PurgeReport> {
    claims.require(Role::Admin)?;
    let now = Utc::now();
    let before = req.before.map_or(now, |before| before.min(now));
    let report = state.db.purge_expired_jobs(before).await?;
    Ok(success_to_api_response(report))
}
