use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
};
use chrono::Utc;
use futures_util::future::try_join_all;

use crate::{
    AppState,
    error::AppError,
    extract::{Json, Query},
    models::{ApplyForm, JobStatus, NewApplyForm, Page},
    routes::{
        candidate::current_candidate,
        job::{find_job, managed_job},
    },
    utils::{ApiCreated, ApiResult, Claims, success_to_api_response},
};

use super::model::{
    ApplicantsQuery, Applicant, ApplyRequest, MAX_COVER_LETTER_CHARS, ReviewRequest,
};

#[axum::debug_handler]
pub async fn apply(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(req): Json<ApplyRequest>,
) -> ApiCreated<ApplyForm> {
    let candidate = current_candidate(&state, &claims).await?;
    if req.cover_letter.chars().count() > MAX_COVER_LETTER_CHARS {
        return Err(AppError::validation(format!(
            "Cover letter exceeds {} characters",
            MAX_COVER_LETTER_CHARS
        )));
    }

    let job = find_job(&state, &job_id).await?;
    match job.status_at(Utc::now()) {
        JobStatus::Open => {}
        JobStatus::Locked => return Err(AppError::not_found("Job posting")),
        JobStatus::Expired => {
            return Err(AppError::validation("Job posting is no longer accepting applications"));
        }
    }

    let form = state
        .db
        .create_application(NewApplyForm {
            job_posting_id: job.id,
            candidate_id: candidate.id,
            cover_letter: req.cover_letter,
            cv: candidate.cv,
        })
        .await?;
    tracing::info!(
        "Candidate {} applied to job {}",
        form.candidate_id,
        form.job_posting_id
    );
    Ok((StatusCode::CREATED, success_to_api_response(form)))
}

#[axum::debug_handler]
pub async fn withdraw(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<serde_json::Value> {
    let candidate = current_candidate(&state, &claims).await?;
    state.db.delete_application(&job_id, &candidate.id).await?;
    Ok(success_to_api_response(serde_json::json!({ "withdrawn": job_id })))
}

#[axum::debug_handler]
pub async fn list_job_applications(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(query): Query<ApplicantsQuery>,
) -> ApiResult<Page<Applicant>> {
    let job = managed_job(&state, &claims, &job_id, true).await?;
    let page = state.page(query.page, query.page_size);
    let applications = state
        .db
        .list_job_applications(&job.id, query.status, page)
        .await?;

    let candidates = try_join_all(
        applications
            .items
            .iter()
            .map(|a| state.db.find_candidate(&a.candidate_id)),
    )
    .await?;

    let mut candidates = candidates.into_iter();
    Ok(success_to_api_response(applications.map(|application| Applicant {
        application,
        candidate: candidates.next().flatten(),
    })))
}

#[axum::debug_handler]
pub async fn review(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path((job_id, candidate_id)): Path<(String, String)>,
    Json(req): Json<ReviewRequest>,
) -> ApiResult<ApplyForm> {
    let job = managed_job(&state, &claims, &job_id, false).await?;
    let form = state
        .db
        .set_application_status(&job.id, &candidate_id, req.status, Utc::now())
        .await?;
    tracing::info!(
        "Application {}/{} marked {:?}",
        form.job_posting_id,
        form.candidate_id,
        form.status
    );
    Ok(success_to_api_response(form))
}
