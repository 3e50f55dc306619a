use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    error::AppError,
    models::{
        ApplicationCounts, EmployerSummary, JobDraft, JobPosting, JobStatus, Role, TimeRemaining,
    },
    routes::employer::current_employer,
    utils::Claims,
};

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AdminJobQuery {
    pub status: Option<JobStatus>,
    pub lock_flg: Option<i16>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct LockRequest {
    pub lock_flg: i16,
}

#[derive(Debug, Default, Deserialize)]
pub struct PurgeRequest {
    /// Defaults to now.
    pub before: Option<DateTime<Utc>>,
}

/// A posting with its derived status, as shown in lists.
#[derive(Debug, Serialize)]
pub struct JobCard {
    #[serde(flatten)]
    pub job: JobPosting,
    pub status: JobStatus,
    pub time_remaining: TimeRemaining,
}

impl JobCard {
    pub fn at(job: JobPosting, now: DateTime<Utc>) -> Self {
        Self {
            status: job.status_at(now),
            time_remaining: job.time_remaining_at(now),
            job,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub card: JobCard,
    pub employer: Option<EmployerSummary>,
    pub applications: ApplicationCounts,
}

pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(super) fn validate_draft(draft: &JobDraft, now: DateTime<Utc>) -> Result<(), AppError> {
    let title_len = draft.title.trim().chars().count();
    if title_len == 0 || title_len > 200 {
        return Err(AppError::validation("Title must be between 1 and 200 characters"));
    }
    if draft.quantity < 1 {
        return Err(AppError::validation("Quantity must be at least 1"));
    }
    if draft.salary_min.is_some_and(|s| s < 0) || draft.salary_max.is_some_and(|s| s < 0) {
        return Err(AppError::validation("Salary cannot be negative"));
    }
    if let (Some(min), Some(max)) = (draft.salary_min, draft.salary_max) {
        if min > max {
            return Err(AppError::validation("Minimum salary exceeds maximum salary"));
        }
    }
    if draft.expires_at <= now {
        return Err(AppError::validation("Expiry time must be in the future"));
    }
    Ok(())
}

pub(crate) async fn find_job(state: &AppState, job_id: &str) -> Result<JobPosting, AppError> {
    state
        .db
        .find_job(job_id)
        .await?
        .ok_or_else(|| AppError::not_found("Job posting"))
}

/// Loads a posting the caller may manage: its employer, or any admin when
/// `allow_admin` is set.
pub(crate) async fn managed_job(
    state: &AppState,
    claims: &Claims,
    job_id: &str,
    allow_admin: bool,
) -> Result<JobPosting, AppError> {
    if allow_admin {
        claims.require_any(&[Role::Employer, Role::Admin])?;
    } else {
        claims.require(Role::Employer)?;
    }
    let job = find_job(state, job_id).await?;
    if claims.is_admin() {
        return Ok(job);
    }
    let employer = current_employer(state, claims).await?;
    if employer.id != job.employer_id {
        return Err(AppError::Forbidden);
    }
    Ok(job)
}

async fn can_view_locked(state: &AppState, viewer: Option<&Claims>, job: &JobPosting) -> bool {
    match viewer {
        Some(claims) if claims.is_admin() => true,
        Some(claims) if claims.role == Role::Employer => state
            .db
            .find_employer_by_account(&claims.sub)
            .await
            .ok()
            .flatten()
            .is_some_and(|e| e.id == job.employer_id),
        _ => false,
    }
}

pub(super) async fn job_detail(
    state: &AppState,
    job_id: &str,
    viewer: Option<&Claims>,
) -> Result<JobDetail, AppError> {
    let job = find_job(state, job_id).await?;
    if job.is_locked() && !can_view_locked(state, viewer, &job).await {
        return Err(AppError::not_found("Job posting"));
    }

    let (employer, applications) = futures_util::try_join!(
        state.db.find_employer(&job.employer_id),
        state.db.application_counts(&job.id),
    )?;

    Ok(JobDetail {
        card: JobCard::at(job, Utc::now()),
        employer: employer.map(EmployerSummary::from),
        applications,
    })
}
