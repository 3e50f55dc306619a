use serde::Deserialize;

use crate::{
    AppState,
    error::AppError,
    models::{Employer, JobStatus, Role},
    utils::Claims,
};

#[derive(Debug, Deserialize)]
pub struct EmployerQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct MyJobsQuery {
    pub status: Option<JobStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Employer profile owned by the calling account.
pub(crate) async fn current_employer(state: &AppState, claims: &Claims) -> Result<Employer, AppError> {
    claims.require(Role::Employer)?;
    state
        .db
        .find_employer_by_account(&claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("Employer profile"))
}
