use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    error::AppError,
    models::{ApplyForm, Candidate, Role},
    routes::job::JobCard,
    utils::Claims,
};

#[derive(Debug, Deserialize)]
pub struct ApplicationsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// One of the caller's applications with the posting it targets. `job` is
/// absent once the posting has been removed or locked.
#[derive(Debug, Serialize)]
pub struct CandidateApplication {
    #[serde(flatten)]
    pub application: ApplyForm,
    pub job: Option<JobCard>,
}

/// Candidate profile owned by the calling account.
pub(crate) async fn current_candidate(
    state: &AppState,
    claims: &Claims,
) -> Result<Candidate, AppError> {
    claims.require(Role::Candidate)?;
    state
        .db
        .find_candidate_by_account(&claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("Candidate profile"))
}
