use serde::Deserialize;

use crate::{error::AppError, models::NewPolicy, routes::account::require_name};

#[derive(Debug, Deserialize)]
pub struct PolicyQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub(super) fn validate_policy(policy: &NewPolicy) -> Result<(), AppError> {
    require_name(&policy.title, "title")?;
    if policy.content.trim().is_empty() {
        return Err(AppError::validation("Content cannot be empty"));
    }
    Ok(())
}
