use serde::Deserialize;

use crate::{error::AppError, models::NewContact, routes::account::require_name};

const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Debug, Deserialize)]
pub struct ContactQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub(super) fn validate_contact(contact: &NewContact) -> Result<(), AppError> {
    require_name(&contact.name, "name")?;
    if !contact.email.contains('@') {
        return Err(AppError::validation("Invalid email address"));
    }
    let len = contact.message.trim().chars().count();
    if len == 0 || len > MAX_MESSAGE_CHARS {
        return Err(AppError::validation(format!(
            "Message must be between 1 and {} characters",
            MAX_MESSAGE_CHARS
        )));
    }
    Ok(())
}
