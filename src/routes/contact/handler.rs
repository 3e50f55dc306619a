use axum::{
    extract::{Extension, State},
    http::StatusCode,
};

use crate::{
    AppState,
    extract::{Json, Query},
    models::{Contact, NewContact, Page, Role},
    utils::{ApiCreated, ApiResult, Claims, success_to_api_response},
};

use super::model::{ContactQuery, validate_contact};

#[axum::debug_handler]
pub async fn create_contact(
    State(state): State<AppState>,
    Json(contact): Json<NewContact>,
) -> ApiCreated<Contact> {
    validate_contact(&contact)?;
    let contact = state.db.create_contact(contact).await?;
    tracing::info!("Contact message {} received", contact.id);
    Ok((StatusCode::CREATED, success_to_api_response(contact)))
}

#[axum::debug_handler]
pub async fn list_contacts(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Query(query): Query<ContactQuery>,
) -> ApiResult<Page<Contact>> {
    claims.require(Role::Admin)?;
    let page = state.page(query.page, query.page_size);
    Ok(success_to_api_response(state.db.list_contacts(page).await?))
}
