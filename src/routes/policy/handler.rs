use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::AppError,
    extract::{Json, Query},
    models::{NewPolicy, Page, Policy, Role},
    utils::{ApiCreated, ApiResult, Claims, success_to_api_response},
};

use super::model::{PolicyQuery, validate_policy};

#[axum::debug_handler]
pub async fn list_policies(
    State(state): State<AppState>,
    Query(query): Query<PolicyQuery>,
) -> ApiResult<Page<Policy>> {
    let page = state.page(query.page, query.page_size);
    Ok(success_to_api_response(state.db.list_policies(page).await?))
}

#[axum::debug_handler]
pub async fn get_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Policy> {
    let policy = state
        .db
        .find_policy(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Policy"))?;
    Ok(success_to_api_response(policy))
}

#[axum::debug_handler]
pub async fn create_policy(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(policy): Json<NewPolicy>,
) -> ApiCreated<Policy> {
    claims.require(Role::Admin)?;
    validate_policy(&policy)?;
    let policy = state.db.create_policy(policy).await?;
    Ok((StatusCode::CREATED, success_to_api_response(policy)))
}

#[axum::debug_handler]
pub async fn update_policy(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(policy): Json<NewPolicy>,
) -> ApiResult<Policy> {
    claims.require(Role::Admin)?;
    validate_policy(&policy)?;
    Ok(success_to_api_response(state.db.update_policy(&id, policy).await?))
}

#[axum::debug_handler]
pub async fn delete_policy(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    claims.require(Role::Admin)?;
    state.db.delete_policy(&id).await?;
    Ok(success_to_api_response(serde_json::json!({ "deleted": id })))
}
