use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::AppError,
    extract::{Json, Query},
    models::{Account, Page, ProfileDraft, Role},
    utils::{ApiCreated, ApiResult, Claims, success_to_api_response},
};

use super::model::{
    self, AccountQuery, AuthResponse, LoginRequest, MeResponse, RegisterCandidateRequest,
    RegisterEmployerRequest, require_name,
};

#[axum::debug_handler]
pub async fn register_candidate(
    State(state): State<AppState>,
    Json(req): Json<RegisterCandidateRequest>,
) -> ApiCreated<AuthResponse> {
    require_name(&req.profile.full_name, "full_name")?;
    let auth = model::register(
        &state,
        req.email,
        req.username,
        req.password,
        Some(ProfileDraft::Candidate(req.profile)),
        Role::Candidate,
    )
    .await?;
    Ok((StatusCode::CREATED, success_to_api_response(auth)))
}

#[axum::debug_handler]
pub async fn register_employer(
    State(state): State<AppState>,
    Json(req): Json<RegisterEmployerRequest>,
) -> ApiCreated<AuthResponse> {
    require_name(&req.profile.name, "name")?;
    let auth = model::register(
        &state,
        req.email,
        req.username,
        req.password,
        Some(ProfileDraft::Employer(req.profile)),
        Role::Employer,
    )
    .await?;
    Ok((StatusCode::CREATED, success_to_api_response(auth)))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    Ok(success_to_api_response(model::login(&state, req).await?))
}

#[axum::debug_handler]
pub async fn me(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> ApiResult<MeResponse> {
    Ok(success_to_api_response(model::me(&state, &claims).await?))
}

#[axum::debug_handler]
pub async fn list_accounts(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> ApiResult<Page<Account>> {
    claims.require(Role::Admin)?;
    let page = state.page(query.page, query.page_size);
    let accounts = state.db.list_accounts(query.role, page).await?;
    Ok(success_to_api_response(accounts))
}

#[axum::debug_handler]
pub async fn delete_account(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> ApiResult<serde_json::Value> {
    claims.require(Role::Admin)?;
    if account_id == claims.sub {
        return Err(AppError::validation("Administrators cannot delete themselves"));
    }
    state.db.delete_account(&account_id).await?;
    tracing::info!("Admin {} deleted account {}", claims.sub, account_id);
    Ok(success_to_api_response(serde_json::json!({ "deleted": account_id })))
}
