use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    error::AppError,
    models::{
        Account, Candidate, CandidateProfile, Employer, EmployerProfile, NewAccount,
        ProfileDraft, Role,
    },
    utils::{Claims, IssuedToken, generate_token, hash_password, verify_password},
};

#[derive(Debug, Deserialize)]
pub struct RegisterCandidateRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(flatten)]
    pub profile: CandidateProfile,
}

#[derive(Debug, Deserialize)]
pub struct RegisterEmployerRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(flatten)]
    pub profile: EmployerProfile,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email or username.
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub account: Account,
    #[serde(flatten)]
    pub token: IssuedToken,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub account: Account,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer: Option<Employer>,
}

#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    pub role: Option<Role>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub(super) fn validate_credentials(
    email: &str,
    username: &str,
    password: &str,
) -> Result<(), AppError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => return Err(AppError::validation("Invalid email address")),
    }
    if username.len() < 3
        || username.len() > 32
        || !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(AppError::validation(
            "Username must be 3 to 32 characters of letters, digits, '_' or '.'",
        ));
    }
    let password_len = password.chars().count();
    if !(6..=64).contains(&password_len) {
        return Err(AppError::validation(
            "Password must be between 6 and 64 characters",
        ));
    }
    Ok(())
}

pub(crate) fn require_name(value: &str, field: &str) -> Result<(), AppError> {
    let len = value.trim().chars().count();
    if len == 0 || len > 200 {
        return Err(AppError::validation(format!(
            "{} must be between 1 and 200 characters",
            field
        )));
    }
    Ok(())
}

pub(super) async fn register(
    state: &AppState,
    email: String,
    username: String,
    password: String,
    profile: Option<ProfileDraft>,
    role: Role,
) -> Result<AuthResponse, AppError> {
    validate_credentials(&email, &username, &password)?;

    let password_hash = hash_password(&password, state.config.password_hash_cost)?;
    let account = state
        .db
        .create_account(
            NewAccount {
                email: email.trim().to_string(),
                username,
                password_hash,
                role,
            },
            profile,
        )
        .await?;

    tracing::info!("Registered {} account {}", account.role, account.id);
    let token = generate_token(&account, &state.config)?;
    Ok(AuthResponse { account, token })
}

pub(super) async fn login(state: &AppState, req: LoginRequest) -> Result<AuthResponse, AppError> {
    let account = state
        .db
        .find_account_by_login(req.login.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&req.password, &account.password_hash)? {
        tracing::warn!("Failed login for account {}", account.id);
        return Err(AppError::Unauthorized);
    }

    let token = generate_token(&account, &state.config)?;
    Ok(AuthResponse { account, token })
}

pub(super) async fn me(state: &AppState, claims: &Claims) -> Result<MeResponse, AppError> {
    let account = state
        .db
        .find_account(&claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("Account"))?;

    let (candidate, employer) = match account.role {
        Role::Candidate => (state.db.find_candidate_by_account(&account.id).await?, None),
        Role::Employer => (None, state.db.find_employer_by_account(&account.id).await?),
        Role::Admin => (None, None),
    };

    Ok(MeResponse {
        account,
        candidate,
        employer,
    })
}

/// Username derived from an email's local part, restricted to the
/// characters `validate_credentials` accepts.
fn admin_username(email: &str) -> String {
    let local: String = email
        .split('@')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
        .take(24)
        .collect();
    if local.len() < 3 {
        "admin".to_string()
    } else {
        local
    }
}

/// Creates the configured admin account unless one with that email exists.
pub async fn seed_admin(state: &AppState) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (
        state.config.admin_email.as_deref(),
        state.config.admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    if state.db.find_account_by_login(email).await?.is_some() {
        tracing::debug!("Admin account {} already present", email);
        return Ok(());
    }

    let base = admin_username(email);
    let mut username = base.clone();
    let mut suffix = 1;
    while state.db.find_account_by_login(&username).await?.is_some() {
        username = format!("{}{}", base, suffix);
        suffix += 1;
    }
    register(
        state,
        email.to_string(),
        username,
        password.to_string(),
        None,
        Role::Admin,
    )
    .await?;
    tracing::info!("Seeded admin account {}", email);
    Ok(())
}
