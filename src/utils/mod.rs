use axum::Json;
use axum::http::StatusCode;
use bcrypt::{hash, verify};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Account, Role};

pub mod upload;

/// Lifetime of every issued bearer token.
pub const TOKEN_LIFETIME_DAYS: i64 = 7;

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), cost)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn require(&self, role: Role) -> Result<(), AppError> {
        self.require_any(&[role])
    }

    pub fn require_any(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            tracing::warn!("{} ({}) denied, needs one of {:?}", self.sub, self.role, roles);
            Err(AppError::Forbidden)
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("account has no identifier")]
    MissingIdentity,

    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub fn generate_token(account: &Account, config: &Config) -> Result<IssuedToken, TokenError> {
    generate_token_at(account, config, Utc::now())
}

/// Signs a token as if issued at `issued_at`; expiry is fixed relative to it.
pub fn generate_token_at(
    account: &Account,
    config: &Config,
    issued_at: DateTime<Utc>,
) -> Result<IssuedToken, TokenError> {
    if account.id.trim().is_empty() {
        return Err(TokenError::MissingIdentity);
    }
    let expires_at = issued_at + Duration::days(TOKEN_LIFETIME_DAYS);

    let claims = Claims {
        sub: account.id.clone(),
        email: account.email.clone(),
        username: account.username.clone(),
        role: account.role,
        iss: config.jwt_issuer.clone(),
        aud: config.jwt_audience.clone(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;

    Ok(IssuedToken { token, expires_at })
}

pub fn verify_token(token: &str, config: &Config) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_audience(&[&config.jwt_audience]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// Response envelope shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 0 on success, one of [`error_codes`] otherwise
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resp_data: Option<T>,
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: error_codes::SUCCESS,
        msg: "success".into(),
        resp_data: Some(data),
    })
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code,
        msg,
        resp_data: None,
    })
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Result of handlers that answer `201 Created`.
pub type ApiCreated<T> = Result<(StatusCode, Json<ApiResponse<T>>), AppError>;

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const CONFLICT: i32 = 1001;
    pub const AUTH_FAILED: i32 = 1002;
    pub const PERMISSION_DENIED: i32 = 1003;
    pub const NOT_FOUND: i32 = 1004;
    pub const PAYLOAD_TOO_LARGE: i32 = 1006;
    pub const INTERNAL_ERROR: i32 = 5000;
}
