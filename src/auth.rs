//! Bearer-token authentication: JWT issuance/verification, the actix
//! extractor injecting the authenticated caller into handlers, and password
//! hashing.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::user::User;

/// Errors produced while issuing or verifying credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token is malformed, has a bad signature, or expired.
    #[error("invalid or expired token")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    /// An access token was presented where a refresh token was expected, or
    /// the other way around.
    #[error("token is not valid for this purpose")]
    WrongTokenUse,
    /// The supplied password does not match the stored credential.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Password hashing failed.
    #[error("password hashing error")]
    PasswordHash,
}

/// Settings for token issuance, shared as actix app data.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
}

/// Discriminates the two tokens of a pair; each endpoint accepts only one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// JWT claims of an authenticated caller. Extracted from the
/// `Authorization: Bearer` header on every protected route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// User id.
    pub sub: i32,
    pub username: String,
    pub email: String,
    /// Staff accounts may use the include-deleted read path.
    pub is_staff: bool,
    pub token_use: TokenUse,
    pub iat: i64,
    pub exp: i64,
}

/// Issues one token of the pair for `user`.
fn issue_token(user: &User, token_use: TokenUse, config: &AuthConfig) -> Result<String, AuthError> {
    let ttl = match token_use {
        TokenUse::Access => Duration::minutes(config.access_token_ttl_minutes),
        TokenUse::Refresh => Duration::days(config.refresh_token_ttl_days),
    };
    let now = Utc::now();
    let claims = AuthenticatedUser {
        sub: user.id.get(),
        username: user.username.to_string(),
        email: user.email.to_string(),
        is_staff: user.is_staff,
        token_use,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?)
}

/// Issues a short-lived access token.
pub fn issue_access_token(user: &User, config: &AuthConfig) -> Result<String, AuthError> {
    issue_token(user, TokenUse::Access, config)
}

/// Issues a longer-lived refresh token.
pub fn issue_refresh_token(user: &User, config: &AuthConfig) -> Result<String, AuthError> {
    issue_token(user, TokenUse::Refresh, config)
}

/// Verifies signature and expiry, then checks the token is of the expected
/// kind.
pub fn decode_token(
    token: &str,
    expected: TokenUse,
    config: &AuthConfig,
) -> Result<AuthenticatedUser, AuthError> {
    let data = decode::<AuthenticatedUser>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    if data.claims.token_use != expected {
        return Err(AuthError::WrongTokenUse);
    }
    Ok(data.claims)
}

/// Hashes a plaintext password for storage; the plaintext never leaves this
/// function's caller.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verifies a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

fn unauthorized_error() -> actix_web::Error {
    actix_web::error::InternalError::from_response(
        "invalid bearer token",
        HttpResponse::Unauthorized().json(serde_json::json!({
            "detail": "Authentication credentials were not provided or are invalid."
        })),
    )
    .into()
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let Some(config) = req.app_data::<web::Data<AuthConfig>>() else {
        log::error!("AuthConfig is missing from app data");
        return Err(actix_web::error::ErrorInternalServerError("auth misconfigured"));
    };

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(unauthorized_error)?;

    decode_token(token, TokenUse::Access, config).map_err(|_| unauthorized_error())
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        std::future::ready(authenticate(req))
    }
}
