use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::user::User;
use crate::services::auth::IssuedTokens;

/// Identity summary returned by the registration endpoint. The password is
/// write-only and never appears here.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisteredUserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for RegisteredUserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.get(),
            username: value.username.into_inner(),
            email: value.email.into_inner(),
            first_name: value.first_name,
            last_name: value.last_name,
        }
    }
}

/// Compact identity summary attached to token issuance responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummaryDto {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<User> for UserSummaryDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.get(),
            username: value.username.into_inner(),
            email: value.email.into_inner(),
        }
    }
}

/// Response of the token issuance endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenPairDto {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserSummaryDto,
}

impl From<IssuedTokens> for TokenPairDto {
    fn from(value: IssuedTokens) -> Self {
        Self {
            access_token: value.access_token,
            refresh_token: value.refresh_token,
            user: UserSummaryDto::from(value.user),
        }
    }
}

/// Response of the token refresh endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccessTokenDto {
    pub access_token: String,
}
