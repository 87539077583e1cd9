use actix_web::{HttpResponse, Responder, post, web};

use crate::auth::AuthConfig;
use crate::dto::users::{AccessTokenDto, RegisteredUserDto, TokenPairDto};
use crate::forms::auth::{RefreshForm, RegisterForm, RegisterPayload, TokenForm};
use crate::repository::DieselRepository;
use crate::routes::{error_response, form_error_response};
use crate::services::auth as auth_service;

#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterForm,
    responses(
        (status = 201, description = "Account and customer profile created", body = RegisteredUserDto),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Username already taken"),
    ),
    tag = "auth"
)]
#[post("/register")]
pub async fn register(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RegisterForm>,
) -> impl Responder {
    let payload: RegisterPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return form_error_response(e),
    };

    match auth_service::register(payload, repo.get_ref()) {
        Ok((user, _customer)) => HttpResponse::Created().json(RegisteredUserDto::from(user)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/token",
    request_body = TokenForm,
    responses(
        (status = 200, description = "Token pair with identity summary", body = TokenPairDto),
        (status = 401, description = "Bad credentials"),
    ),
    tag = "auth"
)]
#[post("/token")]
pub async fn issue_tokens(
    repo: web::Data<DieselRepository>,
    config: web::Data<AuthConfig>,
    web::Json(form): web::Json<TokenForm>,
) -> impl Responder {
    match auth_service::issue_tokens(form, repo.get_ref(), config.get_ref()) {
        Ok(issued) => HttpResponse::Ok().json(TokenPairDto::from(issued)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/token/refresh",
    request_body = RefreshForm,
    responses(
        (status = 200, description = "Fresh access token", body = AccessTokenDto),
        (status = 401, description = "Invalid or expired refresh token"),
    ),
    tag = "auth"
)]
#[post("/token/refresh")]
pub async fn refresh_token(
    repo: web::Data<DieselRepository>,
    config: web::Data<AuthConfig>,
    web::Json(form): web::Json<RefreshForm>,
) -> impl Responder {
    match auth_service::refresh_access_token(form, repo.get_ref(), config.get_ref()) {
        Ok(access_token) => HttpResponse::Ok().json(AccessTokenDto { access_token }),
        Err(err) => error_response(err),
    }
}
