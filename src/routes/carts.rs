use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::carts::CartDto;
use crate::forms::carts::{CartForm, CartFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{error_response, form_error_response};
use crate::services::ListParams;
use crate::services::carts as carts_service;

#[utoipa::path(
    get,
    path = "/api/v1/carts",
    params(ListParams),
    responses(
        (status = 200, description = "Carts with their line items", body = [CartDto]),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Audit path requires staff"),
    ),
    security(("bearer_auth" = [])),
    tag = "carts"
)]
#[get("/carts")]
pub async fn list_carts(
    user: AuthenticatedUser,
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match carts_service::list_carts(params.into_inner(), &user, repo.get_ref()) {
        Ok(carts) => {
            HttpResponse::Ok().json(carts.into_iter().map(CartDto::from).collect::<Vec<_>>())
        }
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/carts/{cart_id}",
    params(("cart_id" = i32, Path, description = "Cart id")),
    responses(
        (status = 200, body = CartDto),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Unknown or deleted cart"),
    ),
    security(("bearer_auth" = [])),
    tag = "carts"
)]
#[get("/carts/{cart_id}")]
pub async fn get_cart(
    cart_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match carts_service::get_cart(cart_id.into_inner(), &user, repo.get_ref()) {
        Ok(cart) => HttpResponse::Ok().json(CartDto::from(cart)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/carts",
    request_body = CartForm,
    responses(
        (status = 201, body = CartDto),
        (status = 400, description = "Validation failed or customer unresolved"),
        (status = 401, description = "Unauthenticated"),
        (status = 409, description = "Customer already has a cart"),
    ),
    security(("bearer_auth" = [])),
    tag = "carts"
)]
#[post("/carts")]
pub async fn create_cart(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CartForm>,
) -> impl Responder {
    let payload: CartFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return form_error_response(e),
    };

    match carts_service::create_cart(payload, &user, repo.get_ref()) {
        Ok(cart) => HttpResponse::Created().json(CartDto::from(cart)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/carts/{cart_id}",
    params(("cart_id" = i32, Path, description = "Cart id")),
    request_body = CartForm,
    responses(
        (status = 200, body = CartDto),
        (status = 400, description = "Validation failed or customer unresolved"),
        (status = 404, description = "Unknown or deleted cart"),
        (status = 409, description = "Customer already has a cart"),
    ),
    security(("bearer_auth" = [])),
    tag = "carts"
)]
#[put("/carts/{cart_id}")]
pub async fn update_cart(
    cart_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CartForm>,
) -> impl Responder {
    let payload: CartFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return form_error_response(e),
    };

    match carts_service::update_cart(cart_id.into_inner(), payload, &user, repo.get_ref())
        .and_then(|cart| carts_service::get_cart(cart.id.get(), &user, repo.get_ref()))
    {
        Ok(cart) => HttpResponse::Ok().json(CartDto::from(cart)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/carts/{cart_id}",
    params(("cart_id" = i32, Path, description = "Cart id")),
    responses(
        (status = 204, description = "Cart flagged as deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Unknown or already deleted cart"),
    ),
    security(("bearer_auth" = [])),
    tag = "carts"
)]
#[delete("/carts/{cart_id}")]
pub async fn delete_cart(
    cart_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match carts_service::delete_cart(cart_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
