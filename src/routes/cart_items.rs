use actix_web::{HttpResponse, Responder, delete, get, patch, post, put, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::AuthenticatedUser;
use crate::domain::types::Quantity;
use crate::dto::carts::CartItemDto;
use crate::forms::carts::{CartItemForm, CartItemFormPayload, CartItemQuantityForm};
use crate::repository::DieselRepository;
use crate::routes::{error_response, form_error_response};
use crate::services::ListParams;
use crate::services::carts as carts_service;

/// Extra filter accepted by the line-item list endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CartItemListParams {
    /// Restrict to the items of one cart.
    pub cart_id: Option<i32>,
    pub page: Option<usize>,
    pub include_deleted: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v1/cart-items",
    params(CartItemListParams),
    responses(
        (status = 200, description = "Cart line items", body = [CartItemDto]),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Audit path requires staff"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart items"
)]
#[get("/cart-items")]
pub async fn list_cart_items(
    user: AuthenticatedUser,
    params: web::Query<CartItemListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    let list_params = ListParams {
        page: params.page,
        include_deleted: params.include_deleted,
    };
    match carts_service::list_cart_items(list_params, params.cart_id, &user, repo.get_ref()) {
        Ok(items) => {
            HttpResponse::Ok().json(items.into_iter().map(CartItemDto::from).collect::<Vec<_>>())
        }
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/cart-items/{item_id}",
    params(("item_id" = i32, Path, description = "Cart item id")),
    responses(
        (status = 200, body = CartItemDto),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Unknown or deleted cart item"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart items"
)]
#[get("/cart-items/{item_id}")]
pub async fn get_cart_item(
    item_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match carts_service::get_cart_item(item_id.into_inner(), &user, repo.get_ref()) {
        Ok(item) => HttpResponse::Ok().json(CartItemDto::from(item)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/cart-items",
    request_body = CartItemForm,
    responses(
        (status = 201, description = "Line created or quantity accumulated", body = CartItemDto),
        (status = 400, description = "Validation failed or reference unresolved"),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart items"
)]
#[post("/cart-items")]
pub async fn add_cart_item(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CartItemForm>,
) -> impl Responder {
    let payload: CartItemFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return form_error_response(e),
    };

    match carts_service::add_cart_item(payload, &user, repo.get_ref()) {
        Ok(item) => HttpResponse::Created().json(CartItemDto::from(item)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/cart-items/{item_id}",
    params(("item_id" = i32, Path, description = "Cart item id")),
    request_body = CartItemQuantityForm,
    responses(
        (status = 200, body = CartItemDto),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Unknown or deleted cart item"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart items"
)]
#[put("/cart-items/{item_id}")]
pub async fn update_cart_item(
    item_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CartItemQuantityForm>,
) -> impl Responder {
    apply_quantity_update(item_id.into_inner(), form, &user, repo.get_ref())
}

#[utoipa::path(
    patch,
    path = "/api/v1/cart-items/{item_id}",
    params(("item_id" = i32, Path, description = "Cart item id")),
    request_body = CartItemQuantityForm,
    responses(
        (status = 200, body = CartItemDto),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Unknown or deleted cart item"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart items"
)]
#[patch("/cart-items/{item_id}")]
pub async fn patch_cart_item(
    item_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CartItemQuantityForm>,
) -> impl Responder {
    apply_quantity_update(item_id.into_inner(), form, &user, repo.get_ref())
}

// Quantity is the only mutable column, so full and partial updates share
// one body shape.
fn apply_quantity_update(
    item_id: i32,
    form: CartItemQuantityForm,
    user: &AuthenticatedUser,
    repo: &DieselRepository,
) -> HttpResponse {
    let quantity: Quantity = match form.try_into() {
        Ok(quantity) => quantity,
        Err(e) => return form_error_response(e),
    };

    match carts_service::set_cart_item_quantity(item_id, quantity, user, repo) {
        Ok(item) => HttpResponse::Ok().json(CartItemDto::from(item)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/cart-items/{item_id}",
    params(("item_id" = i32, Path, description = "Cart item id")),
    responses(
        (status = 204, description = "Cart item flagged as deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Unknown or already deleted cart item"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart items"
)]
#[delete("/cart-items/{item_id}")]
pub async fn delete_cart_item(
    item_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match carts_service::delete_cart_item(item_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
