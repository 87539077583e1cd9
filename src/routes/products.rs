use actix_web::{HttpResponse, Responder, delete, get, patch, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::domain::product::ProductChanges;
use crate::dto::products::ProductDto;
use crate::forms::products::{ProductForm, ProductFormPayload, ProductPatchForm};
use crate::repository::DieselRepository;
use crate::routes::{error_response, form_error_response};
use crate::services::ListParams;
use crate::services::products as products_service;

#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ListParams),
    responses(
        (status = 200, description = "Products in the catalog", body = [ProductDto]),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Audit path requires staff"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
#[get("/products")]
pub async fn list_products(
    user: AuthenticatedUser,
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products_service::list_products(params.into_inner(), None, &user, repo.get_ref()) {
        Ok(products) => HttpResponse::Ok().json(
            products
                .into_iter()
                .map(ProductDto::from)
                .collect::<Vec<_>>(),
        ),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{product_id}",
    params(("product_id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, body = ProductDto),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Unknown or deleted product"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
#[get("/products/{product_id}")]
pub async fn get_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products_service::get_product(product_id.into_inner(), &user, repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(ProductDto::from(product)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductForm,
    responses(
        (status = 201, body = ProductDto),
        (status = 400, description = "Validation failed or category unresolved"),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
#[post("/products")]
pub async fn create_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProductForm>,
) -> impl Responder {
    let payload: ProductFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return form_error_response(e),
    };

    match products_service::create_product(payload, &user, repo.get_ref()) {
        Ok(product) => HttpResponse::Created().json(ProductDto::from(product)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{product_id}",
    params(("product_id" = i32, Path, description = "Product id")),
    request_body = ProductForm,
    responses(
        (status = 200, body = ProductDto),
        (status = 400, description = "Validation failed or category unresolved"),
        (status = 404, description = "Unknown or deleted product"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
#[put("/products/{product_id}")]
pub async fn update_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProductForm>,
) -> impl Responder {
    let payload: ProductFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return form_error_response(e),
    };

    match products_service::update_product(
        product_id.into_inner(),
        payload.into_changes(),
        &user,
        repo.get_ref(),
    ) {
        Ok(product) => HttpResponse::Ok().json(ProductDto::from(product)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/products/{product_id}",
    params(("product_id" = i32, Path, description = "Product id")),
    request_body = ProductPatchForm,
    responses(
        (status = 200, body = ProductDto),
        (status = 400, description = "Validation failed or category unresolved"),
        (status = 404, description = "Unknown or deleted product"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
#[patch("/products/{product_id}")]
pub async fn patch_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProductPatchForm>,
) -> impl Responder {
    let changes: ProductChanges = match form.try_into() {
        Ok(changes) => changes,
        Err(e) => return form_error_response(e),
    };

    match products_service::update_product(product_id.into_inner(), changes, &user, repo.get_ref())
    {
        Ok(product) => HttpResponse::Ok().json(ProductDto::from(product)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{product_id}",
    params(("product_id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product flagged as deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Unknown or already deleted product"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
#[delete("/products/{product_id}")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products_service::delete_product(product_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
