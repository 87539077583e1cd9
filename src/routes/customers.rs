use actix_web::{HttpResponse, Responder, delete, get, patch, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::customers::CustomerDto;
use crate::forms::customers::{CustomerForm, CustomerFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{error_response, form_error_response};
use crate::services::ListParams;
use crate::services::customers as customers_service;

#[utoipa::path(
    get,
    path = "/api/v1/customers",
    params(ListParams),
    responses(
        (status = 200, description = "Customer profiles", body = [CustomerDto]),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Audit path requires staff"),
    ),
    security(("bearer_auth" = [])),
    tag = "customers"
)]
#[get("/customers")]
pub async fn list_customers(
    user: AuthenticatedUser,
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customers_service::list_customers(params.into_inner(), &user, repo.get_ref()) {
        Ok(customers) => HttpResponse::Ok().json(
            customers
                .into_iter()
                .map(CustomerDto::from)
                .collect::<Vec<_>>(),
        ),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/{customer_id}",
    params(("customer_id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, body = CustomerDto),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Unknown or deleted customer"),
    ),
    security(("bearer_auth" = [])),
    tag = "customers"
)]
#[get("/customers/{customer_id}")]
pub async fn get_customer(
    customer_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customers_service::get_customer(customer_id.into_inner(), &user, repo.get_ref()) {
        Ok(customer) => HttpResponse::Ok().json(CustomerDto::from(customer)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body = CustomerForm,
    responses(
        (status = 201, body = CustomerDto),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthenticated"),
        (status = 409, description = "Profile or cpf already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "customers"
)]
#[post("/customers")]
pub async fn create_customer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CustomerForm>,
) -> impl Responder {
    let payload: CustomerFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return form_error_response(e),
    };

    match customers_service::create_customer(payload, &user, repo.get_ref()) {
        Ok(customer) => HttpResponse::Created().json(CustomerDto::from(customer)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/customers/{customer_id}",
    params(("customer_id" = i32, Path, description = "Customer id")),
    request_body = CustomerForm,
    responses(
        (status = 200, body = CustomerDto),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Unknown or deleted customer"),
        (status = 409, description = "cpf already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "customers"
)]
#[put("/customers/{customer_id}")]
pub async fn update_customer(
    customer_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CustomerForm>,
) -> impl Responder {
    apply_customer_update(customer_id.into_inner(), form, &user, repo.get_ref())
}

#[utoipa::path(
    patch,
    path = "/api/v1/customers/{customer_id}",
    params(("customer_id" = i32, Path, description = "Customer id")),
    request_body = CustomerForm,
    responses(
        (status = 200, body = CustomerDto),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Unknown or deleted customer"),
        (status = 409, description = "cpf already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "customers"
)]
#[patch("/customers/{customer_id}")]
pub async fn patch_customer(
    customer_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CustomerForm>,
) -> impl Responder {
    apply_customer_update(customer_id.into_inner(), form, &user, repo.get_ref())
}

// Every profile field is optional, so full and partial updates share one
// body shape.
fn apply_customer_update(
    customer_id: i32,
    form: CustomerForm,
    user: &AuthenticatedUser,
    repo: &DieselRepository,
) -> HttpResponse {
    let payload: CustomerFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return form_error_response(e),
    };

    match customers_service::update_customer(customer_id, payload, user, repo) {
        Ok(customer) => HttpResponse::Ok().json(CustomerDto::from(customer)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/customers/{customer_id}",
    params(("customer_id" = i32, Path, description = "Customer id")),
    responses(
        (status = 204, description = "Customer flagged as deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Unknown or already deleted customer"),
    ),
    security(("bearer_auth" = [])),
    tag = "customers"
)]
#[delete("/customers/{customer_id}")]
pub async fn delete_customer(
    customer_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customers_service::delete_customer(customer_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
