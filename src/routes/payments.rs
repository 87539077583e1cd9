use actix_web::{HttpResponse, Responder, delete, get, patch, post, put, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::AuthenticatedUser;
use crate::domain::payment::PaymentChanges;
use crate::dto::payments::PaymentDto;
use crate::forms::payments::{PaymentForm, PaymentFormPayload, PaymentPatchForm};
use crate::repository::DieselRepository;
use crate::routes::{error_response, form_error_response};
use crate::services::ListParams;
use crate::services::payments as payments_service;

/// Extra filter accepted by the payment list endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentListParams {
    /// Restrict to the payments of one cart.
    pub cart_id: Option<i32>,
    pub page: Option<usize>,
    pub include_deleted: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v1/payments",
    params(PaymentListParams),
    responses(
        (status = 200, description = "Payment records with their carts", body = [PaymentDto]),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Audit path requires staff"),
    ),
    security(("bearer_auth" = [])),
    tag = "payments"
)]
#[get("/payments")]
pub async fn list_payments(
    user: AuthenticatedUser,
    params: web::Query<PaymentListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    let list_params = ListParams {
        page: params.page,
        include_deleted: params.include_deleted,
    };
    match payments_service::list_payments(list_params, params.cart_id, &user, repo.get_ref()) {
        Ok(payments) => HttpResponse::Ok().json(
            payments
                .into_iter()
                .map(PaymentDto::from)
                .collect::<Vec<_>>(),
        ),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/{payment_id}",
    params(("payment_id" = i32, Path, description = "Payment id")),
    responses(
        (status = 200, body = PaymentDto),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Unknown or deleted payment"),
    ),
    security(("bearer_auth" = [])),
    tag = "payments"
)]
#[get("/payments/{payment_id}")]
pub async fn get_payment(
    payment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match payments_service::get_payment(payment_id.into_inner(), &user, repo.get_ref()) {
        Ok(payment) => HttpResponse::Ok().json(PaymentDto::from(payment)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/payments",
    request_body = PaymentForm,
    responses(
        (status = 201, body = PaymentDto),
        (status = 400, description = "Validation failed or cart unresolved"),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "payments"
)]
#[post("/payments")]
pub async fn create_payment(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PaymentForm>,
) -> impl Responder {
    let payload: PaymentFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return form_error_response(e),
    };

    match payments_service::create_payment(payload, &user, repo.get_ref())
        .and_then(|payment| payments_service::get_payment(payment.id.get(), &user, repo.get_ref()))
    {
        Ok(payment) => HttpResponse::Created().json(PaymentDto::from(payment)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/payments/{payment_id}",
    params(("payment_id" = i32, Path, description = "Payment id")),
    request_body = PaymentPatchForm,
    responses(
        (status = 200, body = PaymentDto),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Unknown or deleted payment"),
    ),
    security(("bearer_auth" = [])),
    tag = "payments"
)]
#[put("/payments/{payment_id}")]
pub async fn update_payment(
    payment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PaymentPatchForm>,
) -> impl Responder {
    apply_payment_update(payment_id.into_inner(), form, &user, repo.get_ref())
}

#[utoipa::path(
    patch,
    path = "/api/v1/payments/{payment_id}",
    params(("payment_id" = i32, Path, description = "Payment id")),
    request_body = PaymentPatchForm,
    responses(
        (status = 200, body = PaymentDto),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Unknown or deleted payment"),
    ),
    security(("bearer_auth" = [])),
    tag = "payments"
)]
#[patch("/payments/{payment_id}")]
pub async fn patch_payment(
    payment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PaymentPatchForm>,
) -> impl Responder {
    apply_payment_update(payment_id.into_inner(), form, &user, repo.get_ref())
}

// The cart reference is fixed at creation; method, amount and status are the
// mutable surface, so full and partial updates share one body shape.
fn apply_payment_update(
    payment_id: i32,
    form: PaymentPatchForm,
    user: &AuthenticatedUser,
    repo: &DieselRepository,
) -> HttpResponse {
    let changes: PaymentChanges = match form.try_into() {
        Ok(changes) => changes,
        Err(e) => return form_error_response(e),
    };

    match payments_service::update_payment(payment_id, changes, user, repo)
        .and_then(|payment| payments_service::get_payment(payment.id.get(), user, repo))
    {
        Ok(payment) => HttpResponse::Ok().json(PaymentDto::from(payment)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/payments/{payment_id}",
    params(("payment_id" = i32, Path, description = "Payment id")),
    responses(
        (status = 204, description = "Payment flagged as deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Unknown or already deleted payment"),
    ),
    security(("bearer_auth" = [])),
    tag = "payments"
)]
#[delete("/payments/{payment_id}")]
pub async fn delete_payment(
    payment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match payments_service::delete_payment(payment_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
