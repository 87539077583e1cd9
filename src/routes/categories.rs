use actix_web::{HttpResponse, Responder, delete, get, patch, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::domain::category::CategoryChanges;
use crate::dto::categories::CategoryDto;
use crate::forms::categories::{CategoryForm, CategoryFormPayload, CategoryPatchForm};
use crate::repository::DieselRepository;
use crate::routes::{error_response, form_error_response};
use crate::services::ListParams;
use crate::services::categories as categories_service;

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    params(ListParams),
    responses(
        (status = 200, description = "Categories with their products", body = [CategoryDto]),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Audit path requires staff"),
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
#[get("/categories")]
pub async fn list_categories(
    user: AuthenticatedUser,
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match categories_service::list_categories(params.into_inner(), &user, repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(
            categories
                .into_iter()
                .map(CategoryDto::from)
                .collect::<Vec<_>>(),
        ),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{category_id}",
    params(("category_id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, body = CategoryDto),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Unknown or deleted category"),
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
#[get("/categories/{category_id}")]
pub async fn get_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match categories_service::get_category(category_id.into_inner(), &user, repo.get_ref()) {
        Ok(category) => HttpResponse::Ok().json(CategoryDto::from(category)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategoryForm,
    responses(
        (status = 201, body = CategoryDto),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
#[post("/categories")]
pub async fn create_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CategoryForm>,
) -> impl Responder {
    let payload: CategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return form_error_response(e),
    };

    match categories_service::create_category(payload, &user, repo.get_ref()) {
        Ok(category) => HttpResponse::Created().json(CategoryDto::from(category)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{category_id}",
    params(("category_id" = i32, Path, description = "Category id")),
    request_body = CategoryForm,
    responses(
        (status = 200, body = CategoryDto),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Unknown or deleted category"),
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
#[put("/categories/{category_id}")]
pub async fn update_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CategoryForm>,
) -> impl Responder {
    let payload: CategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return form_error_response(e),
    };

    apply_category_changes(
        category_id.into_inner(),
        payload.into_changes(),
        &user,
        repo.get_ref(),
    )
}

#[utoipa::path(
    patch,
    path = "/api/v1/categories/{category_id}",
    params(("category_id" = i32, Path, description = "Category id")),
    request_body = CategoryPatchForm,
    responses(
        (status = 200, body = CategoryDto),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Unknown or deleted category"),
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
#[patch("/categories/{category_id}")]
pub async fn patch_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CategoryPatchForm>,
) -> impl Responder {
    let changes: CategoryChanges = match form.try_into() {
        Ok(changes) => changes,
        Err(e) => return form_error_response(e),
    };

    apply_category_changes(category_id.into_inner(), changes, &user, repo.get_ref())
}

fn apply_category_changes(
    category_id: i32,
    changes: CategoryChanges,
    user: &AuthenticatedUser,
    repo: &DieselRepository,
) -> HttpResponse {
    match categories_service::update_category(category_id, changes, user, repo)
        .and_then(|category| categories_service::get_category(category.id.get(), user, repo))
    {
        Ok(category) => HttpResponse::Ok().json(CategoryDto::from(category)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{category_id}",
    params(("category_id" = i32, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category flagged as deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Unknown or already deleted category"),
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
#[delete("/categories/{category_id}")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match categories_service::delete_category(category_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
