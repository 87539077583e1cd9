use std::collections::HashMap;

use actix_web::HttpResponse;
use validator::ValidationErrors;

use crate::forms::FormError;
use crate::services::ServiceError;

pub mod auth;
pub mod cart_items;
pub mod carts;
pub mod categories;
pub mod customers;
pub mod docs;
pub mod payments;
pub mod products;

/// Flattens validator output into the `{"field": ["message", ...]}` shape
/// the API promises for every 400.
fn field_errors_body(errors: &ValidationErrors) -> HashMap<String, Vec<String>> {
    errors
        .field_errors()
        .iter()
        .map(|(field, field_errors)| {
            let messages = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

fn field_body(field: &str, message: &str) -> serde_json::Value {
    serde_json::json!({ field: [message] })
}

/// Maps a service error onto the HTTP error taxonomy. Internal details never
/// reach the caller; they were already logged at the failure site.
pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Validation(errors) => {
            HttpResponse::BadRequest().json(field_errors_body(&errors))
        }
        ServiceError::Reference { field } => {
            HttpResponse::BadRequest().json(field_body(field, "not found"))
        }
        ServiceError::Conflict { field, message } => {
            HttpResponse::Conflict().json(field_body(field, message))
        }
        ServiceError::Unauthorized => HttpResponse::Unauthorized().json(serde_json::json!({
            "detail": "Authentication credentials were not provided or are invalid."
        })),
        ServiceError::Forbidden => HttpResponse::Forbidden().json(serde_json::json!({
            "detail": "You do not have permission to perform this action."
        })),
        ServiceError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
            "detail": "Not found."
        })),
        ServiceError::Internal => HttpResponse::InternalServerError().finish(),
    }
}

/// Maps a request-body conversion failure onto a 400 response.
pub fn form_error_response(err: FormError) -> HttpResponse {
    match err {
        FormError::Validation(errors) => HttpResponse::BadRequest().json(field_errors_body(&errors)),
        FormError::TypeConstraint(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "detail": e.to_string()
        })),
    }
}
