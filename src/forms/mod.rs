//! Request-body structs. Surface validation runs through `validator`; the
//! `TryFrom` conversions then produce strongly-typed payloads for the service
//! layer, so handlers never touch raw primitives.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod auth;
pub mod carts;
pub mod categories;
pub mod customers;
pub mod payments;
pub mod products;

/// Error produced when converting a request body into a typed payload.
#[derive(Debug, Error)]
pub enum FormError {
    /// Field-level validation failures, reported per field.
    #[error("form validation failed")]
    Validation(#[from] ValidationErrors),
    /// A value passed surface validation but violates a domain constraint.
    #[error("{0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

/// Blank optional strings are treated as absent, the way the original
/// records stored them.
pub(crate) fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
