pub use errors::{ServiceError, ServiceResult};

use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::AuthenticatedUser;
use crate::repository::DeletedFilter;
use crate::repository::errors::RepositoryError;

pub mod auth;
pub mod carts;
pub mod categories;
pub mod customers;
pub mod errors;
pub mod payments;
pub mod products;

/// Query options accepted by every list endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// One-based page number.
    pub page: Option<usize>,
    /// Staff-only audit path showing soft-deleted rows as well.
    pub include_deleted: Option<bool>,
}

/// Resolves the read scope for a caller. The unfiltered path is reserved for
/// staff accounts.
pub(crate) fn deleted_filter_for(
    params: &ListParams,
    user: &AuthenticatedUser,
) -> ServiceResult<DeletedFilter> {
    if params.include_deleted.unwrap_or(false) {
        if !user.is_staff {
            return Err(ServiceError::Forbidden);
        }
        Ok(DeletedFilter::IncludeDeleted)
    } else {
        Ok(DeletedFilter::ActiveOnly)
    }
}

/// Fallback mapping from repository failures to service errors. Conflicts
/// with a known offending field are matched explicitly at the call sites
/// before reaching this.
pub(crate) fn map_repo_err(context: &str, err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::NotFound,
        other => {
            log::error!("{context}: {other}");
            ServiceError::Internal
        }
    }
}
