use crate::auth::AuthenticatedUser;
use crate::domain::category::{Category, CategoryChanges};
use crate::domain::product::Product;
use crate::domain::types::CategoryId;
use crate::forms::categories::CategoryFormPayload;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Pagination};
use crate::repository::{
    CategoryListQuery, CategoryReader, CategoryWriter, DeletedFilter, ProductListQuery,
    ProductReader,
};
use crate::services::{ListParams, deleted_filter_for, map_repo_err};

use super::{ServiceError, ServiceResult};

/// A category together with its fully expanded products, the shape the wire
/// representation nests.
pub type CategoryWithProducts = (Category, Vec<Product>);

/// Lists categories, each expanded with its products.
///
/// All repository interactions are handled here so that the HTTP route can
/// remain a thin wrapper.
pub fn list_categories<R>(
    params: ListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<CategoryWithProducts>>
where
    R: CategoryReader + ProductReader,
{
    let filter = deleted_filter_for(&params, user)?;

    let query = CategoryListQuery {
        filter,
        pagination: Some(Pagination::new(
            params.page.unwrap_or(1),
            DEFAULT_ITEMS_PER_PAGE,
        )),
    };
    let (_total, categories) = repo
        .list_categories(query)
        .map_err(|e| map_repo_err("Failed to list categories", e))?;

    let (_total, products) = repo
        .list_products(ProductListQuery {
            category_id: None,
            filter,
            pagination: None,
        })
        .map_err(|e| map_repo_err("Failed to list products", e))?;

    Ok(categories
        .into_iter()
        .map(|category| {
            let owned = products
                .iter()
                .filter(|p| p.category_id == category.id)
                .cloned()
                .collect();
            (category, owned)
        })
        .collect())
}

/// Retrieves one category with its products.
pub fn get_category<R>(
    category_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CategoryWithProducts>
where
    R: CategoryReader + ProductReader,
{
    let filter = deleted_filter_for(&ListParams::default(), user)?;

    let category_id = CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)?;
    let category = repo
        .get_category_by_id(category_id, filter)
        .map_err(|e| map_repo_err("Failed to get category", e))?
        .ok_or(ServiceError::NotFound)?;

    let (_total, products) = repo
        .list_products(ProductListQuery {
            category_id: Some(category.id),
            filter,
            pagination: None,
        })
        .map_err(|e| map_repo_err("Failed to list products", e))?;

    Ok((category, products))
}

/// Persists a new category.
pub fn create_category<R>(
    payload: CategoryFormPayload,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryWriter,
{
    repo.create_category(&payload.into_new_category())
        .map_err(|e| map_repo_err("Failed to create category", e))
}

/// Applies field changes to an existing, non-deleted category.
pub fn update_category<R>(
    category_id: i32,
    changes: CategoryChanges,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    let category_id = CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)?;
    let existing = repo
        .get_category_by_id(category_id, DeletedFilter::ActiveOnly)
        .map_err(|e| map_repo_err("Failed to get category", e))?
        .ok_or(ServiceError::NotFound)?;

    repo.update_category(existing.id, changes)
        .map_err(|e| map_repo_err("Failed to update category", e))
}

/// Soft-deletes a category, cascading the flag over its products and their
/// cart items.
pub fn delete_category<R>(
    category_id: i32,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter,
{
    let category_id = CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)?;
    let affected = repo
        .soft_delete_category(category_id)
        .map_err(|e| map_repo_err("Failed to delete category", e))?;
    if affected == 0 {
        return Err(ServiceError::NotFound);
    }
    Ok(())
}
