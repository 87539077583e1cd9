use crate::auth::AuthenticatedUser;
use crate::domain::product::{Product, ProductChanges};
use crate::domain::types::{CategoryId, ProductId};
use crate::forms::products::ProductFormPayload;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Pagination};
use crate::repository::{
    CategoryReader, DeletedFilter, ProductListQuery, ProductReader, ProductWriter,
};
use crate::services::{ListParams, deleted_filter_for, map_repo_err};

use super::{ServiceError, ServiceResult};

/// Lists products, optionally restricted to one category.
pub fn list_products<R>(
    params: ListParams,
    category_id: Option<i32>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    let filter = deleted_filter_for(&params, user)?;

    let category_id = match category_id {
        Some(raw) => Some(CategoryId::new(raw).map_err(|_| ServiceError::NotFound)?),
        None => None,
    };

    let query = ProductListQuery {
        category_id,
        filter,
        pagination: Some(Pagination::new(
            params.page.unwrap_or(1),
            DEFAULT_ITEMS_PER_PAGE,
        )),
    };
    let (_total, products) = repo
        .list_products(query)
        .map_err(|e| map_repo_err("Failed to list products", e))?;
    Ok(products)
}

/// Retrieves one product.
pub fn get_product<R>(
    product_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Product>
where
    R: ProductReader,
{
    let filter = deleted_filter_for(&ListParams::default(), user)?;

    let product_id = ProductId::new(product_id).map_err(|_| ServiceError::NotFound)?;
    repo.get_product_by_id(product_id, filter)
        .map_err(|e| map_repo_err("Failed to get product", e))?
        .ok_or(ServiceError::NotFound)
}

/// Persists a new product after resolving its category reference.
pub fn create_product<R>(
    payload: ProductFormPayload,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Product>
where
    R: CategoryReader + ProductWriter,
{
    resolve_category(payload.category_id, repo)?;
    repo.create_product(&payload.into_new_product())
        .map_err(|e| map_repo_err("Failed to create product", e))
}

/// Applies field changes to an existing, non-deleted product. A category
/// change must resolve to an active category.
pub fn update_product<R>(
    product_id: i32,
    changes: ProductChanges,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Product>
where
    R: CategoryReader + ProductReader + ProductWriter,
{
    let product_id = ProductId::new(product_id).map_err(|_| ServiceError::NotFound)?;
    let existing = repo
        .get_product_by_id(product_id, DeletedFilter::ActiveOnly)
        .map_err(|e| map_repo_err("Failed to get product", e))?
        .ok_or(ServiceError::NotFound)?;

    if let Some(category_id) = changes.category_id {
        resolve_category(category_id, repo)?;
    }

    repo.update_product(existing.id, changes)
        .map_err(|e| map_repo_err("Failed to update product", e))
}

/// Soft-deletes a product, cascading the flag over its cart items.
pub fn delete_product<R>(product_id: i32, _user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: ProductWriter,
{
    let product_id = ProductId::new(product_id).map_err(|_| ServiceError::NotFound)?;
    let affected = repo
        .soft_delete_product(product_id)
        .map_err(|e| map_repo_err("Failed to delete product", e))?;
    if affected == 0 {
        return Err(ServiceError::NotFound);
    }
    Ok(())
}

fn resolve_category<R: CategoryReader>(category_id: CategoryId, repo: &R) -> ServiceResult<()> {
    repo.get_category_by_id(category_id, DeletedFilter::ActiveOnly)
        .map_err(|e| map_repo_err("Failed to resolve category", e))?
        .ok_or(ServiceError::Reference {
            field: "category_id",
        })?;
    Ok(())
}
