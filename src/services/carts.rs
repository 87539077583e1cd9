use crate::auth::AuthenticatedUser;
use crate::domain::cart::{Cart, CartItem};
use crate::domain::product::Product;
use crate::domain::types::{CartId, CartItemId, Quantity};
use crate::forms::carts::{CartFormPayload, CartItemFormPayload};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Pagination};
use crate::repository::errors::RepositoryError;
use crate::repository::{
    CartItemListQuery, CartListQuery, CartReader, CartWriter, CustomerReader, DeletedFilter,
    ProductReader,
};
use crate::services::{ListParams, deleted_filter_for, map_repo_err};

use super::{ServiceError, ServiceResult};

/// A line item expanded with its product, the shape the wire representation
/// nests.
pub type ExpandedCartItem = (CartItem, Product);
/// A cart with its expanded line items.
pub type CartWithItems = (Cart, Vec<ExpandedCartItem>);

pub(crate) fn expand_items<R>(items: Vec<CartItem>, repo: &R) -> ServiceResult<Vec<ExpandedCartItem>>
where
    R: ProductReader,
{
    // The cascade keeps item and product flags in sync, so the deleted-state
    // mismatch case cannot normally occur; look the product up unfiltered to
    // stay total.
    items
        .into_iter()
        .map(|item| {
            let product = repo
                .get_product_by_id(item.product_id, DeletedFilter::IncludeDeleted)
                .map_err(|e| map_repo_err("Failed to load cart item product", e))?
                .ok_or_else(|| {
                    log::error!("Cart item {} references missing product", item.id);
                    ServiceError::Internal
                })?;
            Ok((item, product))
        })
        .collect()
}

/// Attaches a cart's expanded line items, honoring the caller's read scope.
pub(crate) fn load_cart_with_items<R>(
    cart: Cart,
    filter: DeletedFilter,
    repo: &R,
) -> ServiceResult<CartWithItems>
where
    R: CartReader + ProductReader,
{
    let (_total, items) = repo
        .list_cart_items(CartItemListQuery {
            cart_id: Some(cart.id),
            filter,
            pagination: None,
        })
        .map_err(|e| map_repo_err("Failed to list cart items", e))?;
    let items = expand_items(items, repo)?;
    Ok((cart, items))
}

/// Lists carts with their expanded line items.
pub fn list_carts<R>(
    params: ListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<CartWithItems>>
where
    R: CartReader + ProductReader,
{
    let filter = deleted_filter_for(&params, user)?;

    let query = CartListQuery {
        customer_id: None,
        filter,
        pagination: Some(Pagination::new(
            params.page.unwrap_or(1),
            DEFAULT_ITEMS_PER_PAGE,
        )),
    };
    let (_total, carts) = repo
        .list_carts(query)
        .map_err(|e| map_repo_err("Failed to list carts", e))?;

    carts
        .into_iter()
        .map(|cart| load_cart_with_items(cart, filter, repo))
        .collect()
}

/// Retrieves one cart with its expanded line items.
pub fn get_cart<R>(cart_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<CartWithItems>
where
    R: CartReader + ProductReader,
{
    let filter = deleted_filter_for(&ListParams::default(), user)?;

    let cart_id = CartId::new(cart_id).map_err(|_| ServiceError::NotFound)?;
    let cart = repo
        .get_cart_by_id(cart_id, filter)
        .map_err(|e| map_repo_err("Failed to get cart", e))?
        .ok_or(ServiceError::NotFound)?;

    load_cart_with_items(cart, filter, repo)
}

/// Creates a cart for a customer; each customer owns at most one.
pub fn create_cart<R>(
    payload: CartFormPayload,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Cart>
where
    R: CustomerReader + CartWriter,
{
    repo.get_customer_by_id(payload.customer_id, DeletedFilter::ActiveOnly)
        .map_err(|e| map_repo_err("Failed to resolve customer", e))?
        .ok_or(ServiceError::Reference {
            field: "customer_id",
        })?;

    match repo.create_cart(&payload.into_new_cart()) {
        Ok(cart) => Ok(cart),
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::Conflict {
            field: "customer_id",
            message: "this customer already has a cart",
        }),
        Err(e) => Err(map_repo_err("Failed to create cart", e)),
    }
}

/// Reassigns an existing, non-deleted cart to another customer.
pub fn update_cart<R>(
    cart_id: i32,
    payload: CartFormPayload,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Cart>
where
    R: CartReader + CustomerReader + CartWriter,
{
    let cart_id = CartId::new(cart_id).map_err(|_| ServiceError::NotFound)?;
    let existing = repo
        .get_cart_by_id(cart_id, DeletedFilter::ActiveOnly)
        .map_err(|e| map_repo_err("Failed to get cart", e))?
        .ok_or(ServiceError::NotFound)?;

    repo.get_customer_by_id(payload.customer_id, DeletedFilter::ActiveOnly)
        .map_err(|e| map_repo_err("Failed to resolve customer", e))?
        .ok_or(ServiceError::Reference {
            field: "customer_id",
        })?;

    match repo.update_cart(existing.id, payload.customer_id) {
        Ok(cart) => Ok(cart),
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::Conflict {
            field: "customer_id",
            message: "this customer already has a cart",
        }),
        Err(e) => Err(map_repo_err("Failed to update cart", e)),
    }
}

/// Soft-deletes a cart, cascading the flag over its line items.
pub fn delete_cart<R>(cart_id: i32, _user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: CartWriter,
{
    let cart_id = CartId::new(cart_id).map_err(|_| ServiceError::NotFound)?;
    let affected = repo
        .soft_delete_cart(cart_id)
        .map_err(|e| map_repo_err("Failed to delete cart", e))?;
    if affected == 0 {
        return Err(ServiceError::NotFound);
    }
    Ok(())
}

/// Lists cart line items, optionally restricted to one cart.
pub fn list_cart_items<R>(
    params: ListParams,
    cart_id: Option<i32>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<ExpandedCartItem>>
where
    R: CartReader + ProductReader,
{
    let filter = deleted_filter_for(&params, user)?;

    let cart_id = match cart_id {
        Some(raw) => Some(CartId::new(raw).map_err(|_| ServiceError::NotFound)?),
        None => None,
    };

    let query = CartItemListQuery {
        cart_id,
        filter,
        pagination: Some(Pagination::new(
            params.page.unwrap_or(1),
            DEFAULT_ITEMS_PER_PAGE,
        )),
    };
    let (_total, items) = repo
        .list_cart_items(query)
        .map_err(|e| map_repo_err("Failed to list cart items", e))?;
    expand_items(items, repo)
}

/// Retrieves one line item with its product.
pub fn get_cart_item<R>(
    item_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ExpandedCartItem>
where
    R: CartReader + ProductReader,
{
    let filter = deleted_filter_for(&ListParams::default(), user)?;

    let item_id = CartItemId::new(item_id).map_err(|_| ServiceError::NotFound)?;
    let item = repo
        .get_cart_item_by_id(item_id, filter)
        .map_err(|e| map_repo_err("Failed to get cart item", e))?
        .ok_or(ServiceError::NotFound)?;

    let mut expanded = expand_items(vec![item], repo)?;
    Ok(expanded.remove(0))
}

/// Adds a product to a cart. Adding a product already in the cart
/// accumulates quantity on the existing line instead of duplicating it.
pub fn add_cart_item<R>(
    payload: CartItemFormPayload,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ExpandedCartItem>
where
    R: CartReader + ProductReader + CartWriter,
{
    repo.get_cart_by_id(payload.cart_id, DeletedFilter::ActiveOnly)
        .map_err(|e| map_repo_err("Failed to resolve cart", e))?
        .ok_or(ServiceError::Reference { field: "cart_id" })?;
    let product = repo
        .get_product_by_id(payload.product_id, DeletedFilter::ActiveOnly)
        .map_err(|e| map_repo_err("Failed to resolve product", e))?
        .ok_or(ServiceError::Reference {
            field: "product_id",
        })?;

    let item = repo
        .upsert_cart_item(&payload.into_new_cart_item())
        .map_err(|e| map_repo_err("Failed to add cart item", e))?;
    Ok((item, product))
}

/// Replaces a line item's quantity.
pub fn set_cart_item_quantity<R>(
    item_id: i32,
    quantity: Quantity,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ExpandedCartItem>
where
    R: CartReader + ProductReader + CartWriter,
{
    let (item, product) = get_cart_item(item_id, user, repo)?;
    let updated = repo
        .set_cart_item_quantity(item.id, quantity)
        .map_err(|e| map_repo_err("Failed to update cart item", e))?;
    Ok((updated, product))
}

/// Soft-deletes a line item.
pub fn delete_cart_item<R>(item_id: i32, _user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: CartWriter,
{
    let item_id = CartItemId::new(item_id).map_err(|_| ServiceError::NotFound)?;
    let affected = repo
        .soft_delete_cart_item(item_id)
        .map_err(|e| map_repo_err("Failed to delete cart item", e))?;
    if affected == 0 {
        return Err(ServiceError::NotFound);
    }
    Ok(())
}
