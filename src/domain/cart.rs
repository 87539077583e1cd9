use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CartId, CartItemId, CustomerId, ProductId, Quantity};

/// Shopping cart attached one-to-one to a customer profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub customer_id: CustomerId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
}

/// Data required to insert a new [`Cart`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCart {
    pub customer_id: CustomerId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One line of a cart. The `(cart_id, product_id)` pair is unique: adding a
/// product already present accumulates quantity on the existing line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
}

/// Data required to add a product to a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCartItem {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
