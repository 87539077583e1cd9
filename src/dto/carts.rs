use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::cart::Cart;
use crate::dto::products::ProductDto;
use crate::services::carts::{CartWithItems, ExpandedCartItem};

/// Cart line item with its product expanded read-only.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartItemDto {
    pub id: i32,
    pub product: ProductDto,
    pub quantity: i32,
}

impl From<ExpandedCartItem> for CartItemDto {
    fn from((item, product): ExpandedCartItem) -> Self {
        Self {
            id: item.id.get(),
            product: ProductDto::from(product),
            quantity: item.quantity.get(),
        }
    }
}

/// Cart with its line items expanded read-only.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartDto {
    pub id: i32,
    pub customer_id: i32,
    pub items: Vec<CartItemDto>,
}

impl From<CartWithItems> for CartDto {
    fn from((cart, items): CartWithItems) -> Self {
        Self {
            id: cart.id.get(),
            customer_id: cart.customer_id.get(),
            items: items.into_iter().map(CartItemDto::from).collect(),
        }
    }
}

impl From<Cart> for CartDto {
    fn from(cart: Cart) -> Self {
        Self::from((cart, Vec::new()))
    }
}
