use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::cart::{NewCart, NewCartItem};
use crate::domain::types::{CartId, CustomerId, ProductId, Quantity};
use crate::forms::FormError;

/// Body accepted when creating a cart.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CartForm {
    #[validate(range(min = 1))]
    pub customer_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartFormPayload {
    pub customer_id: CustomerId,
}

impl CartFormPayload {
    pub fn into_new_cart(self) -> NewCart {
        let now = Utc::now().naive_utc();
        NewCart {
            customer_id: self.customer_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<CartForm> for CartFormPayload {
    type Error = FormError;

    fn try_from(value: CartForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            customer_id: CustomerId::new(value.customer_id)?,
        })
    }
}

/// Body accepted when adding a product to a cart; quantity defaults to one.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CartItemForm {
    #[validate(range(min = 1))]
    pub cart_id: i32,
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartItemFormPayload {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: Quantity,
}

impl CartItemFormPayload {
    pub fn into_new_cart_item(self) -> NewCartItem {
        let now = Utc::now().naive_utc();
        NewCartItem {
            cart_id: self.cart_id,
            product_id: self.product_id,
            quantity: self.quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<CartItemForm> for CartItemFormPayload {
    type Error = FormError;

    fn try_from(value: CartItemForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            cart_id: CartId::new(value.cart_id)?,
            product_id: ProductId::new(value.product_id)?,
            quantity: Quantity::new(value.quantity.unwrap_or(1))?,
        })
    }
}

/// Body accepted when replacing a line item's quantity.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CartItemQuantityForm {
    #[validate(range(min = 1))]
    pub quantity: i32,
}

impl TryFrom<CartItemQuantityForm> for Quantity {
    type Error = FormError;

    fn try_from(value: CartItemQuantityForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Quantity::new(value.quantity)?)
    }
}
