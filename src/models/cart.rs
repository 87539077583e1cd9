use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::cart::{
    Cart as DomainCart, CartItem as DomainCartItem, NewCart as DomainNewCart,
    NewCartItem as DomainNewCartItem,
};
use crate::domain::types::{Quantity, TypeConstraintError};

/// Diesel model representing the `carts` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::carts)]
pub struct Cart {
    pub id: i32,
    pub customer_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
}

/// Insertable form of [`Cart`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::carts)]
pub struct NewCart {
    pub customer_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Diesel model representing the `cart_items` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct CartItem {
    pub id: i32,
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
}

/// Insertable form of [`CartItem`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct NewCartItem {
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Cart> for DomainCart {
    type Error = TypeConstraintError;

    fn try_from(cart: Cart) -> Result<Self, Self::Error> {
        Ok(Self {
            id: cart.id.try_into()?,
            customer_id: cart.customer_id.try_into()?,
            created_at: cart.created_at,
            updated_at: cart.updated_at,
            is_deleted: cart.is_deleted,
        })
    }
}

impl From<DomainNewCart> for NewCart {
    fn from(cart: DomainNewCart) -> Self {
        Self {
            customer_id: cart.customer_id.get(),
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        }
    }
}

impl TryFrom<CartItem> for DomainCartItem {
    type Error = TypeConstraintError;

    fn try_from(item: CartItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: item.id.try_into()?,
            cart_id: item.cart_id.try_into()?,
            product_id: item.product_id.try_into()?,
            quantity: Quantity::new(item.quantity)?,
            created_at: item.created_at,
            updated_at: item.updated_at,
            is_deleted: item.is_deleted,
        })
    }
}

impl From<DomainNewCartItem> for NewCartItem {
    fn from(item: DomainNewCartItem) -> Self {
        Self {
            cart_id: item.cart_id.get(),
            product_id: item.product_id.get(),
            quantity: item.quantity.get(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}
