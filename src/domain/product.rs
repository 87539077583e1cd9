use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryId, ImagePath, Price, ProductDescription, ProductId, ProductName, StockCount,
};

/// A product offered for sale under exactly one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: Price,
    pub stock: StockCount,
    pub image: Option<ImagePath>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
}

/// Data required to insert a new [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: Price,
    pub stock: StockCount,
    pub image: Option<ImagePath>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Field-wise update of a [`Product`]; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub category_id: Option<CategoryId>,
    pub name: Option<ProductName>,
    pub description: Option<ProductDescription>,
    pub price: Option<Price>,
    pub stock: Option<StockCount>,
    pub image: Option<ImagePath>,
}
