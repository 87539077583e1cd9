use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct,
    ProductChanges as DomainProductChanges,
};
use crate::domain::types::{
    ImagePath, Price, ProductDescription, ProductName, StockCount, TypeConstraintError,
};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
}

/// Insertable form of [`Product`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub category_id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Patchable form of [`Product`]; `None` fields are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct ProductChanges {
    pub category_id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub image: Option<String>,
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            category_id: product.category_id.try_into()?,
            name: ProductName::new(product.name)?,
            description: ProductDescription::new(product.description)?,
            price: Price::new(product.price)?,
            stock: StockCount::new(product.stock)?,
            image: product.image.map(ImagePath::new).transpose()?,
            created_at: product.created_at,
            updated_at: product.updated_at,
            is_deleted: product.is_deleted,
        })
    }
}

impl From<DomainNewProduct> for NewProduct {
    fn from(product: DomainNewProduct) -> Self {
        Self {
            category_id: product.category_id.get(),
            name: product.name.into_inner(),
            description: product.description.into_inner(),
            price: product.price.get(),
            stock: product.stock.get(),
            image: product.image.map(ImagePath::into_inner),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<DomainProductChanges> for ProductChanges {
    fn from(changes: DomainProductChanges) -> Self {
        Self {
            category_id: changes.category_id.map(|id| id.get()),
            name: changes.name.map(ProductName::into_inner),
            description: changes.description.map(ProductDescription::into_inner),
            price: changes.price.map(Price::get),
            stock: changes.stock.map(StockCount::get),
            image: changes.image.map(ImagePath::into_inner),
        }
    }
}
