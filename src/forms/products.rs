use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::product::{NewProduct, ProductChanges};
use crate::domain::types::{
    CategoryId, ImagePath, Price, ProductDescription, ProductName, StockCount,
};
use crate::forms::{FormError, none_if_blank};

/// Body accepted by product create and full-update endpoints.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub image: Option<String>,
    #[validate(range(min = 1))]
    pub category_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductFormPayload {
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: Price,
    pub stock: StockCount,
    pub image: Option<ImagePath>,
    pub category_id: CategoryId,
}

impl ProductFormPayload {
    pub fn into_new_product(self) -> NewProduct {
        let now = Utc::now().naive_utc();
        NewProduct {
            category_id: self.category_id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            image: self.image,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_changes(self) -> ProductChanges {
        ProductChanges {
            category_id: Some(self.category_id),
            name: Some(self.name),
            description: Some(self.description),
            price: Some(self.price),
            stock: Some(self.stock),
            image: self.image,
        }
    }
}

impl TryFrom<ProductForm> for ProductFormPayload {
    type Error = FormError;

    fn try_from(value: ProductForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: ProductName::new(value.name)?,
            description: ProductDescription::new(value.description)?,
            price: Price::new(value.price)?,
            stock: StockCount::new(value.stock.unwrap_or(0))?,
            image: none_if_blank(value.image).map(ImagePath::new).transpose()?,
            category_id: CategoryId::new(value.category_id)?,
        })
    }
}

/// Body accepted by product partial updates; absent fields stay untouched.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductPatchForm {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub image: Option<String>,
    #[validate(range(min = 1))]
    pub category_id: Option<i32>,
}

impl TryFrom<ProductPatchForm> for ProductChanges {
    type Error = FormError;

    fn try_from(value: ProductPatchForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            category_id: value.category_id.map(CategoryId::new).transpose()?,
            name: value.name.map(ProductName::new).transpose()?,
            description: value
                .description
                .map(ProductDescription::new)
                .transpose()?,
            price: value.price.map(Price::new).transpose()?,
            stock: value.stock.map(StockCount::new).transpose()?,
            image: none_if_blank(value.image).map(ImagePath::new).transpose()?,
        })
    }
}
