use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::product::Product;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
    pub image: Option<String>,
    pub category_id: i32,
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
            description: value.description.into_inner(),
            price: value.price.get(),
            stock: value.stock.get(),
            image: value.image.map(|i| i.into_inner()),
            category_id: value.category_id.get(),
        }
    }
}
