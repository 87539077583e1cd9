use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::category::Category;
use crate::dto::products::ProductDto;
use crate::services::categories::CategoryWithProducts;

/// Category with its products expanded read-only.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub products: Vec<ProductDto>,
}

impl From<CategoryWithProducts> for CategoryDto {
    fn from((category, products): CategoryWithProducts) -> Self {
        Self {
            id: category.id.get(),
            name: category.name.into_inner(),
            description: category.description.map(|d| d.into_inner()),
            image: category.image.map(|i| i.into_inner()),
            products: products.into_iter().map(ProductDto::from).collect(),
        }
    }
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self::from((category, Vec::new()))
    }
}
