use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{
    Category as DomainCategory, CategoryChanges as DomainCategoryChanges,
    NewCategory as DomainNewCategory,
};
use crate::domain::types::{CategoryName, ImagePath, NonEmptyString, TypeConstraintError};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Patchable form of [`Category`]; `None` fields are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::categories)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: category.id.try_into()?,
            name: CategoryName::new(category.name)?,
            description: category
                .description
                .map(|d| NonEmptyString::new_for_field(d, "description"))
                .transpose()?,
            image: category.image.map(ImagePath::new).transpose()?,
            created_at: category.created_at,
            updated_at: category.updated_at,
            is_deleted: category.is_deleted,
        })
    }
}

impl From<DomainNewCategory> for NewCategory {
    fn from(category: DomainNewCategory) -> Self {
        Self {
            name: category.name.into_inner(),
            description: category.description.map(NonEmptyString::into_inner),
            image: category.image.map(ImagePath::into_inner),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<DomainCategoryChanges> for CategoryChanges {
    fn from(changes: DomainCategoryChanges) -> Self {
        Self {
            name: changes.name.map(CategoryName::into_inner),
            description: changes.description.map(NonEmptyString::into_inner),
            image: changes.image.map(ImagePath::into_inner),
        }
    }
}
