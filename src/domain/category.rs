use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName, ImagePath, NonEmptyString};

/// Canonical product category record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub description: Option<NonEmptyString>,
    pub image: Option<ImagePath>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub description: Option<NonEmptyString>,
    pub image: Option<ImagePath>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Field-wise update of a [`Category`]; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryChanges {
    pub name: Option<CategoryName>,
    pub description: Option<NonEmptyString>,
    pub image: Option<ImagePath>,
}
