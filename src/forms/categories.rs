use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::category::{CategoryChanges, NewCategory};
use crate::domain::types::{CategoryName, ImagePath, NonEmptyString};
use crate::forms::{FormError, none_if_blank};

/// Body accepted by category create and full-update endpoints.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFormPayload {
    pub name: CategoryName,
    pub description: Option<NonEmptyString>,
    pub image: Option<ImagePath>,
}

impl CategoryFormPayload {
    pub fn into_new_category(self) -> NewCategory {
        let now = Utc::now().naive_utc();
        NewCategory {
            name: self.name,
            description: self.description,
            image: self.image,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_changes(self) -> CategoryChanges {
        CategoryChanges {
            name: Some(self.name),
            description: self.description,
            image: self.image,
        }
    }
}

impl TryFrom<CategoryForm> for CategoryFormPayload {
    type Error = FormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: CategoryName::new(value.name)?,
            description: none_if_blank(value.description)
                .map(|d| NonEmptyString::new_for_field(d, "description"))
                .transpose()?,
            image: none_if_blank(value.image).map(ImagePath::new).transpose()?,
        })
    }
}

/// Body accepted by category partial updates; absent fields stay untouched.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryPatchForm {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl TryFrom<CategoryPatchForm> for CategoryChanges {
    type Error = FormError;

    fn try_from(value: CategoryPatchForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: value.name.map(CategoryName::new).transpose()?,
            description: none_if_blank(value.description)
                .map(|d| NonEmptyString::new_for_field(d, "description"))
                .transpose()?,
            image: none_if_blank(value.image).map(ImagePath::new).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_converts_fields() {
        let form = CategoryForm {
            name: " Books ".to_string(),
            description: Some("Printed matter".to_string()),
            image: None,
        };

        let payload: CategoryFormPayload = form.try_into().unwrap();
        assert_eq!(payload.name.as_str(), "Books");
        assert_eq!(payload.description.unwrap().as_str(), "Printed matter");
    }

    #[test]
    fn blank_description_is_dropped() {
        let form = CategoryForm {
            name: "Books".to_string(),
            description: Some("   ".to_string()),
            image: None,
        };

        let payload: CategoryFormPayload = form.try_into().unwrap();
        assert!(payload.description.is_none());
    }

    #[test]
    fn rejects_empty_names() {
        let form = CategoryForm {
            name: String::new(),
            description: None,
            image: None,
        };

        let payload: Result<CategoryFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(FormError::Validation(_))));
    }
}
