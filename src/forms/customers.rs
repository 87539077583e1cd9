use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::customer::CustomerChanges;
use crate::domain::types::{Cpf, PhoneNumber};
use crate::forms::{FormError, none_if_blank};

/// Body accepted by customer create and update endpoints. All profile
/// fields are optional; the identity link comes from the bearer token.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CustomerForm {
    #[validate(length(max = 14))]
    pub cpf: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerFormPayload {
    pub cpf: Option<Cpf>,
    pub phone: Option<PhoneNumber>,
    pub birth_date: Option<NaiveDate>,
}

impl CustomerFormPayload {
    pub fn into_changes(self) -> CustomerChanges {
        CustomerChanges {
            cpf: self.cpf,
            phone: self.phone,
            birth_date: self.birth_date,
        }
    }
}

impl TryFrom<CustomerForm> for CustomerFormPayload {
    type Error = FormError;

    fn try_from(value: CustomerForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            cpf: none_if_blank(value.cpf).map(Cpf::new).transpose()?,
            phone: none_if_blank(value.phone)
                .map(PhoneNumber::new)
                .transpose()?,
            birth_date: value.birth_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_cpf_punctuation() {
        let form = CustomerForm {
            cpf: Some("123.456.789-09".to_string()),
            phone: None,
            birth_date: None,
        };

        let payload: CustomerFormPayload = form.try_into().unwrap();
        assert_eq!(payload.cpf.unwrap().as_str(), "12345678909");
    }

    #[test]
    fn rejects_malformed_cpf() {
        let form = CustomerForm {
            cpf: Some("123".to_string()),
            phone: None,
            birth_date: None,
        };

        let payload: Result<CustomerFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(FormError::TypeConstraint(_))));
    }
}
