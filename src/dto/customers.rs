use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::customer::Customer;

/// Customer profile projection. Identity fields (user id, login) are
/// deliberately excluded from this representation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerDto {
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl From<Customer> for CustomerDto {
    fn from(value: Customer) -> Self {
        Self {
            cpf: value.cpf.map(|c| c.into_inner()),
            phone: value.phone.map(|p| p.into_inner()),
            birth_date: value.birth_date,
        }
    }
}
