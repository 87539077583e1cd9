use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Cpf, CustomerId, PhoneNumber, UserId};

/// Customer profile attached one-to-one to a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub user_id: UserId,
    pub cpf: Option<Cpf>,
    pub phone: Option<PhoneNumber>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
}

/// Data required to insert a new [`Customer`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCustomer {
    pub user_id: UserId,
    pub cpf: Option<Cpf>,
    pub phone: Option<PhoneNumber>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Field-wise update of a [`Customer`]; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerChanges {
    pub cpf: Option<Cpf>,
    pub phone: Option<PhoneNumber>,
    pub birth_date: Option<NaiveDate>,
}
