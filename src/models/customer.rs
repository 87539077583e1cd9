use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::customer::{
    Customer as DomainCustomer, CustomerChanges as DomainCustomerChanges,
    NewCustomer as DomainNewCustomer,
};
use crate::domain::types::{Cpf, PhoneNumber, TypeConstraintError};

/// Diesel model representing the `customers` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::customers)]
pub struct Customer {
    pub id: i32,
    pub user_id: i32,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
}

/// Insertable form of [`Customer`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::customers)]
pub struct NewCustomer {
    pub user_id: i32,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Patchable form of [`Customer`]; `None` fields are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::customers)]
pub struct CustomerChanges {
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl TryFrom<Customer> for DomainCustomer {
    type Error = TypeConstraintError;

    fn try_from(customer: Customer) -> Result<Self, Self::Error> {
        Ok(Self {
            id: customer.id.try_into()?,
            user_id: customer.user_id.try_into()?,
            cpf: customer.cpf.map(Cpf::new).transpose()?,
            phone: customer.phone.map(PhoneNumber::new).transpose()?,
            birth_date: customer.birth_date,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
            is_deleted: customer.is_deleted,
        })
    }
}

impl From<DomainNewCustomer> for NewCustomer {
    fn from(customer: DomainNewCustomer) -> Self {
        Self {
            user_id: customer.user_id.get(),
            cpf: customer.cpf.map(Cpf::into_inner),
            phone: customer.phone.map(PhoneNumber::into_inner),
            birth_date: customer.birth_date,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

impl From<DomainCustomerChanges> for CustomerChanges {
    fn from(changes: DomainCustomerChanges) -> Self {
        Self {
            cpf: changes.cpf.map(Cpf::into_inner),
            phone: changes.phone.map(PhoneNumber::into_inner),
            birth_date: changes.birth_date,
        }
    }
}
