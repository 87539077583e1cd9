use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::payment::{
    NewPayment as DomainNewPayment, Payment as DomainPayment,
    PaymentChanges as DomainPaymentChanges,
};
use crate::domain::types::{PaymentMethod, PaymentStatus, Price, TypeConstraintError};

/// Diesel model representing the `payments` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::payments)]
pub struct Payment {
    pub id: i32,
    pub cart_id: i32,
    pub payment_method: String,
    pub amount: f64,
    pub status: String,
    pub paid_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
}

/// Insertable form of [`Payment`]; status defaults to `pending` in the schema.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::payments)]
pub struct NewPayment {
    pub cart_id: i32,
    pub payment_method: String,
    pub amount: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Patchable form of [`Payment`]; `None` fields are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::payments)]
pub struct PaymentChanges {
    pub payment_method: Option<String>,
    pub amount: Option<f64>,
    pub status: Option<String>,
    pub paid_at: Option<NaiveDateTime>,
}

impl TryFrom<Payment> for DomainPayment {
    type Error = TypeConstraintError;

    fn try_from(payment: Payment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: payment.id.try_into()?,
            cart_id: payment.cart_id.try_into()?,
            payment_method: PaymentMethod::try_from(payment.payment_method)?,
            amount: Price::new(payment.amount)?,
            status: PaymentStatus::try_from(payment.status)?,
            paid_at: payment.paid_at,
            created_at: payment.created_at,
            updated_at: payment.updated_at,
            is_deleted: payment.is_deleted,
        })
    }
}

impl From<DomainNewPayment> for NewPayment {
    fn from(payment: DomainNewPayment) -> Self {
        Self {
            cart_id: payment.cart_id.get(),
            payment_method: payment.payment_method.as_str().to_string(),
            amount: payment.amount.get(),
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        }
    }
}

impl From<DomainPaymentChanges> for PaymentChanges {
    fn from(changes: DomainPaymentChanges) -> Self {
        Self {
            payment_method: changes.payment_method.map(|m| m.as_str().to_string()),
            amount: changes.amount.map(Price::get),
            status: changes.status.map(|s| s.as_str().to_string()),
            paid_at: None,
        }
    }
}
