use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CartId, PaymentId, PaymentMethod, PaymentStatus, Price};

/// Payment attempt against a cart. A cart may accumulate several records
/// (retries, refunds); none of them trigger gateway calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub cart_id: CartId,
    pub payment_method: PaymentMethod,
    pub amount: Price,
    pub status: PaymentStatus,
    pub paid_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
}

/// Data required to insert a new [`Payment`]; records always start pending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPayment {
    pub cart_id: CartId,
    pub payment_method: PaymentMethod,
    pub amount: Price,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Field-wise update of a [`Payment`]; `None` leaves the column untouched.
///
/// `paid_at` is not settable from outside: it is stamped by the service layer
/// when `status` first enters a settled state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentChanges {
    pub payment_method: Option<PaymentMethod>,
    pub amount: Option<Price>,
    pub status: Option<PaymentStatus>,
}
