use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::types::{PaymentMethod, PaymentStatus};
use crate::dto::carts::CartDto;
use crate::services::payments::ExpandedPayment;

/// Payment record with its cart expanded read-only. Writes accept the cart
/// as a reference id only.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentDto {
    pub id: i32,
    #[schema(value_type = String, example = "pix")]
    pub payment_method: PaymentMethod,
    pub amount: f64,
    #[schema(value_type = String, example = "pending")]
    pub status: PaymentStatus,
    pub paid_at: Option<NaiveDateTime>,
    pub cart: CartDto,
}

impl From<ExpandedPayment> for PaymentDto {
    fn from((payment, cart): ExpandedPayment) -> Self {
        Self {
            id: payment.id.get(),
            payment_method: payment.payment_method,
            amount: payment.amount.get(),
            status: payment.status,
            paid_at: payment.paid_at,
            cart: CartDto::from(cart),
        }
    }
}
