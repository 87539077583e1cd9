use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::payment::{NewPayment, PaymentChanges};
use crate::domain::types::{CartId, PaymentMethod, PaymentStatus, Price};
use crate::forms::FormError;

/// Body accepted when recording a payment attempt. Status always starts
/// pending; transitions go through the update endpoints.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PaymentForm {
    #[validate(range(min = 1))]
    pub cart_id: i32,
    pub payment_method: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentFormPayload {
    pub cart_id: CartId,
    pub payment_method: PaymentMethod,
    pub amount: Price,
}

impl PaymentFormPayload {
    pub fn into_new_payment(self) -> NewPayment {
        let now = Utc::now().naive_utc();
        NewPayment {
            cart_id: self.cart_id,
            payment_method: self.payment_method,
            amount: self.amount,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<PaymentForm> for PaymentFormPayload {
    type Error = FormError;

    fn try_from(value: PaymentForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            cart_id: CartId::new(value.cart_id)?,
            payment_method: PaymentMethod::try_from(value.payment_method)?,
            amount: Price::new(value.amount)?,
        })
    }
}

/// Body accepted by payment updates; absent fields stay untouched.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PaymentPatchForm {
    pub payment_method: Option<String>,
    #[validate(range(min = 0.0))]
    pub amount: Option<f64>,
    pub status: Option<String>,
}

impl TryFrom<PaymentPatchForm> for PaymentChanges {
    type Error = FormError;

    fn try_from(value: PaymentPatchForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            payment_method: value
                .payment_method
                .map(PaymentMethod::try_from)
                .transpose()?,
            amount: value.amount.map(Price::new).transpose()?,
            status: value.status.map(PaymentStatus::try_from).transpose()?,
        })
    }
}
