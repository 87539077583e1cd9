use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::domain::payment::{Payment, PaymentChanges};
use crate::domain::types::{CartId, PaymentId};
use crate::forms::payments::PaymentFormPayload;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Pagination};
use crate::repository::{
    CartReader, DeletedFilter, PaymentListQuery, PaymentReader, PaymentWriter, ProductReader,
};
use crate::services::carts::{CartWithItems, load_cart_with_items};
use crate::services::{ListParams, deleted_filter_for, map_repo_err};

use super::{ServiceError, ServiceResult};

/// A payment expanded with its cart, the shape the wire representation
/// nests on reads.
pub type ExpandedPayment = (Payment, CartWithItems);

fn expand_payment<R>(
    payment: Payment,
    filter: DeletedFilter,
    repo: &R,
) -> ServiceResult<ExpandedPayment>
where
    R: CartReader + ProductReader,
{
    // The cart is rendered read-only even if it has since been soft-deleted;
    // a payment record must stay renderable for auditing.
    let cart = repo
        .get_cart_by_id(payment.cart_id, DeletedFilter::IncludeDeleted)
        .map_err(|e| map_repo_err("Failed to load payment cart", e))?
        .ok_or_else(|| {
            log::error!("Payment {} references missing cart", payment.id);
            ServiceError::Internal
        })?;
    let cart = load_cart_with_items(cart, filter, repo)?;
    Ok((payment, cart))
}

/// Lists payments, optionally restricted to one cart, each expanded with
/// its cart.
pub fn list_payments<R>(
    params: ListParams,
    cart_id: Option<i32>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<ExpandedPayment>>
where
    R: PaymentReader + CartReader + ProductReader,
{
    let filter = deleted_filter_for(&params, user)?;

    let cart_id = match cart_id {
        Some(raw) => Some(CartId::new(raw).map_err(|_| ServiceError::NotFound)?),
        None => None,
    };

    let query = PaymentListQuery {
        cart_id,
        filter,
        pagination: Some(Pagination::new(
            params.page.unwrap_or(1),
            DEFAULT_ITEMS_PER_PAGE,
        )),
    };
    let (_total, payments) = repo
        .list_payments(query)
        .map_err(|e| map_repo_err("Failed to list payments", e))?;

    payments
        .into_iter()
        .map(|payment| expand_payment(payment, filter, repo))
        .collect()
}

/// Retrieves one payment with its cart expanded.
pub fn get_payment<R>(
    payment_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ExpandedPayment>
where
    R: PaymentReader + CartReader + ProductReader,
{
    let filter = deleted_filter_for(&ListParams::default(), user)?;

    let payment_id = PaymentId::new(payment_id).map_err(|_| ServiceError::NotFound)?;
    let payment = repo
        .get_payment_by_id(payment_id, filter)
        .map_err(|e| map_repo_err("Failed to get payment", e))?
        .ok_or(ServiceError::NotFound)?;

    expand_payment(payment, filter, repo)
}

/// Records a payment attempt against a cart; it starts pending.
pub fn create_payment<R>(
    payload: PaymentFormPayload,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Payment>
where
    R: CartReader + PaymentWriter,
{
    repo.get_cart_by_id(payload.cart_id, DeletedFilter::ActiveOnly)
        .map_err(|e| map_repo_err("Failed to resolve cart", e))?
        .ok_or(ServiceError::Reference { field: "cart_id" })?;

    repo.create_payment(&payload.into_new_payment())
        .map_err(|e| map_repo_err("Failed to create payment", e))
}

/// Applies field changes to an existing, non-deleted payment. The first
/// transition into a settled status stamps `paid_at`; later changes leave
/// the stamp alone.
pub fn update_payment<R>(
    payment_id: i32,
    changes: PaymentChanges,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Payment>
where
    R: PaymentReader + PaymentWriter,
{
    let payment_id = PaymentId::new(payment_id).map_err(|_| ServiceError::NotFound)?;
    let existing = repo
        .get_payment_by_id(payment_id, DeletedFilter::ActiveOnly)
        .map_err(|e| map_repo_err("Failed to get payment", e))?
        .ok_or(ServiceError::NotFound)?;

    let paid_at = match changes.status {
        Some(status) if status.is_settled() && existing.paid_at.is_none() => {
            Some(Utc::now().naive_utc())
        }
        _ => None,
    };

    repo.update_payment(existing.id, changes, paid_at)
        .map_err(|e| map_repo_err("Failed to update payment", e))
}

/// Soft-deletes a payment record.
pub fn delete_payment<R>(payment_id: i32, _user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: PaymentWriter,
{
    let payment_id = PaymentId::new(payment_id).map_err(|_| ServiceError::NotFound)?;
    let affected = repo
        .soft_delete_payment(payment_id)
        .map_err(|e| map_repo_err("Failed to delete payment", e))?;
    if affected == 0 {
        return Err(ServiceError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenUse;
    use crate::domain::types::{
        CategoryName, PaymentMethod, PaymentStatus, Price, ProductDescription, ProductName,
        StockCount,
    };
    use crate::forms::carts::CartFormPayload;
    use crate::forms::categories::CategoryFormPayload;
    use crate::forms::customers::CustomerFormPayload;
    use crate::forms::products::ProductFormPayload;
    use crate::repository::test::TestRepository;
    use crate::services::carts::create_cart;
    use crate::services::categories::create_category;
    use crate::services::customers::create_customer;
    use crate::services::products::create_product;

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: 1,
            username: "maria".into(),
            email: "maria@example.com".into(),
            is_staff: false,
            token_use: TokenUse::Access,
            iat: 0,
            exp: 0,
        }
    }

    fn seeded_cart(repo: &TestRepository, user: &AuthenticatedUser) -> CartId {
        create_category(
            CategoryFormPayload {
                name: CategoryName::new("Books").unwrap(),
                description: None,
                image: None,
            },
            user,
            repo,
        )
        .unwrap();
        let customer = create_customer(
            CustomerFormPayload {
                cpf: None,
                phone: None,
                birth_date: None,
            },
            user,
            repo,
        )
        .unwrap();
        create_cart(
            CartFormPayload {
                customer_id: customer.id,
            },
            user,
            repo,
        )
        .unwrap()
        .id
    }

    fn pix_payment(cart_id: CartId) -> PaymentFormPayload {
        PaymentFormPayload {
            cart_id,
            payment_method: PaymentMethod::Pix,
            amount: Price::new(39.98).unwrap(),
        }
    }

    #[test]
    fn payments_start_pending_without_paid_at() {
        let repo = TestRepository::new();
        let user = sample_user();
        let cart_id = seeded_cart(&repo, &user);

        let payment = create_payment(pix_payment(cart_id), &user, &repo).unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.paid_at.is_none());
    }

    #[test]
    fn approving_stamps_paid_at_once() {
        let repo = TestRepository::new();
        let user = sample_user();
        let cart_id = seeded_cart(&repo, &user);
        let payment = create_payment(pix_payment(cart_id), &user, &repo).unwrap();

        let approved = update_payment(
            payment.id.get(),
            PaymentChanges {
                status: Some(PaymentStatus::Approved),
                ..PaymentChanges::default()
            },
            &user,
            &repo,
        )
        .unwrap();
        assert_eq!(approved.status, PaymentStatus::Approved);
        let stamped = approved.paid_at.expect("paid_at set on approval");

        let refunded = update_payment(
            payment.id.get(),
            PaymentChanges {
                status: Some(PaymentStatus::Refunded),
                ..PaymentChanges::default()
            },
            &user,
            &repo,
        )
        .unwrap();
        assert_eq!(refunded.paid_at, Some(stamped));
    }

    #[test]
    fn rejecting_does_not_stamp_paid_at() {
        let repo = TestRepository::new();
        let user = sample_user();
        let cart_id = seeded_cart(&repo, &user);
        let payment = create_payment(pix_payment(cart_id), &user, &repo).unwrap();

        let rejected = update_payment(
            payment.id.get(),
            PaymentChanges {
                status: Some(PaymentStatus::Rejected),
                ..PaymentChanges::default()
            },
            &user,
            &repo,
        )
        .unwrap();
        assert!(rejected.paid_at.is_none());
    }

    #[test]
    fn payments_for_unknown_carts_are_reference_errors() {
        let repo = TestRepository::new();
        let user = sample_user();

        let result = create_payment(pix_payment(CartId::new(99).unwrap()), &user, &repo);
        assert!(matches!(
            result,
            Err(ServiceError::Reference { field: "cart_id" })
        ));
    }

    #[test]
    fn retries_accumulate_as_separate_records() {
        let repo = TestRepository::new();
        let user = sample_user();
        let cart_id = seeded_cart(&repo, &user);

        create_payment(pix_payment(cart_id), &user, &repo).unwrap();
        create_payment(pix_payment(cart_id), &user, &repo).unwrap();

        let listed =
            list_payments(ListParams::default(), Some(cart_id.get()), &user, &repo).unwrap();
        assert_eq!(listed.len(), 2);
    }
}
