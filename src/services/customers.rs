use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::types::{CustomerId, UserId};
use crate::forms::customers::CustomerFormPayload;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Pagination};
use crate::repository::errors::RepositoryError;
use crate::repository::{CustomerListQuery, CustomerReader, CustomerWriter, DeletedFilter};
use crate::services::{ListParams, deleted_filter_for, map_repo_err};

use super::{ServiceError, ServiceResult};

/// Lists customer profiles.
pub fn list_customers<R>(
    params: ListParams,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<Customer>>
where
    R: CustomerReader,
{
    let filter = deleted_filter_for(&params, user)?;

    let query = CustomerListQuery {
        filter,
        pagination: Some(Pagination::new(
            params.page.unwrap_or(1),
            DEFAULT_ITEMS_PER_PAGE,
        )),
    };
    let (_total, customers) = repo
        .list_customers(query)
        .map_err(|e| map_repo_err("Failed to list customers", e))?;
    Ok(customers)
}

/// Retrieves one customer profile.
pub fn get_customer<R>(
    customer_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Customer>
where
    R: CustomerReader,
{
    let filter = deleted_filter_for(&ListParams::default(), user)?;

    let customer_id = CustomerId::new(customer_id).map_err(|_| ServiceError::NotFound)?;
    repo.get_customer_by_id(customer_id, filter)
        .map_err(|e| map_repo_err("Failed to get customer", e))?
        .ok_or(ServiceError::NotFound)
}

/// Creates a profile for the calling user. Registration normally does this;
/// the endpoint covers accounts that predate it. One profile per user.
pub fn create_customer<R>(
    payload: CustomerFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter,
{
    let user_id = UserId::new(user.sub).map_err(|e| {
        log::error!("Invalid user id in token: {e}");
        ServiceError::Internal
    })?;

    let existing = repo
        .get_customer_by_user_id(user_id, DeletedFilter::IncludeDeleted)
        .map_err(|e| map_repo_err("Failed to look up customer", e))?;
    if existing.is_some() {
        return Err(ServiceError::Conflict {
            field: "user",
            message: "a profile already exists for this user",
        });
    }

    let now = Utc::now().naive_utc();
    let new_customer = NewCustomer {
        user_id,
        cpf: payload.cpf,
        phone: payload.phone,
        birth_date: payload.birth_date,
        created_at: now,
        updated_at: now,
    };

    match repo.create_customer(&new_customer) {
        Ok(customer) => Ok(customer),
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::Conflict {
            field: "cpf",
            message: "a customer with this cpf already exists",
        }),
        Err(e) => Err(map_repo_err("Failed to create customer", e)),
    }
}

/// Applies field changes to an existing, non-deleted customer.
pub fn update_customer<R>(
    customer_id: i32,
    payload: CustomerFormPayload,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter,
{
    let customer_id = CustomerId::new(customer_id).map_err(|_| ServiceError::NotFound)?;
    let existing = repo
        .get_customer_by_id(customer_id, DeletedFilter::ActiveOnly)
        .map_err(|e| map_repo_err("Failed to get customer", e))?
        .ok_or(ServiceError::NotFound)?;

    match repo.update_customer(existing.id, payload.into_changes()) {
        Ok(customer) => Ok(customer),
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::Conflict {
            field: "cpf",
            message: "a customer with this cpf already exists",
        }),
        Err(e) => Err(map_repo_err("Failed to update customer", e)),
    }
}

/// Soft-deletes a customer, cascading the flag over its cart and cart items.
pub fn delete_customer<R>(
    customer_id: i32,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CustomerWriter,
{
    let customer_id = CustomerId::new(customer_id).map_err(|_| ServiceError::NotFound)?;
    let affected = repo
        .soft_delete_customer(customer_id)
        .map_err(|e| map_repo_err("Failed to delete customer", e))?;
    if affected == 0 {
        return Err(ServiceError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenUse;
    use crate::domain::types::Cpf;
    use crate::repository::test::TestRepository;

    fn sample_user(sub: i32) -> AuthenticatedUser {
        AuthenticatedUser {
            sub,
            username: format!("user{sub}"),
            email: format!("user{sub}@example.com"),
            is_staff: false,
            token_use: TokenUse::Access,
            iat: 0,
            exp: 0,
        }
    }

    fn payload(cpf: Option<&str>) -> CustomerFormPayload {
        CustomerFormPayload {
            cpf: cpf.map(|c| Cpf::new(c).unwrap()),
            phone: None,
            birth_date: None,
        }
    }

    #[test]
    fn cpf_collisions_are_conflicts() {
        let repo = TestRepository::new();

        create_customer(payload(Some("123.456.789-09")), &sample_user(1), &repo).unwrap();
        let result = create_customer(payload(Some("12345678909")), &sample_user(2), &repo);
        assert!(matches!(
            result,
            Err(ServiceError::Conflict { field: "cpf", .. })
        ));
    }

    #[test]
    fn one_profile_per_user() {
        let repo = TestRepository::new();
        let user = sample_user(1);

        create_customer(payload(None), &user, &repo).unwrap();
        assert!(matches!(
            create_customer(payload(None), &user, &repo),
            Err(ServiceError::Conflict { field: "user", .. })
        ));
    }

    #[test]
    fn soft_deleted_profiles_are_hidden() {
        let repo = TestRepository::new();
        let user = sample_user(1);

        let customer = create_customer(payload(None), &user, &repo).unwrap();
        delete_customer(customer.id.get(), &user, &repo).unwrap();

        assert!(matches!(
            get_customer(customer.id.get(), &user, &repo),
            Err(ServiceError::NotFound)
        ));
        assert!(list_customers(ListParams::default(), &user, &repo)
            .unwrap()
            .is_empty());
    }
}
