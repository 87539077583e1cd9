use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::cart::{Cart, CartItem, NewCart, NewCartItem};
use crate::domain::category::{Category, CategoryChanges, NewCategory};
use crate::domain::customer::{Customer, CustomerChanges, NewCustomer};
use crate::domain::payment::{NewPayment, Payment, PaymentChanges};
use crate::domain::product::{NewProduct, Product, ProductChanges};
use crate::domain::types::{
    CartId, CartItemId, CategoryId, CustomerId, PaymentId, ProductId, Quantity, UserId,
};
use crate::domain::user::{NewUser, User};
use crate::pagination::Pagination;
use crate::repository::errors::RepositoryResult;

pub mod cart;
pub mod category;
pub mod customer;
pub mod errors;
pub mod payment;
pub mod product;
#[cfg(test)]
pub mod test;
pub mod user;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Scope applied to every read: the default hides soft-deleted rows, the
/// explicit variant is reserved for administrative tooling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletedFilter {
    #[default]
    ActiveOnly,
    IncludeDeleted,
}

/// Applies a [`DeletedFilter`] to a boxed query over `$table`. Every read
/// entry point goes through this so the filtering predicate lives in exactly
/// one place.
macro_rules! scoped {
    ($query:expr, $table:ident, $filter:expr) => {
        match $filter {
            $crate::repository::DeletedFilter::ActiveOnly => {
                $query.filter($table::is_deleted.eq(false))
            }
            $crate::repository::DeletedFilter::IncludeDeleted => $query,
        }
    };
}

/// Flags the rows of `$table` matched by `$predicate` as deleted and
/// refreshes `updated_at`. The application never issues a physical `DELETE`;
/// this is the only delete it knows.
macro_rules! soft_delete_rows {
    ($conn:expr, $table:ident, $predicate:expr) => {
        diesel::update(
            $table::table
                .filter($predicate)
                .filter($table::is_deleted.eq(false)),
        )
        .set((
            $table::is_deleted.eq(true),
            $table::updated_at.eq(diesel::dsl::now),
        ))
        .execute($conn)
    };
}

pub(crate) use scoped;
pub(crate) use soft_delete_rows;

/// Query parameters used when listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    pub filter: DeletedFilter,
    pub pagination: Option<Pagination>,
}

/// Query parameters used when listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Restrict to products of one category.
    pub category_id: Option<CategoryId>,
    pub filter: DeletedFilter,
    pub pagination: Option<Pagination>,
}

/// Query parameters used when listing customers.
#[derive(Debug, Clone, Default)]
pub struct CustomerListQuery {
    pub filter: DeletedFilter,
    pub pagination: Option<Pagination>,
}

/// Query parameters used when listing carts.
#[derive(Debug, Clone, Default)]
pub struct CartListQuery {
    pub customer_id: Option<CustomerId>,
    pub filter: DeletedFilter,
    pub pagination: Option<Pagination>,
}

/// Query parameters used when listing cart line items.
#[derive(Debug, Clone, Default)]
pub struct CartItemListQuery {
    pub cart_id: Option<CartId>,
    pub filter: DeletedFilter,
    pub pagination: Option<Pagination>,
}

/// Query parameters used when listing payments.
#[derive(Debug, Clone, Default)]
pub struct PaymentListQuery {
    pub cart_id: Option<CartId>,
    pub filter: DeletedFilter,
    pub pagination: Option<Pagination>,
}

macro_rules! list_query_builders {
    ($name:ident) => {
        impl $name {
            pub fn include_deleted(mut self) -> Self {
                self.filter = DeletedFilter::IncludeDeleted;
                self
            }
            pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
                self.pagination = Some(Pagination::new(page, per_page));
                self
            }
        }
    };
}

list_query_builders!(CategoryListQuery);
list_query_builders!(ProductListQuery);
list_query_builders!(CustomerListQuery);
list_query_builders!(CartListQuery);
list_query_builders!(CartItemListQuery);
list_query_builders!(PaymentListQuery);

impl ProductListQuery {
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

impl CartListQuery {
    pub fn customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }
}

impl CartItemListQuery {
    pub fn cart(mut self, cart_id: CartId) -> Self {
        self.cart_id = Some(cart_id);
        self
    }
}

impl PaymentListQuery {
    pub fn cart(mut self, cart_id: CartId) -> Self {
        self.cart_id = Some(cart_id);
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List categories using the supplied query options.
    fn list_categories(&self, query: CategoryListQuery)
    -> RepositoryResult<(usize, Vec<Category>)>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(
        &self,
        id: CategoryId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Apply the supplied field changes.
    fn update_category(
        &self,
        id: CategoryId,
        changes: CategoryChanges,
    ) -> RepositoryResult<Category>;
    /// Flag the category and everything it owns (products, their cart items)
    /// as deleted.
    fn soft_delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List products matching the supplied query parameters.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(
        &self,
        id: ProductId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Product>>;
}

/// Write operations for product entities.
pub trait ProductWriter {
    /// Persist a new product.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    /// Apply the supplied field changes.
    fn update_product(&self, id: ProductId, changes: ProductChanges) -> RepositoryResult<Product>;
    /// Flag the product and the cart items referencing it as deleted.
    fn soft_delete_product(&self, id: ProductId) -> RepositoryResult<usize>;
}

/// Read-only operations for customer profiles.
pub trait CustomerReader {
    /// List customers using the supplied query options.
    fn list_customers(&self, query: CustomerListQuery)
    -> RepositoryResult<(usize, Vec<Customer>)>;
    /// Retrieve a customer by its identifier.
    fn get_customer_by_id(
        &self,
        id: CustomerId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Customer>>;
    /// Retrieve the customer attached to a user account.
    fn get_customer_by_user_id(
        &self,
        user_id: UserId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Customer>>;
}

/// Write operations for customer profiles.
pub trait CustomerWriter {
    /// Persist a new customer profile.
    fn create_customer(&self, customer: &NewCustomer) -> RepositoryResult<Customer>;
    /// Apply the supplied field changes.
    fn update_customer(
        &self,
        id: CustomerId,
        changes: CustomerChanges,
    ) -> RepositoryResult<Customer>;
    /// Flag the customer and everything it owns (cart, cart items) as deleted.
    fn soft_delete_customer(&self, id: CustomerId) -> RepositoryResult<usize>;
}

/// Read-only operations for carts and their line items.
pub trait CartReader {
    /// List carts using the supplied query options.
    fn list_carts(&self, query: CartListQuery) -> RepositoryResult<(usize, Vec<Cart>)>;
    /// Retrieve a cart by its identifier.
    fn get_cart_by_id(&self, id: CartId, filter: DeletedFilter) -> RepositoryResult<Option<Cart>>;
    /// List cart line items using the supplied query options.
    fn list_cart_items(&self, query: CartItemListQuery)
    -> RepositoryResult<(usize, Vec<CartItem>)>;
    /// Retrieve a cart line item by its identifier.
    fn get_cart_item_by_id(
        &self,
        id: CartItemId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<CartItem>>;
}

/// Write operations for carts and their line items.
pub trait CartWriter {
    /// Persist a new cart.
    fn create_cart(&self, cart: &NewCart) -> RepositoryResult<Cart>;
    /// Reassign the cart to another customer.
    fn update_cart(&self, id: CartId, customer_id: CustomerId) -> RepositoryResult<Cart>;
    /// Flag the cart and its line items as deleted.
    fn soft_delete_cart(&self, id: CartId) -> RepositoryResult<usize>;
    /// Add a product to a cart. A single upsert statement on the
    /// `(cart_id, product_id)` unique index: an existing line accumulates the
    /// incoming quantity (and is revived if it was soft-deleted), so
    /// concurrent adds can never produce duplicate rows.
    fn upsert_cart_item(&self, item: &NewCartItem) -> RepositoryResult<CartItem>;
    /// Replace a line item's quantity.
    fn set_cart_item_quantity(
        &self,
        id: CartItemId,
        quantity: Quantity,
    ) -> RepositoryResult<CartItem>;
    /// Flag a line item as deleted.
    fn soft_delete_cart_item(&self, id: CartItemId) -> RepositoryResult<usize>;
}

/// Read-only operations for payment records.
pub trait PaymentReader {
    /// List payments using the supplied query options.
    fn list_payments(&self, query: PaymentListQuery) -> RepositoryResult<(usize, Vec<Payment>)>;
    /// Retrieve a payment by its identifier.
    fn get_payment_by_id(
        &self,
        id: PaymentId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Payment>>;
}

/// Write operations for payment records.
pub trait PaymentWriter {
    /// Persist a new payment in the pending state.
    fn create_payment(&self, payment: &NewPayment) -> RepositoryResult<Payment>;
    /// Apply the supplied field changes; `paid_at` is stamped by the caller
    /// when the status change settles the payment.
    fn update_payment(
        &self,
        id: PaymentId,
        changes: PaymentChanges,
        paid_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<Payment>;
    /// Flag the payment as deleted.
    fn soft_delete_payment(&self, id: PaymentId) -> RepositoryResult<usize>;
}

/// Read-only operations for user accounts.
pub trait UserReader {
    /// Retrieve a user by its identifier.
    fn get_user_by_id(&self, id: UserId, filter: DeletedFilter) -> RepositoryResult<Option<User>>;
    /// Retrieve an active user together with its stored password hash.
    fn get_user_with_credential(&self, username: &str)
    -> RepositoryResult<Option<(User, String)>>;
}

/// Write operations for user accounts.
pub trait UserWriter {
    /// Persist a new user account and its empty customer profile in one
    /// transaction.
    fn create_user_with_customer(&self, user: &NewUser) -> RepositoryResult<(User, Customer)>;
}
