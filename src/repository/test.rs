//! Simple in-memory repository used for unit tests.

use std::cell::RefCell;

use chrono::{NaiveDateTime, Utc};

use crate::domain::cart::{Cart, CartItem, NewCart, NewCartItem};
use crate::domain::category::{Category, CategoryChanges, NewCategory};
use crate::domain::customer::{Customer, CustomerChanges, NewCustomer};
use crate::domain::payment::{NewPayment, Payment, PaymentChanges};
use crate::domain::product::{NewProduct, Product, ProductChanges};
use crate::domain::types::{
    CartId, CartItemId, CategoryId, CustomerId, PaymentId, PaymentStatus, ProductId, Quantity,
    UserId,
};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CartItemListQuery, CartListQuery, CartReader, CartWriter, CategoryListQuery, CategoryReader,
    CategoryWriter, CustomerListQuery, CustomerReader, CustomerWriter, DeletedFilter,
    PaymentListQuery, PaymentReader, PaymentWriter, ProductListQuery, ProductReader,
    ProductWriter, UserReader, UserWriter,
};

#[derive(Default)]
struct State {
    users: Vec<(User, String)>,
    customers: Vec<Customer>,
    categories: Vec<Category>,
    products: Vec<Product>,
    carts: Vec<Cart>,
    cart_items: Vec<CartItem>,
    payments: Vec<Payment>,
    next_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory stand-in for [`super::DieselRepository`], mirroring its
/// soft-delete and uniqueness behavior closely enough for service tests.
#[derive(Default)]
pub struct TestRepository {
    state: RefCell<State>,
}

fn visible(is_deleted: bool, filter: DeletedFilter) -> bool {
    filter == DeletedFilter::IncludeDeleted || !is_deleted
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pre-built user (e.g. a staff account) with its password hash.
    pub fn seed_user(&self, user: User, password_hash: impl Into<String>) {
        self.state
            .borrow_mut()
            .users
            .push((user, password_hash.into()));
    }
}

impl CategoryReader for TestRepository {
    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<Category>)> {
        let state = self.state.borrow();
        let items: Vec<Category> = state
            .categories
            .iter()
            .filter(|c| visible(c.is_deleted, query.filter))
            .cloned()
            .collect();
        Ok((items.len(), items))
    }

    fn get_category_by_id(
        &self,
        id: CategoryId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Category>> {
        let state = self.state.borrow();
        Ok(state
            .categories
            .iter()
            .find(|c| c.id == id && visible(c.is_deleted, filter))
            .cloned())
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let created = Category {
            id: CategoryId::new(id).expect("positive test id"),
            name: category.name.clone(),
            description: category.description.clone(),
            image: category.image.clone(),
            created_at: category.created_at,
            updated_at: category.updated_at,
            is_deleted: false,
        };
        state.categories.push(created.clone());
        Ok(created)
    }

    fn update_category(
        &self,
        id: CategoryId,
        changes: CategoryChanges,
    ) -> RepositoryResult<Category> {
        let mut state = self.state.borrow_mut();
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(description) = changes.description {
            category.description = Some(description);
        }
        if let Some(image) = changes.image {
            category.image = Some(image);
        }
        category.updated_at = now();
        Ok(category.clone())
    }

    fn soft_delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        let product_ids: Vec<ProductId> = state
            .products
            .iter()
            .filter(|p| p.category_id == id)
            .map(|p| p.id)
            .collect();
        for item in state
            .cart_items
            .iter_mut()
            .filter(|i| product_ids.contains(&i.product_id) && !i.is_deleted)
        {
            item.is_deleted = true;
            item.updated_at = now();
        }
        for product in state
            .products
            .iter_mut()
            .filter(|p| p.category_id == id && !p.is_deleted)
        {
            product.is_deleted = true;
            product.updated_at = now();
        }
        let mut affected = 0;
        for category in state
            .categories
            .iter_mut()
            .filter(|c| c.id == id && !c.is_deleted)
        {
            category.is_deleted = true;
            category.updated_at = now();
            affected += 1;
        }
        Ok(affected)
    }
}

impl ProductReader for TestRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        let state = self.state.borrow();
        let items: Vec<Product> = state
            .products
            .iter()
            .filter(|p| visible(p.is_deleted, query.filter))
            .filter(|p| query.category_id.is_none_or(|id| p.category_id == id))
            .cloned()
            .collect();
        Ok((items.len(), items))
    }

    fn get_product_by_id(
        &self,
        id: ProductId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Product>> {
        let state = self.state.borrow();
        Ok(state
            .products
            .iter()
            .find(|p| p.id == id && visible(p.is_deleted, filter))
            .cloned())
    }
}

impl ProductWriter for TestRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let created = Product {
            id: ProductId::new(id).expect("positive test id"),
            category_id: product.category_id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: product.stock,
            image: product.image.clone(),
            created_at: product.created_at,
            updated_at: product.updated_at,
            is_deleted: false,
        };
        state.products.push(created.clone());
        Ok(created)
    }

    fn update_product(&self, id: ProductId, changes: ProductChanges) -> RepositoryResult<Product> {
        let mut state = self.state.borrow_mut();
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(category_id) = changes.category_id {
            product.category_id = category_id;
        }
        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(description) = changes.description {
            product.description = description;
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        if let Some(image) = changes.image {
            product.image = Some(image);
        }
        product.updated_at = now();
        Ok(product.clone())
    }

    fn soft_delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        for item in state
            .cart_items
            .iter_mut()
            .filter(|i| i.product_id == id && !i.is_deleted)
        {
            item.is_deleted = true;
            item.updated_at = now();
        }
        let mut affected = 0;
        for product in state
            .products
            .iter_mut()
            .filter(|p| p.id == id && !p.is_deleted)
        {
            product.is_deleted = true;
            product.updated_at = now();
            affected += 1;
        }
        Ok(affected)
    }
}

impl CustomerReader for TestRepository {
    fn list_customers(
        &self,
        query: CustomerListQuery,
    ) -> RepositoryResult<(usize, Vec<Customer>)> {
        let state = self.state.borrow();
        let items: Vec<Customer> = state
            .customers
            .iter()
            .filter(|c| visible(c.is_deleted, query.filter))
            .cloned()
            .collect();
        Ok((items.len(), items))
    }

    fn get_customer_by_id(
        &self,
        id: CustomerId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Customer>> {
        let state = self.state.borrow();
        Ok(state
            .customers
            .iter()
            .find(|c| c.id == id && visible(c.is_deleted, filter))
            .cloned())
    }

    fn get_customer_by_user_id(
        &self,
        user_id: UserId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Customer>> {
        let state = self.state.borrow();
        Ok(state
            .customers
            .iter()
            .find(|c| c.user_id == user_id && visible(c.is_deleted, filter))
            .cloned())
    }
}

impl CustomerWriter for TestRepository {
    fn create_customer(&self, customer: &NewCustomer) -> RepositoryResult<Customer> {
        let mut state = self.state.borrow_mut();
        if let Some(cpf) = &customer.cpf
            && state.customers.iter().any(|c| c.cpf.as_ref() == Some(cpf))
        {
            return Err(RepositoryError::Conflict("customers.cpf".into()));
        }
        let id = state.next_id();
        let created = Customer {
            id: CustomerId::new(id).expect("positive test id"),
            user_id: customer.user_id,
            cpf: customer.cpf.clone(),
            phone: customer.phone.clone(),
            birth_date: customer.birth_date,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
            is_deleted: false,
        };
        state.customers.push(created.clone());
        Ok(created)
    }

    fn update_customer(
        &self,
        id: CustomerId,
        changes: CustomerChanges,
    ) -> RepositoryResult<Customer> {
        let mut state = self.state.borrow_mut();
        if let Some(cpf) = &changes.cpf
            && state
                .customers
                .iter()
                .any(|c| c.id != id && c.cpf.as_ref() == Some(cpf))
        {
            return Err(RepositoryError::Conflict("customers.cpf".into()));
        }
        let customer = state
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(cpf) = changes.cpf {
            customer.cpf = Some(cpf);
        }
        if let Some(phone) = changes.phone {
            customer.phone = Some(phone);
        }
        if let Some(birth_date) = changes.birth_date {
            customer.birth_date = Some(birth_date);
        }
        customer.updated_at = now();
        Ok(customer.clone())
    }

    fn soft_delete_customer(&self, id: CustomerId) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        let cart_ids: Vec<CartId> = state
            .carts
            .iter()
            .filter(|c| c.customer_id == id)
            .map(|c| c.id)
            .collect();
        for item in state
            .cart_items
            .iter_mut()
            .filter(|i| cart_ids.contains(&i.cart_id) && !i.is_deleted)
        {
            item.is_deleted = true;
            item.updated_at = now();
        }
        for cart in state
            .carts
            .iter_mut()
            .filter(|c| c.customer_id == id && !c.is_deleted)
        {
            cart.is_deleted = true;
            cart.updated_at = now();
        }
        let mut affected = 0;
        for customer in state
            .customers
            .iter_mut()
            .filter(|c| c.id == id && !c.is_deleted)
        {
            customer.is_deleted = true;
            customer.updated_at = now();
            affected += 1;
        }
        Ok(affected)
    }
}

impl CartReader for TestRepository {
    fn list_carts(&self, query: CartListQuery) -> RepositoryResult<(usize, Vec<Cart>)> {
        let state = self.state.borrow();
        let items: Vec<Cart> = state
            .carts
            .iter()
            .filter(|c| visible(c.is_deleted, query.filter))
            .filter(|c| query.customer_id.is_none_or(|id| c.customer_id == id))
            .cloned()
            .collect();
        Ok((items.len(), items))
    }

    fn get_cart_by_id(&self, id: CartId, filter: DeletedFilter) -> RepositoryResult<Option<Cart>> {
        let state = self.state.borrow();
        Ok(state
            .carts
            .iter()
            .find(|c| c.id == id && visible(c.is_deleted, filter))
            .cloned())
    }

    fn list_cart_items(
        &self,
        query: CartItemListQuery,
    ) -> RepositoryResult<(usize, Vec<CartItem>)> {
        let state = self.state.borrow();
        let items: Vec<CartItem> = state
            .cart_items
            .iter()
            .filter(|i| visible(i.is_deleted, query.filter))
            .filter(|i| query.cart_id.is_none_or(|id| i.cart_id == id))
            .cloned()
            .collect();
        Ok((items.len(), items))
    }

    fn get_cart_item_by_id(
        &self,
        id: CartItemId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<CartItem>> {
        let state = self.state.borrow();
        Ok(state
            .cart_items
            .iter()
            .find(|i| i.id == id && visible(i.is_deleted, filter))
            .cloned())
    }
}

impl CartWriter for TestRepository {
    fn create_cart(&self, cart: &NewCart) -> RepositoryResult<Cart> {
        let mut state = self.state.borrow_mut();
        if state
            .carts
            .iter()
            .any(|c| c.customer_id == cart.customer_id)
        {
            return Err(RepositoryError::Conflict("carts.customer_id".into()));
        }
        let id = state.next_id();
        let created = Cart {
            id: CartId::new(id).expect("positive test id"),
            customer_id: cart.customer_id,
            created_at: cart.created_at,
            updated_at: cart.updated_at,
            is_deleted: false,
        };
        state.carts.push(created.clone());
        Ok(created)
    }

    fn update_cart(&self, id: CartId, customer_id: CustomerId) -> RepositoryResult<Cart> {
        let mut state = self.state.borrow_mut();
        if state
            .carts
            .iter()
            .any(|c| c.id != id && c.customer_id == customer_id)
        {
            return Err(RepositoryError::Conflict("carts.customer_id".into()));
        }
        let cart = state
            .carts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        cart.customer_id = customer_id;
        cart.updated_at = now();
        Ok(cart.clone())
    }

    fn soft_delete_cart(&self, id: CartId) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        for item in state
            .cart_items
            .iter_mut()
            .filter(|i| i.cart_id == id && !i.is_deleted)
        {
            item.is_deleted = true;
            item.updated_at = now();
        }
        let mut affected = 0;
        for cart in state.carts.iter_mut().filter(|c| c.id == id && !c.is_deleted) {
            cart.is_deleted = true;
            cart.updated_at = now();
            affected += 1;
        }
        Ok(affected)
    }

    fn upsert_cart_item(&self, item: &NewCartItem) -> RepositoryResult<CartItem> {
        let mut state = self.state.borrow_mut();
        if let Some(existing) = state
            .cart_items
            .iter_mut()
            .find(|i| i.cart_id == item.cart_id && i.product_id == item.product_id)
        {
            let quantity = existing.quantity.get() + item.quantity.get();
            existing.quantity = Quantity::new(quantity).expect("positive accumulated quantity");
            existing.is_deleted = false;
            existing.updated_at = item.updated_at;
            return Ok(existing.clone());
        }
        let id = state.next_id();
        let created = CartItem {
            id: CartItemId::new(id).expect("positive test id"),
            cart_id: item.cart_id,
            product_id: item.product_id,
            quantity: item.quantity,
            created_at: item.created_at,
            updated_at: item.updated_at,
            is_deleted: false,
        };
        state.cart_items.push(created.clone());
        Ok(created)
    }

    fn set_cart_item_quantity(
        &self,
        id: CartItemId,
        quantity: Quantity,
    ) -> RepositoryResult<CartItem> {
        let mut state = self.state.borrow_mut();
        let item = state
            .cart_items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(RepositoryError::NotFound)?;
        item.quantity = quantity;
        item.updated_at = now();
        Ok(item.clone())
    }

    fn soft_delete_cart_item(&self, id: CartItemId) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        let mut affected = 0;
        for item in state
            .cart_items
            .iter_mut()
            .filter(|i| i.id == id && !i.is_deleted)
        {
            item.is_deleted = true;
            item.updated_at = now();
            affected += 1;
        }
        Ok(affected)
    }
}

impl PaymentReader for TestRepository {
    fn list_payments(&self, query: PaymentListQuery) -> RepositoryResult<(usize, Vec<Payment>)> {
        let state = self.state.borrow();
        let items: Vec<Payment> = state
            .payments
            .iter()
            .filter(|p| visible(p.is_deleted, query.filter))
            .filter(|p| query.cart_id.is_none_or(|id| p.cart_id == id))
            .cloned()
            .collect();
        Ok((items.len(), items))
    }

    fn get_payment_by_id(
        &self,
        id: PaymentId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Payment>> {
        let state = self.state.borrow();
        Ok(state
            .payments
            .iter()
            .find(|p| p.id == id && visible(p.is_deleted, filter))
            .cloned())
    }
}

impl PaymentWriter for TestRepository {
    fn create_payment(&self, payment: &NewPayment) -> RepositoryResult<Payment> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let created = Payment {
            id: PaymentId::new(id).expect("positive test id"),
            cart_id: payment.cart_id,
            payment_method: payment.payment_method,
            amount: payment.amount,
            status: PaymentStatus::Pending,
            paid_at: None,
            created_at: payment.created_at,
            updated_at: payment.updated_at,
            is_deleted: false,
        };
        state.payments.push(created.clone());
        Ok(created)
    }

    fn update_payment(
        &self,
        id: PaymentId,
        changes: PaymentChanges,
        paid_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<Payment> {
        let mut state = self.state.borrow_mut();
        let payment = state
            .payments
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(method) = changes.payment_method {
            payment.payment_method = method;
        }
        if let Some(amount) = changes.amount {
            payment.amount = amount;
        }
        if let Some(status) = changes.status {
            payment.status = status;
        }
        if paid_at.is_some() {
            payment.paid_at = paid_at;
        }
        payment.updated_at = now();
        Ok(payment.clone())
    }

    fn soft_delete_payment(&self, id: PaymentId) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        let mut affected = 0;
        for payment in state
            .payments
            .iter_mut()
            .filter(|p| p.id == id && !p.is_deleted)
        {
            payment.is_deleted = true;
            payment.updated_at = now();
            affected += 1;
        }
        Ok(affected)
    }
}

impl UserReader for TestRepository {
    fn get_user_by_id(&self, id: UserId, filter: DeletedFilter) -> RepositoryResult<Option<User>> {
        let state = self.state.borrow();
        Ok(state
            .users
            .iter()
            .map(|(user, _)| user)
            .find(|u| u.id == id && visible(u.is_deleted, filter))
            .cloned())
    }

    fn get_user_with_credential(
        &self,
        username: &str,
    ) -> RepositoryResult<Option<(User, String)>> {
        let state = self.state.borrow();
        Ok(state
            .users
            .iter()
            .find(|(user, _)| user.username == username && !user.is_deleted)
            .cloned())
    }
}

impl UserWriter for TestRepository {
    fn create_user_with_customer(&self, user: &NewUser) -> RepositoryResult<(User, Customer)> {
        let mut state = self.state.borrow_mut();
        if state
            .users
            .iter()
            .any(|(existing, _)| existing.username == user.username)
        {
            return Err(RepositoryError::Conflict("users.username".into()));
        }
        let user_id = state.next_id();
        let created_user = User {
            id: UserId::new(user_id).expect("positive test id"),
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_staff: false,
            created_at: user.created_at,
            updated_at: user.updated_at,
            is_deleted: false,
        };
        state
            .users
            .push((created_user.clone(), user.password_hash.clone()));
        let customer_id = state.next_id();
        let created_customer = Customer {
            id: CustomerId::new(customer_id).expect("positive test id"),
            user_id: created_user.id,
            cpf: None,
            phone: None,
            birth_date: None,
            created_at: user.created_at,
            updated_at: user.updated_at,
            is_deleted: false,
        };
        state.customers.push(created_customer.clone());
        Ok((created_user, created_customer))
    }
}
