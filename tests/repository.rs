use chrono::Utc;
use diesel::prelude::*;
use vitrine::domain::cart::{NewCart, NewCartItem};
use vitrine::domain::category::NewCategory;
use vitrine::domain::customer::CustomerChanges;
use vitrine::domain::payment::{NewPayment, PaymentChanges};
use vitrine::domain::product::NewProduct;
use vitrine::domain::types::{
    CategoryId, CategoryName, Cpf, EmailAddress, PaymentMethod, PaymentStatus, Price,
    ProductDescription, ProductId, ProductName, Quantity, StockCount, Username,
};
use vitrine::domain::user::NewUser;
use vitrine::repository::errors::RepositoryError;
use vitrine::repository::{
    CartItemListQuery, CartReader, CartWriter, CategoryListQuery, CategoryReader, CategoryWriter,
    CustomerWriter, DeletedFilter, DieselRepository, PaymentReader, PaymentWriter,
    ProductListQuery, ProductReader, ProductWriter, UserWriter,
};
use vitrine::schema::{cart_items, products};

mod common;

fn new_category(name: &str) -> NewCategory {
    let now = Utc::now().naive_utc();
    NewCategory {
        name: CategoryName::new(name).unwrap(),
        description: None,
        image: None,
        created_at: now,
        updated_at: now,
    }
}

fn new_product(category_id: CategoryId, name: &str) -> NewProduct {
    let now = Utc::now().naive_utc();
    NewProduct {
        category_id,
        name: ProductName::new(name).unwrap(),
        description: ProductDescription::new("A paperback").unwrap(),
        price: Price::new(19.99).unwrap(),
        stock: StockCount::new(5).unwrap(),
        image: None,
        created_at: now,
        updated_at: now,
    }
}

fn new_user(username: &str) -> NewUser {
    let now = Utc::now().naive_utc();
    NewUser {
        username: Username::new(username).unwrap(),
        password_hash: "not-a-real-hash".to_string(),
        email: EmailAddress::new("maria@example.com").unwrap(),
        first_name: "Maria".to_string(),
        last_name: "Silva".to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// Seeds user, customer, cart, category and product; returns (repo untouched)
/// the cart and product ids the cart-item tests need.
fn seed_cart_and_product(repo: &DieselRepository) -> (vitrine::domain::cart::Cart, ProductId) {
    let (_user, customer) = repo
        .create_user_with_customer(&new_user("maria"))
        .expect("should create user and customer");
    let now = Utc::now().naive_utc();
    let cart = repo
        .create_cart(&NewCart {
            customer_id: customer.id,
            created_at: now,
            updated_at: now,
        })
        .expect("should create cart");
    let category = repo
        .create_category(&new_category("Books"))
        .expect("should create category");
    let product = repo
        .create_product(&new_product(category.id, "Novel"))
        .expect("should create product");
    (cart, product.id)
}

fn add_item(repo: &DieselRepository, cart_id: vitrine::domain::types::CartId, product_id: ProductId, quantity: i32) -> vitrine::domain::cart::CartItem {
    let now = Utc::now().naive_utc();
    repo.upsert_cart_item(&NewCartItem {
        cart_id,
        product_id,
        quantity: Quantity::new(quantity).unwrap(),
        created_at: now,
        updated_at: now,
    })
    .expect("should upsert cart item")
}

#[test]
fn soft_delete_hides_category_from_default_reads() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("Books")).unwrap();
    repo.soft_delete_category(category.id).unwrap();

    let (total, listed) = repo
        .list_categories(CategoryListQuery::default())
        .unwrap();
    assert_eq!(total, 0);
    assert!(listed.is_empty());
    assert!(
        repo.get_category_by_id(category.id, DeletedFilter::ActiveOnly)
            .unwrap()
            .is_none()
    );

    // The audit path still sees the row, flagged.
    let (total, listed) = repo
        .list_categories(CategoryListQuery::default().include_deleted())
        .unwrap();
    assert_eq!(total, 1);
    assert!(listed[0].is_deleted);
    let fetched = repo
        .get_category_by_id(category.id, DeletedFilter::IncludeDeleted)
        .unwrap()
        .expect("row must survive a soft delete");
    assert!(fetched.is_deleted);
}

#[test]
fn soft_delete_cascades_from_category_to_products_and_cart_items() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let (cart, product_id) = seed_cart_and_product(&repo);
    add_item(&repo, cart.id, product_id, 2);

    let category = repo
        .list_categories(CategoryListQuery::default())
        .unwrap()
        .1
        .remove(0);
    repo.soft_delete_category(category.id).unwrap();

    let (_, visible_products) = repo.list_products(ProductListQuery::default()).unwrap();
    assert!(visible_products.is_empty());
    let (_, visible_items) = repo
        .list_cart_items(CartItemListQuery::default())
        .unwrap();
    assert!(visible_items.is_empty());

    // Rows are flagged, not removed, and the cart itself is untouched.
    let (_, all_products) = repo
        .list_products(ProductListQuery::default().include_deleted())
        .unwrap();
    assert_eq!(all_products.len(), 1);
    assert!(all_products[0].is_deleted);
    let cart = repo
        .get_cart_by_id(cart.id, DeletedFilter::ActiveOnly)
        .unwrap()
        .expect("cart is not owned by the category");
    assert!(!cart.is_deleted);
}

#[test]
fn repeated_cart_item_upserts_accumulate_on_one_row() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let (cart, product_id) = seed_cart_and_product(&repo);
    let first = add_item(&repo, cart.id, product_id, 2);
    let second = add_item(&repo, cart.id, product_id, 1);

    assert_eq!(first.id, second.id);
    assert_eq!(second.quantity.get(), 3);

    let (total, items) = repo
        .list_cart_items(CartItemListQuery::default().cart(cart.id))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].quantity.get(), 3);
}

#[test]
fn duplicate_cart_item_rows_are_rejected_by_the_store() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let (cart, product_id) = seed_cart_and_product(&repo);
    add_item(&repo, cart.id, product_id, 1);

    // Bypass the upsert: a plain second insert must hit the unique index.
    let mut conn = test_db.pool().get().unwrap();
    let result = diesel::insert_into(cart_items::table)
        .values((
            cart_items::cart_id.eq(cart.id.get()),
            cart_items::product_id.eq(product_id.get()),
            cart_items::quantity.eq(1),
        ))
        .execute(&mut conn);
    assert!(matches!(
        result,
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _
        ))
    ));
}

#[test]
fn revived_cart_items_are_active_again() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let (cart, product_id) = seed_cart_and_product(&repo);
    let item = add_item(&repo, cart.id, product_id, 2);
    repo.soft_delete_cart_item(item.id).unwrap();

    let revived = add_item(&repo, cart.id, product_id, 1);
    assert_eq!(revived.id, item.id);
    assert!(!revived.is_deleted);
}

#[test]
fn physical_deletes_still_cascade_in_the_store() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let (cart, product_id) = seed_cart_and_product(&repo);
    add_item(&repo, cart.id, product_id, 1);

    // The application never does this; the relational contract still holds
    // for anyone operating on the store directly.
    let mut conn = test_db.pool().get().unwrap();
    diesel::delete(vitrine::schema::categories::table)
        .execute(&mut conn)
        .unwrap();

    let remaining_products: i64 = products::table.count().get_result(&mut conn).unwrap();
    let remaining_items: i64 = cart_items::table.count().get_result(&mut conn).unwrap();
    assert_eq!(remaining_products, 0);
    assert_eq!(remaining_items, 0);
}

#[test]
fn cpf_uniqueness_is_enforced_by_the_store() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let (_, first) = repo.create_user_with_customer(&new_user("maria")).unwrap();
    let (_, second) = repo.create_user_with_customer(&new_user("joao")).unwrap();

    let cpf_changes = CustomerChanges {
        cpf: Some(Cpf::new("123.456.789-09").unwrap()),
        phone: None,
        birth_date: None,
    };
    repo.update_customer(first.id, cpf_changes.clone()).unwrap();

    let result = repo.update_customer(second.id, cpf_changes);
    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
}

#[test]
fn duplicate_usernames_are_conflicts() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.create_user_with_customer(&new_user("maria")).unwrap();
    let result = repo.create_user_with_customer(&new_user("maria"));
    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
}

#[test]
fn payment_status_transitions_persist_paid_at() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let (cart, _) = seed_cart_and_product(&repo);
    let now = Utc::now().naive_utc();
    let payment = repo
        .create_payment(&NewPayment {
            cart_id: cart.id,
            payment_method: PaymentMethod::Pix,
            amount: Price::new(39.98).unwrap(),
            created_at: now,
            updated_at: now,
        })
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert!(payment.paid_at.is_none());

    let settled_at = Utc::now().naive_utc();
    let approved = repo
        .update_payment(
            payment.id,
            PaymentChanges {
                payment_method: None,
                amount: None,
                status: Some(PaymentStatus::Approved),
            },
            Some(settled_at),
        )
        .unwrap();
    assert_eq!(approved.status, PaymentStatus::Approved);
    assert_eq!(approved.paid_at, Some(settled_at));

    repo.soft_delete_payment(payment.id).unwrap();
    assert!(
        repo.get_payment_by_id(payment.id, DeletedFilter::ActiveOnly)
            .unwrap()
            .is_none()
    );
}

#[test]
fn customer_soft_delete_takes_cart_and_items_along() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let (cart, product_id) = seed_cart_and_product(&repo);
    add_item(&repo, cart.id, product_id, 1);

    repo.soft_delete_customer(cart.customer_id).unwrap();

    assert!(
        repo.get_cart_by_id(cart.id, DeletedFilter::ActiveOnly)
            .unwrap()
            .is_none()
    );
    let (_, items) = repo.list_cart_items(CartItemListQuery::default()).unwrap();
    assert!(items.is_empty());
}
