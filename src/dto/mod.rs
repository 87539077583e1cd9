//! Wire representations. Each struct is an explicit, fixed field list so a
//! schema change in the store cannot silently change the public API.

pub mod carts;
pub mod categories;
pub mod customers;
pub mod payments;
pub mod products;
pub mod users;
