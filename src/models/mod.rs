//! Diesel row structs mirroring `crate::schema`, with conversions to and
//! from the domain layer.

pub mod cart;
pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod customer;
pub mod payment;
pub mod product;
pub mod user;
