//! Core library exports for the Vitrine store service.
//!
//! This crate exposes the domain model, Diesel models, repositories, wire
//! representations, forms, routes and service layers used by the Vitrine
//! e-commerce API. The `data` feature compiles only the persistence/domain
//! layer; the default `server` feature adds the full Actix-web application.

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "server")]
pub mod services;
