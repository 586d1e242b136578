//! Hallowmart backend library.
//!
//! The store service: users, products, carts, and transactions persisted as
//! whole JSON documents in a key/value document store, exposed to the web
//! tier as typed JSON request/response pairs.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod service;
pub mod store;
