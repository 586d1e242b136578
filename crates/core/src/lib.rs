//! Hallowmart Core - Shared types library.
//!
//! This crate provides common types used across all Hallowmart components:
//! - `backend` - Store service persisting users, products, carts, transactions
//! - `web` - Public-facing site (Google login, catalog, cart, checkout)
//!
//! # Architecture
//!
//! The core crate contains only types and the cart mutation logic - no I/O,
//! no database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere, including the wire types shared by the backend
//! service and its client in the web tier.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs
//! - [`model`] - Domain entities: users, products, carts, transactions
//! - [`rpc`] - Request/response pairs for the backend RPC surface

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod model;
pub mod rpc;
pub mod types;

pub use model::*;
pub use types::*;
