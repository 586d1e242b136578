//! Hallowmart web frontend library.
//!
//! Server-rendered pages for the store: catalog, Google OAuth login,
//! profiles, carts, and checkout. All persistence lives behind the
//! backend RPC surface; this crate only holds session state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod google;
pub mod routes;
pub mod session;
pub mod state;
