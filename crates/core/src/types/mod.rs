//! Core types for Hallowmart.

pub mod id;

pub use id::*;
