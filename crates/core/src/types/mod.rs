//! Core types for Shoebox.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod catalog;
pub mod id;
pub mod price;

pub use cart::{Cart, CartItem};
pub use catalog::{Product, Stock};
pub use id::*;
pub use price::Price;
