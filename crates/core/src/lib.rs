//! Shoebox Core - Shared types library.
//!
//! This crate provides the domain types used across all Shoebox components:
//! - `cart` - Cart store and its collaborators
//! - `cli` - Command-line tool for operating a cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! filesystem access. All cart transformations are pure: each one returns a
//! new [`Cart`] value and never mutates entries in place.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, catalog types, and the cart model

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
