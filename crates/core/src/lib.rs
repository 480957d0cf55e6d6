//! Bazaar Core - Shared domain types.
//!
//! This crate holds the storefront's session-scoped records and the pure
//! logic that operates on them:
//! - [`Cart`] and [`CartItem`] - ordered, duplicate-friendly line items
//! - [`OrderInfo`] - checkout capture (form fields + cart snapshot + total)
//! - [`ProductId`] - type-safe product reference
//!
//! # Architecture
//!
//! No I/O lives here: no database access, no HTTP, no sessions. The
//! storefront crate loads a [`Cart`] out of the session, mutates it through
//! `&mut Cart`, and writes it back.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
