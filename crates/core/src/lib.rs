//! Dai Nam Core - Shared domain types.
//!
//! This crate provides the types used by the storefront:
//! - product snapshots and cart items held by the cart store
//! - blog posts and projects fetched from the CMS
//! - cursor pagination records
//! - checkout contact forms and order payloads
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients, no async runtime. This keeps it usable from the server and from
//! any client-side shell embedding the state containers.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, contact details, content and order records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
