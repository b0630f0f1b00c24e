//! Dai Nam storefront library.
//!
//! Client-side state for the storefront (the cart and the paged CMS list
//! views), order submission, the WordPress GraphQL client, and the JSON API
//! that fronts it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod listing;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod wordpress;
