//! Core types for the Dai Nam storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod content;
pub mod email;
pub mod id;
pub mod order;
pub mod page;
pub mod phone;
pub mod price;

pub use cart::{CartItem, Product};
pub use content::{Image, Post, Project, Term};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{ContactForm, ContactFormError, OrderConfirmation, OrderLine, OrderResponse};
pub use page::{ListPage, PageInfo};
pub use phone::{Phone, PhoneError};
pub use price::{Price, format_vnd};
