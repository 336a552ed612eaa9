//! Shopfront Core - catalog, cart and filter state model.
//!
//! This crate holds the state logic shared by the storefront pages:
//! - [`types`] - Newtype wrappers for product IDs, prices, categories and products
//! - [`cart`] - The cart mapping and its quantity invariants
//! - [`filter`] - Category filtering of a fetched catalog
//! - [`testimonial`] - The fixed testimonial list shown on the home page
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage access. Persistence of the cart and fetching of the
//! catalog live in the storefront crate behind small interfaces.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod filter;
pub mod testimonial;
pub mod types;

pub use cart::{Cart, CartError};
pub use filter::{CategoryFilter, category_tabs};
pub use testimonial::{ROTATION_INTERVAL, TESTIMONIALS, Testimonial};
pub use types::*;
