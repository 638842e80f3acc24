//! AvknGifts Core - Shared types library.
//!
//! This crate provides common types used across all AvknGifts components:
//! - `storefront` - Public-facing gift storefront service
//! - `cli` - Command-line tools for migrations and catalog checks
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for item ids, prices, friend codes, keys,
//!   and ownership statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
