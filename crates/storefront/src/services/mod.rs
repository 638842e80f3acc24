//! Business logic services.

pub mod gift;
