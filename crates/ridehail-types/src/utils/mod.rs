//! Utility functions shared across the client crates.

pub mod formatting;

pub use formatting::{truncate_id, without_0x_prefix};
