//! Core payment-timeline engine for the trygd benefit backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Given the full, append-only history of payment-line mutations for a case,
//! it derives a single disjoint timeline describing, for every calendar
//! date, which payment amount was in effect. Everything is pure and
//! synchronous; all types are immutable after construction.

pub mod entry;
pub mod error;
pub mod merge;
pub mod mutation;
pub mod period;
pub mod timeline;

pub use error::{Error, Result};
