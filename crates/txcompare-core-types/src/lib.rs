//! Core types shared across txcompare facilities
//!
//! This crate provides foundational types used by the error handling,
//! logging and output facilities:
//!
//! - **Correlation types**: RunId, identifying one comparison run
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
