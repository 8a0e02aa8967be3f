//! Core types shared across pagewatch facilities
//!
//! This crate provides foundational types used by both the error and
//! logging facilities:
//!
//! - **Correlation types**: CycleId for tying together the events of one watch cycle
//! - **Sensitive data**: Sensitive<T> marker for webhook credentials
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::CycleId;
pub use sensitive::Sensitive;
