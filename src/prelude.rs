//! Prelude module for the delay_penalty crate.
//!
//! Re-exports the derive macros shared across modules.

pub use derive_more::Display;
pub use rust_decimal::Decimal;
