//! Helper macros.

#[macro_use]
pub mod macros;
