//! Declarative entity definitions

#[macro_use]
pub mod macros;
