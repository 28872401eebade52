//! CLI command implementations.

pub mod check;
pub mod rules;
pub mod validate;
