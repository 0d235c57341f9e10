//! Shared domain types.

pub mod identity;
