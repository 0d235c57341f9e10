//! # wavelink-core
//!
//! Core crate for Wavelink. Contains configuration schemas, the typed
//! subscriber identity, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Wavelink crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
pub use types::identity::Identity;
