//! # fixi-core
//!
//! Core crate for the Fixi hook system. Contains the configuration schemas
//! and the unified error system shared by the hook registry and the server
//! binary.
//!
//! This crate has **no** internal dependencies on other Fixi crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
