//! Configuration module
//!
//! Loads and validates workout files. Values are bounds-checked here so
//! the phase engine can assume every interval is at least one second.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLoader, LoadResult, LoadWarning, LoaderOptions};
pub use schema::*;
pub use validation::{ValidationResult, Validator};
