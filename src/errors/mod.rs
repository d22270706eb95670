//! # Error Handling
//!
//! This module provides error handling for the certflow pipeline.
//! It defines custom error types using `thiserror`.

mod types;

pub use types::{Error, Result};
