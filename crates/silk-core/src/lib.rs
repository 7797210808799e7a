//! # Silk-Core
//!
//! Core types for Silkflow, a real-time service that converts
//! hand-tracking input into synchronized particle and color state
//! for every connected viewer.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
