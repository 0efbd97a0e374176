//! # Mathematical Functions
//!
//! Overflow-checked arithmetic used by the sale accounting.

pub mod safe_math;

// Re-export commonly used functions
pub use safe_math::*;
